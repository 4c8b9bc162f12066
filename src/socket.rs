// SPDX-License-Identifier: Apache-2.0

use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream};
use tracing::debug;
use crate::error::{Operation, ResultContext};
use crate::error::ErrorKind::{NotReadable, NotWritable};
use crate::{Endpoint, Error, Result};

/// Liveness mask bit: further reads are expected to succeed.
pub const READABLE: u8 = 0b01;
/// Liveness mask bit: further writes are expected to succeed.
pub const WRITABLE: u8 = 0b10;

/// A connected TCP socket for blocking IO, tracking per-direction liveness
/// and cumulative byte counters.
///
/// The underlying handle is exclusively owned: `StreamSocket` cannot be
/// cloned, so two live values never share a handle. A direction's liveness
/// bit is cleared permanently on the first zero or failed transfer in that
/// direction; operations on a dead direction fail fast with
/// [`NotReadable`](crate::ErrorKind::NotReadable) /
/// [`NotWritable`](crate::ErrorKind::NotWritable) instead of reaching the OS.
#[derive(Debug, Default)]
pub struct StreamSocket {
	stream: Option<TcpStream>,
	rwmask: u8,
	bytes_in: u64,
	bytes_out: u64,
}

impl StreamSocket {
	/// Creates an inert, closed socket.
	pub fn new() -> Self { Self::default() }

	/// Connects to `endpoint`, returning a full-duplex socket.
	pub fn connect(endpoint: &Endpoint) -> Result<Self> {
		let stream = TcpStream::connect(endpoint.addr()).context(Operation::Connect)?;
		debug!(peer = %endpoint, "connected");
		Ok(stream.into())
	}

	pub fn is_open(&self) -> bool { self.stream.is_some() }

	/// Whether further reads are expected to succeed.
	pub fn can_read(&self) -> bool { self.rwmask & READABLE != 0 }

	/// Whether further writes are expected to succeed.
	pub fn can_write(&self) -> bool { self.rwmask & WRITABLE != 0 }

	/// Total bytes successfully read from the socket.
	pub fn bytes_in(&self) -> u64 { self.bytes_in }

	/// Total bytes successfully written into the socket.
	pub fn bytes_out(&self) -> u64 { self.bytes_out }

	/// Reads some bytes from the socket with a single receive call, returning
	/// the number of bytes read. A return of `0` means the peer closed its
	/// write side; the readable bit is cleared and stays clear. An OS-level
	/// failure also clears the bit and is raised as an IO error.
	///
	/// A zero-length `buf` reads nothing and carries no liveness information.
	pub fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
		if !self.can_read() {
			return Err(Error::new(Operation::Read, NotReadable, None))
		}
		if buf.is_empty() {
			return Ok(0)
		}
		let stream = self.stream.as_mut().ok_or_else(|| Error::closed(Operation::Read))?;
		match stream.read(buf) {
			Ok(0) => {
				self.rwmask &= !READABLE;
				Ok(0)
			}
			Ok(count) => {
				self.bytes_in += count as u64;
				Ok(count)
			}
			Err(error) => {
				self.rwmask &= !READABLE;
				Err(Error::io(Operation::Read, error))
			}
		}
	}

	/// Writes some bytes into the socket with a single send call, returning
	/// the number of bytes written. Symmetric to [`read_some`](Self::read_some)
	/// on the writable bit.
	pub fn write_some(&mut self, buf: &[u8]) -> Result<usize> {
		if !self.can_write() {
			return Err(Error::new(Operation::Write, NotWritable, None))
		}
		if buf.is_empty() {
			return Ok(0)
		}
		let stream = self.stream.as_mut().ok_or_else(|| Error::closed(Operation::Write))?;
		match stream.write(buf) {
			Ok(0) => {
				self.rwmask &= !WRITABLE;
				Ok(0)
			}
			Ok(count) => {
				self.bytes_out += count as u64;
				Ok(count)
			}
			Err(error) => {
				self.rwmask &= !WRITABLE;
				Err(Error::io(Operation::Write, error))
			}
		}
	}

	/// Reads exactly `buf.len()` bytes. A zero or failed transfer before the
	/// count is reached raises; a short read is never reported as success.
	/// Bytes transferred before a failure are still recorded in
	/// [`bytes_in`](Self::bytes_in).
	pub fn read(&mut self, mut buf: &mut [u8]) -> Result {
		while !buf.is_empty() {
			let count = self.read_some(buf)?;
			if count == 0 {
				return Err(Error::eos(Operation::Read))
			}
			buf = &mut buf[count..];
		}
		Ok(())
	}

	/// Writes exactly `buf.len()` bytes. Symmetric to [`read`](Self::read).
	pub fn write(&mut self, mut buf: &[u8]) -> Result {
		while !buf.is_empty() {
			let count = self.write_some(buf)?;
			if count == 0 {
				return Err(Error::eos(Operation::Write))
			}
			buf = &buf[count..];
		}
		Ok(())
	}

	/// Closes the socket, returning it to the never-opened state: handle
	/// released, liveness mask and both counters zeroed. Idempotent.
	pub fn close(&mut self) {
		if let Some(stream) = self.stream.take() {
			let _ = stream.shutdown(Shutdown::Both);
			self.rwmask = 0;
			self.bytes_in = 0;
			self.bytes_out = 0;
			debug!("socket closed");
		}
	}
}

impl From<TcpStream> for StreamSocket {
	/// Wraps an already-connected stream with full-duplex liveness.
	fn from(stream: TcpStream) -> Self {
		Self {
			stream: Some(stream),
			rwmask: READABLE | WRITABLE,
			bytes_in: 0,
			bytes_out: 0,
		}
	}
}

impl Drop for StreamSocket {
	fn drop(&mut self) { self.close() }
}
