// SPDX-License-Identifier: Apache-2.0

use std::cmp::min;
use crate::error::Operation;
use crate::{Endpoint, Error, QueueBuffer, Result, StreamSocket};

/// Default read look-ahead capacity in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// How a [`read_line`](SocketStream::read_line) call ended.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineStatus {
	/// The delimiter was found and consumed. Its slot in `dst` holds a `0`
	/// terminator; the payload before it excludes the delimiter.
	Delimited,
	/// `dst` filled up before the delimiter appeared. No terminator is
	/// written; the line continues in subsequent reads.
	Truncated,
	/// The peer closed its write side before the delimiter or the cap was
	/// reached. No terminator is written.
	EndOfStream,
}

/// Result of a [`read_line`](SocketStream::read_line) call: the payload
/// length written to `dst` (terminator excluded) and how the read ended.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LineRead {
	pub len: usize,
	pub status: LineStatus,
}

/// A buffered stream over one [`StreamSocket`], layering exact-length and
/// delimiter-terminated reads on top of the socket's short-read semantics.
///
/// The only state carried between calls is the internal read look-ahead:
/// bytes already pulled from the kernel but not yet consumed. Buffered bytes
/// always take priority over fresh socket reads, preserving transmission
/// order. Writes are a pure pass-through; there is no write buffering.
///
/// All operations block the calling thread until their contract is satisfied
/// or a failure occurs. There are no timeouts and no cancellation beyond
/// [`close`](Self::close); a stream is owned by one execution context.
#[derive(Debug)]
pub struct SocketStream {
	socket: StreamSocket,
	buf: QueueBuffer,
	buf_size: usize,
}

impl Default for SocketStream {
	fn default() -> Self { Self::new() }
}

impl SocketStream {
	/// Creates an empty stream with the default look-ahead capacity.
	pub fn new() -> Self { Self::with_buffer_size(DEFAULT_BUFFER_SIZE) }

	/// Creates an empty stream with the given look-ahead capacity.
	pub fn with_buffer_size(capacity: usize) -> Self {
		Self {
			socket: StreamSocket::new(),
			buf: QueueBuffer::new(capacity),
			buf_size: capacity,
		}
	}

	/// Connects to `endpoint`, returning an open stream.
	pub fn connect(endpoint: &Endpoint) -> Result<Self> {
		let mut stream = Self::new();
		stream.open(endpoint)?;
		Ok(stream)
	}

	/// Connects the stream to `endpoint`. The stream must be empty or
	/// closed; rebinding a live stream is an error.
	pub fn open(&mut self, endpoint: &Endpoint) -> Result {
		if self.socket.is_open() {
			return Err(Error::already_open(Operation::Connect))
		}
		self.attach(StreamSocket::connect(endpoint)?)
	}

	/// Attaches an already-connected socket, taking ownership of it. The
	/// stream must be empty or closed; attaching to a live stream is an
	/// error.
	pub fn attach(&mut self, socket: StreamSocket) -> Result {
		if self.socket.is_open() {
			return Err(Error::already_open(Operation::Attach))
		}
		if self.buf.capacity() < self.buf_size {
			// Reopening after close, which released the buffer.
			self.buf.resize(self.buf_size);
		}
		self.socket = socket;
		Ok(())
	}

	/// Reads exactly `dst.len()` bytes, draining buffered bytes first and
	/// delegating the remainder to the socket. On success the content is
	/// indistinguishable from a single read of an unbuffered socket; on
	/// failure the error propagates and the stream should be treated as
	/// broken.
	pub fn read(&mut self, dst: &mut [u8]) -> Result {
		let taken = self.local_read(dst)?;
		self.socket.read(&mut dst[taken..])
	}

	/// Best-effort read: serves entirely from the buffer when it holds any
	/// bytes, otherwise performs exactly one socket read. Returns `0` only
	/// at end of stream (or for an empty `dst`).
	pub fn read_some(&mut self, dst: &mut [u8]) -> Result<usize> {
		if dst.is_empty() {
			return Ok(0)
		}
		let taken = self.local_read(dst)?;
		if taken > 0 {
			return Ok(taken)
		}
		self.socket.read_some(dst)
	}

	/// Writes exactly `src.len()` bytes. Pass-through to the socket.
	pub fn write(&mut self, src: &[u8]) -> Result { self.socket.write(src) }

	/// Writes some bytes, returning the count. Pass-through to the socket.
	pub fn write_some(&mut self, src: &[u8]) -> Result<usize> {
		self.socket.write_some(src)
	}

	/// Reads bytes up to and including `delim`, capped by `dst.len()`.
	///
	/// When the delimiter is found it is consumed from the stream but not
	/// included in the payload: its slot in `dst` is overwritten with a `0`
	/// terminator. When `dst` fills first the read ends with
	/// [`Truncated`](LineStatus::Truncated) and the rest of the line stays
	/// readable. A zero-byte refill while scanning ends the read with
	/// [`EndOfStream`](LineStatus::EndOfStream) rather than blocking or
	/// raising.
	pub fn read_line(&mut self, dst: &mut [u8], delim: u8) -> Result<LineRead> {
		let cap = dst.len();
		let mut copied = 0;
		let mut delimited = false;

		while !delimited && copied < cap {
			if self.buf.is_empty() && self.refill()? == 0 {
				return Ok(LineRead { len: copied, status: LineStatus::EndOfStream })
			}

			let run = min(self.buf.len(), cap - copied);
			let mut taken = 0;
			for &byte in &self.buf.data()[..run] {
				dst[copied] = byte;
				copied += 1;
				taken += 1;
				if byte == delim {
					delimited = true;
					break
				}
			}
			self.buf.pop(taken)?;
		}

		if delimited {
			copied -= 1;
			dst[copied] = 0;
			Ok(LineRead { len: copied, status: LineStatus::Delimited })
		} else {
			Ok(LineRead { len: copied, status: LineStatus::Truncated })
		}
	}

	/// Reads a single byte, or `None` at end of stream.
	pub fn getch(&mut self) -> Result<Option<u8>> {
		if self.buf.is_empty() && self.refill()? == 0 {
			return Ok(None)
		}
		let byte = self.buf.data()[0];
		self.buf.pop(1)?;
		Ok(Some(byte))
	}

	/// Refills the empty look-ahead with one socket read, returning the byte
	/// count. Returns `0` at end of stream, including on a stream whose read
	/// direction is already dead, so callers see a terminal condition rather
	/// than a misuse error on repeated reads past the end.
	fn refill(&mut self) -> Result<usize> {
		if !self.socket.can_read() {
			return Ok(0)
		}
		self.buf.trim();
		let count = self.socket.read_some(self.buf.free_mut())?;
		self.buf.push(count)?;
		Ok(count)
	}

	/// Drains buffered bytes into `dst`, returning the count taken.
	fn local_read(&mut self, dst: &mut [u8]) -> Result<usize> {
		if self.buf.is_empty() {
			return Ok(0)
		}
		let taken = self.buf.copy(dst);
		self.buf.pop(taken)?;
		Ok(taken)
	}

	/// Read position: bytes consumed by the caller. Computed as the socket's
	/// [`bytes_in`](StreamSocket::bytes_in) minus the buffered unread length,
	/// so look-ahead bytes the caller has not seen yet are not counted.
	pub fn tellg(&self) -> u64 {
		self.socket.bytes_in() - self.buf.len() as u64
	}

	/// Write position: bytes written by the caller.
	pub fn tellp(&self) -> u64 { self.socket.bytes_out() }

	pub fn is_open(&self) -> bool { self.socket.is_open() }
	pub fn can_read(&self) -> bool { self.socket.can_read() }
	pub fn can_write(&self) -> bool { self.socket.can_write() }

	/// Closes the socket and releases the look-ahead buffer together.
	/// Idempotent; [`open`](Self::open) or [`attach`](Self::attach)
	/// re-provision the buffer.
	pub fn close(&mut self) {
		self.socket.close();
		self.buf.release();
	}
}

impl From<StreamSocket> for SocketStream {
	/// Wraps an already-connected socket, taking ownership of it.
	fn from(socket: StreamSocket) -> Self {
		Self {
			socket,
			buf: QueueBuffer::new(DEFAULT_BUFFER_SIZE),
			buf_size: DEFAULT_BUFFER_SIZE,
		}
	}
}
