// SPDX-License-Identifier: Apache-2.0

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::{io, result};
use amplify_derive::Display;

pub type ErrorBox = Box<dyn StdError + Send + Sync>;
pub type Result<T = ()> = result::Result<T, Error>;

/// The operation an [`Error`] occurred in.
#[derive(Copy, Clone, Debug, Default, Display)]
pub enum Operation {
	#[default]
	#[display("unknown operation")]
	Unknown,
	#[display("resolve endpoint")]
	Resolve,
	#[display("connect")]
	Connect,
	#[display("bind")]
	Bind,
	#[display("listen")]
	Listen,
	#[display("accept")]
	Accept,
	#[display("attach socket")]
	Attach,
	#[display("read from socket")]
	Read,
	#[display("write to socket")]
	Write,
	#[display("push to buffer")]
	BufPush,
	#[display("pop from buffer")]
	BufPop,
}

#[derive(Copy, Clone, Debug, Display)]
pub enum ErrorKind {
	#[display("host not found")]
	HostNotFound,
	#[display("invalid address")]
	InvalidAddress,
	#[display("IO error")]
	Io,
	#[display("premature end-of-stream")]
	Eos,
	#[display("socket is not readable")]
	NotReadable,
	#[display("socket is not writable")]
	NotWritable,
	#[display("socket is closed")]
	Closed,
	#[display("stream is already open")]
	AlreadyOpen,
	#[display("offset out of range")]
	OutOfRange,
	#[display("{0}")]
	Other(&'static str),
}

#[derive(Debug)]
pub struct Error {
	op: Operation,
	kind: ErrorKind,
	source: Option<ErrorBox>,
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let Self { op, kind, source } = self;
		if let Some(source) = source {
			write!(f, "{op} failed; {kind} ({source})")
		} else {
			write!(f, "{op} failed; {kind}")
		}
	}
}

impl StdError for Error {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		if let Some(ref source) = self.source {
			Some(source.as_ref())
		} else {
			None
		}
	}
}

impl Error {
	pub(crate) fn new(op: Operation, kind: ErrorKind, source: Option<ErrorBox>) -> Self {
		Self { op, kind, source }
	}

	/// Creates a new IO error.
	pub fn io(op: Operation, error: io::Error) -> Self {
		Self::new(op, ErrorKind::Io, Some(error.into()))
	}

	/// Creates a new "end-of-stream" error.
	pub fn eos(op: Operation) -> Self { Self::new(op, ErrorKind::Eos, None) }

	/// Creates a new "closed" error.
	pub fn closed(op: Operation) -> Self { Self::new(op, ErrorKind::Closed, None) }

	/// Creates a new "already open" error.
	pub fn already_open(op: Operation) -> Self {
		Self::new(op, ErrorKind::AlreadyOpen, None)
	}

	/// Creates a new "out of range" error.
	pub fn out_of_range(op: Operation) -> Self {
		Self::new(op, ErrorKind::OutOfRange, None)
	}

	/// Creates a new "host not found" error.
	pub fn host_not_found(source: Option<ErrorBox>) -> Self {
		Self::new(Operation::Resolve, ErrorKind::HostNotFound, source)
	}

	/// Creates a new "invalid address" error.
	pub fn invalid_address() -> Self {
		Self::new(Operation::Resolve, ErrorKind::InvalidAddress, None)
	}

	/// Creates a new error with a custom message.
	pub fn other(op: Operation, message: &'static str) -> Self {
		Self::new(op, ErrorKind::Other(message), None)
	}

	/// Returns the operation the error occurred in.
	pub fn operation(&self) -> Operation { self.op }

	/// Sets the operation the error occurred in.
	pub fn with_operation(mut self, op: Operation) -> Self {
		self.op = op;
		self
	}

	/// Returns the error kind.
	pub fn kind(&self) -> ErrorKind { self.kind }

	/// Returns `true` for an end-of-stream error.
	pub fn is_eos(&self) -> bool { matches!(self.kind, ErrorKind::Eos) }

	/// Returns the source downcast into an IO error, if possible.
	pub fn io_source(&self) -> Option<&io::Error> {
		self.source()?.downcast_ref()
	}

	/// Returns the OS error code of an IO error, if one is available.
	pub fn os_code(&self) -> Option<i32> {
		self.io_source()?.raw_os_error()
	}
}

impl From<&'static str> for Error {
	fn from(value: &'static str) -> Self {
		Self::other(Operation::Unknown, value)
	}
}

pub(crate) trait ResultContext<T> {
	/// Converts an IO result into a crate result, attaching the operation the
	/// failure occurred in.
	fn context(self, op: Operation) -> Result<T>;
}

impl<T> ResultContext<T> for io::Result<T> {
	fn context(self, op: Operation) -> Result<T> {
		self.map_err(|error| Error::io(op, error))
	}
}
