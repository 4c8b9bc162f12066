// SPDX-License-Identifier: Apache-2.0

//! A buffered, blocking socket IO library.
//!
//! ## How it works
//!
//! Three components layer semantic reads over raw socket calls. A
//! [`QueueBuffer`] is a fixed-capacity contiguous byte queue addressed by
//! front and tail offsets; free space is reclaimed by an explicit compaction
//! step rather than a ring layout, so its cursors always yield contiguous
//! slices for zero-copy refills. A [`StreamSocket`] owns one connected TCP
//! handle and adds per-direction liveness tracking and byte counters to the
//! bare `read`/`write` calls, which may transfer fewer bytes than requested
//! at any time. A [`SocketStream`] composes the two: exact-length reads and
//! writes, best-effort reads, and delimiter-terminated reads
//! ([`read_line`](SocketStream::read_line), [`getch`](SocketStream::getch))
//! that splice previously-buffered bytes ahead of fresh socket reads.
//!
//! Everything is synchronous: a call blocks its thread until the contract is
//! satisfied or a failure occurs. Concurrency, such as one thread per
//! accepted connection, is the caller's business. [`Endpoint`] resolves
//! host/port pairs and `tcp://host:port` names; [`SocketAcceptor`] produces
//! connected sockets from inbound connections.
//!
//! ```no_run
//! use netio::{Endpoint, Result, SocketStream};
//!
//! fn main() -> Result {
//! 	let mut stream = SocketStream::connect(&Endpoint::new("example.com", 7070)?)?;
//! 	stream.write(b"hello\n")?;
//!
//! 	let mut line = [0; 256];
//! 	let reply = stream.read_line(&mut line, b'\n')?;
//! 	println!("{}", String::from_utf8_lossy(&line[..reply.len]));
//! 	Ok(())
//! }
//! ```

mod acceptor;
mod endpoint;
mod error;
mod queue;
mod socket;
mod stream;

pub use acceptor::{DEFAULT_BACKLOG, SocketAcceptor};
pub use endpoint::Endpoint;
pub use error::{Error, ErrorBox, ErrorKind, Operation, Result};
pub use queue::QueueBuffer;
pub use socket::{READABLE, StreamSocket, WRITABLE};
pub use stream::{DEFAULT_BUFFER_SIZE, LineRead, LineStatus, SocketStream};
