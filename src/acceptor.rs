// SPDX-License-Identifier: Apache-2.0

use std::net::TcpListener;
use socket2::{Domain, Protocol, Socket, Type};
use tracing::debug;
use crate::error::{Operation, ResultContext};
use crate::{Endpoint, Error, Result, StreamSocket};

/// Default listen backlog.
pub const DEFAULT_BACKLOG: i32 = 5;

/// A passive socket producing connected [`StreamSocket`]s from inbound
/// connections.
#[derive(Debug, Default)]
pub struct SocketAcceptor {
	listener: Option<TcpListener>,
	/// The local endpoint the acceptor is bound to.
	name: Option<Endpoint>,
}

impl SocketAcceptor {
	pub fn new() -> Self { Self::default() }

	/// Binds to `endpoint` and starts listening. Fails with
	/// [`AlreadyOpen`](crate::ErrorKind::AlreadyOpen) on an acceptor that is
	/// already listening.
	pub fn listen(&mut self, endpoint: &Endpoint, backlog: i32) -> Result {
		if self.listener.is_some() {
			return Err(Error::already_open(Operation::Listen))
		}

		let addr = endpoint.addr();
		let domain = if addr.is_ipv4() { Domain::IPV4 } else { Domain::IPV6 };
		let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))
			.context(Operation::Listen)?;
		socket.bind(&addr.into()).context(Operation::Bind)?;
		socket.listen(backlog).context(Operation::Listen)?;

		let listener: TcpListener = socket.into();
		// Binding to port 0 picks an ephemeral port; report the real one.
		let local = listener.local_addr().context(Operation::Listen)?;
		debug!(local = %local, backlog, "listening");
		self.name = Some(local.into());
		self.listener = Some(listener);
		Ok(())
	}

	/// Blocks until an inbound connection arrives, returning it as a
	/// full-duplex [`StreamSocket`].
	pub fn accept(&mut self) -> Result<StreamSocket> {
		let listener = self.listener.as_ref().ok_or_else(|| Error::closed(Operation::Accept))?;
		let (stream, peer) = listener.accept().context(Operation::Accept)?;
		debug!(peer = %peer, "accepted connection");
		Ok(stream.into())
	}

	/// The endpoint the acceptor is actually bound to, once listening.
	pub fn local_endpoint(&self) -> Option<Endpoint> { self.name }

	pub fn is_open(&self) -> bool { self.listener.is_some() }

	/// Stops listening. Idempotent.
	pub fn close(&mut self) {
		if self.listener.take().is_some() {
			debug!("acceptor closed");
		}
		self.name = None;
	}
}

impl Drop for SocketAcceptor {
	fn drop(&mut self) { self.close() }
}
