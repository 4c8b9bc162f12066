// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Display, Formatter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, ToSocketAddrs};
use crate::{Error, Result};

/// A resolved network endpoint.
///
/// Resolution happens at construction through the blocking system resolver;
/// an `Endpoint` always holds a concrete address. When a host resolves to
/// both IPv4 and IPv6 addresses, IPv4 is preferred.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Endpoint {
	addr: SocketAddr,
}

impl Endpoint {
	/// Resolves `host` and pairs it with `port`.
	pub fn new(host: &str, port: u16) -> Result<Self> {
		let addrs = (host, port)
			.to_socket_addrs()
			.map_err(|error| Error::host_not_found(Some(error.into())))?;
		let mut fallback = None;
		for addr in addrs {
			if addr.is_ipv4() {
				return Ok(Self { addr })
			}
			fallback.get_or_insert(addr);
		}
		fallback
			.map(|addr| Self { addr })
			.ok_or_else(|| Error::host_not_found(None))
	}

	/// Parses a uniform name of the form `tcp://host:port`.
	pub fn from_uname(uname: &str) -> Result<Self> {
		let rest = uname.strip_prefix("tcp://").ok_or_else(Error::invalid_address)?;
		let (host, port) = rest.rsplit_once(':').ok_or_else(Error::invalid_address)?;
		let port = port.parse().map_err(|_| Error::invalid_address())?;
		Self::new(host, port)
	}

	/// The endpoint in `tcp://<addr>:<port>` format.
	pub fn to_uname(&self) -> String { format!("tcp://{}", self.addr) }

	/// The endpoint in `<addr>:<port>` format.
	pub fn name(&self) -> String { self.addr.to_string() }

	pub fn addr(&self) -> SocketAddr { self.addr }
	pub fn port(&self) -> u16 { self.addr.port() }

	/// An endpoint bound to `127.0.0.1`.
	pub fn localhost(port: u16) -> Self {
		SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port).into()
	}

	/// An endpoint bound to `0.0.0.0`.
	pub fn any(port: u16) -> Self {
		SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port).into()
	}
}

impl From<SocketAddr> for Endpoint {
	fn from(addr: SocketAddr) -> Self { Self { addr } }
}

impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.addr, f)
	}
}
