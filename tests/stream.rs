// SPDX-License-Identifier: Apache-2.0

use std::thread::{self, JoinHandle};
use pretty_assertions::assert_eq;
use netio::{
	DEFAULT_BACKLOG, Endpoint, ErrorKind, LineStatus, Result, SocketAcceptor,
	SocketStream, StreamSocket,
};

/// Spawns an echo server on an ephemeral loopback port, serving `clients`
/// connections one after another.
fn echo_server(clients: usize) -> (Endpoint, JoinHandle<()>) {
	let mut acceptor = SocketAcceptor::new();
	acceptor.listen(&Endpoint::localhost(0), DEFAULT_BACKLOG).unwrap();
	let endpoint = acceptor.local_endpoint().unwrap();

	let handle = thread::spawn(move || {
		for _ in 0..clients {
			let mut stream = SocketStream::from(acceptor.accept().unwrap());
			let mut buf = [0; 4096];
			loop {
				let count = stream.read_some(&mut buf).unwrap();
				if count == 0 {
					break
				}
				stream.write(&buf[..count]).unwrap();
			}
		}
	});
	(endpoint, handle)
}

#[test]
fn exact_round_trip() -> Result {
	let (endpoint, server) = echo_server(1);
	let mut stream = SocketStream::connect(&endpoint)?;

	let mut total = 0;
	for size in [0, 1, 4095, 4096, 4097] {
		let sent: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
		let mut received = vec![0; size];
		stream.write(&sent)?;
		stream.read(&mut received)?;
		assert_eq!(received, sent);
		total += size as u64;
	}

	assert_eq!(stream.tellg(), total);
	assert_eq!(stream.tellp(), total);

	stream.close();
	server.join().unwrap();
	Ok(())
}

#[test]
fn line_by_line() -> Result {
	let (endpoint, server) = echo_server(1);
	let mut stream = SocketStream::connect(&endpoint)?;

	for line in ["", "1", "12", "123", "1234"] {
		stream.write(line.as_bytes())?;
		stream.write(b"\n")?;
	}

	for line in ["", "1", "12", "123", "1234"] {
		let mut buf = [0; 100];
		let read = stream.read_line(&mut buf, b'\n')?;
		assert_eq!(read.status, LineStatus::Delimited);
		assert_eq!(&buf[..read.len], line.as_bytes());
		assert_eq!(buf[read.len], 0);
	}

	stream.close();
	server.join().unwrap();
	Ok(())
}

#[test]
fn oversized_line_spans_refills() -> Result {
	let (endpoint, server) = echo_server(1);
	let mut stream = SocketStream::connect(&endpoint)?;

	let payload = vec![b'*'; 5000];
	stream.write(&payload)?;
	stream.write(b"\n")?;

	let mut buf = [0; 5004];
	let read = stream.read_line(&mut buf, b'\n')?;
	assert_eq!(read.status, LineStatus::Delimited);
	assert_eq!(read.len, 5000);
	assert_eq!(&buf[..read.len], &payload[..]);
	assert_eq!(buf[read.len], 0);

	stream.close();
	server.join().unwrap();
	Ok(())
}

#[test]
fn truncated_line_resumes() -> Result {
	let (endpoint, server) = echo_server(1);
	let mut stream = SocketStream::connect(&endpoint)?;

	stream.write(b"abcdef\n")?;

	let mut head = [0; 3];
	let read = stream.read_line(&mut head, b'\n')?;
	assert_eq!(read, netio::LineRead { len: 3, status: LineStatus::Truncated });
	assert_eq!(&head, b"abc");

	let mut rest = [0; 100];
	let read = stream.read_line(&mut rest, b'\n')?;
	assert_eq!(read.status, LineStatus::Delimited);
	assert_eq!(&rest[..read.len], b"def");

	stream.close();
	server.join().unwrap();
	Ok(())
}

#[test]
fn getch_reads_single_bytes() -> Result {
	let (endpoint, server) = echo_server(1);
	let mut stream = SocketStream::connect(&endpoint)?;

	stream.write(b"ab")?;
	assert_eq!(stream.getch()?, Some(b'a'));
	assert_eq!(stream.getch()?, Some(b'b'));
	assert_eq!(stream.tellg(), 2);

	stream.close();
	server.join().unwrap();
	Ok(())
}

#[test]
fn end_of_stream_is_terminal_not_an_error() -> Result {
	let mut acceptor = SocketAcceptor::new();
	acceptor.listen(&Endpoint::localhost(0), DEFAULT_BACKLOG)?;
	let endpoint = acceptor.local_endpoint().unwrap();

	let server = thread::spawn(move || {
		// Accept and close immediately: the peer observes a clean EOS.
		acceptor.accept().unwrap().close();
	});

	let mut stream = SocketStream::connect(&endpoint)?;
	server.join().unwrap();

	let mut buf = [0; 16];
	assert_eq!(stream.read_some(&mut buf)?, 0);
	assert!(!stream.can_read());

	let read = stream.read_line(&mut buf, b'\n')?;
	assert_eq!(read, netio::LineRead { len: 0, status: LineStatus::EndOfStream });
	assert_eq!(stream.getch()?, None);

	// The cleared liveness bit never comes back: further best-effort reads
	// are a misuse error, not a retried syscall.
	let err = stream.read_some(&mut buf).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::NotReadable));
	assert!(!stream.can_read());
	Ok(())
}

#[test]
fn short_read_raises_instead_of_partial_success() -> Result {
	let mut acceptor = SocketAcceptor::new();
	acceptor.listen(&Endpoint::localhost(0), DEFAULT_BACKLOG)?;
	let endpoint = acceptor.local_endpoint().unwrap();

	let server = thread::spawn(move || {
		let mut socket = acceptor.accept().unwrap();
		socket.write(b"abc").unwrap();
		socket.close();
	});

	let mut stream = SocketStream::connect(&endpoint)?;
	server.join().unwrap();

	let mut buf = [0; 10];
	let err = stream.read(&mut buf).unwrap_err();
	assert!(err.is_eos());
	Ok(())
}

#[test]
fn attach_to_open_stream_is_an_error() -> Result {
	let (endpoint, server) = echo_server(1);
	let mut stream = SocketStream::connect(&endpoint)?;

	let err = stream.attach(StreamSocket::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::AlreadyOpen));
	let err = stream.open(&endpoint).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::AlreadyOpen));

	stream.close();
	server.join().unwrap();
	Ok(())
}

#[test]
fn reopen_after_close() -> Result {
	let (endpoint, server) = echo_server(2);

	let mut stream = SocketStream::connect(&endpoint)?;
	stream.write(b"first\n")?;
	let mut buf = [0; 100];
	let read = stream.read_line(&mut buf, b'\n')?;
	assert_eq!(&buf[..read.len], b"first");
	stream.close();
	assert!(!stream.is_open());

	stream.open(&endpoint)?;
	assert_eq!(stream.tellg(), 0);
	assert_eq!(stream.tellp(), 0);
	stream.write(b"second\n")?;
	let read = stream.read_line(&mut buf, b'\n')?;
	assert_eq!(&buf[..read.len], b"second");

	stream.close();
	server.join().unwrap();
	Ok(())
}

#[test]
fn buffered_reads_do_not_reorder() -> Result {
	let (endpoint, server) = echo_server(1);
	let mut stream = SocketStream::connect(&endpoint)?;

	// One line and trailing bytes arrive together; the line read leaves the
	// trailing bytes buffered, and the exact read drains them in order.
	stream.write(b"line\ntail")?;

	let mut buf = [0; 100];
	let read = stream.read_line(&mut buf, b'\n')?;
	assert_eq!(&buf[..read.len], b"line");

	let mut tail = [0; 4];
	stream.read(&mut tail)?;
	assert_eq!(&tail, b"tail");
	assert_eq!(stream.tellg(), 9);

	stream.close();
	server.join().unwrap();
	Ok(())
}

#[test]
fn host_not_found() {
	let err = Endpoint::new("host.invalid", 1).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::HostNotFound));
}
