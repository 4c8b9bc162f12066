// SPDX-License-Identifier: Apache-2.0

use crate::error::Operation::{BufPop, BufPush};
use crate::{Error, Result};

/// A fixed-capacity byte queue stored in one contiguous allocation, addressed
/// by a `front` offset (next unread byte) and a `tail` offset (one past the
/// last written byte), with `front <= tail <= capacity` at all times.
///
/// Unlike a ring buffer, the unread run `[front, tail)` and the free region
/// `[tail, capacity)` are always contiguous, so [`data`](Self::data) and
/// [`free_mut`](Self::free_mut) can hand out plain slices for zero-copy
/// splicing into socket calls. Free space is reclaimed from the head only by
/// an explicit [`trim`](Self::trim); whether and when to trim is the owner's
/// policy, not the queue's.
#[derive(Debug, Default)]
pub struct QueueBuffer {
	buf: Box<[u8]>,
	/// Offset of the queue front.
	front: usize,
	/// Offset of the queue tail.
	tail: usize,
}

impl QueueBuffer {
	/// Creates a queue of the given capacity. A capacity of `0` is valid and
	/// yields a disabled, permanently empty queue.
	pub fn new(capacity: usize) -> Self {
		Self {
			buf: vec![0; capacity].into_boxed_slice(),
			front: 0,
			tail: 0,
		}
	}

	/// Changes the capacity of the queue. Existing contents are dropped and
	/// both offsets reset to `0`.
	pub fn resize(&mut self, capacity: usize) {
		self.buf = vec![0; capacity].into_boxed_slice();
		self.front = 0;
		self.tail = 0;
	}

	/// Releases the backing storage, leaving a disabled queue.
	pub fn release(&mut self) { self.resize(0) }

	pub fn is_empty(&self) -> bool { self.front == self.tail }
	pub fn capacity(&self) -> usize { self.buf.len() }

	/// Number of unread bytes.
	pub fn len(&self) -> usize { self.tail - self.front }

	/// Free space at the tail. Space before `front` is not counted; it only
	/// becomes available after a [`trim`](Self::trim).
	pub fn free(&self) -> usize { self.buf.len() - self.tail }

	/// The unread run `[front, tail)`.
	pub fn data(&self) -> &[u8] { &self.buf[self.front..self.tail] }

	/// The writable region `[tail, capacity)`. Bytes written here become part
	/// of the queue once committed with [`push`](Self::push).
	pub fn free_mut(&mut self) -> &mut [u8] { &mut self.buf[self.tail..] }

	/// Moves the unread run to offset `0`, reclaiming leading space. No-op
	/// when `front` is already `0`; idempotent; preserves byte order.
	pub fn trim(&mut self) {
		if self.front > 0 {
			self.buf.copy_within(self.front..self.tail, 0);
			self.tail -= self.front;
			self.front = 0;
		}
	}

	/// Copies up to `dst.len()` unread bytes into `dst` without consuming
	/// them. Returns the number of bytes copied.
	pub fn copy(&self, dst: &mut [u8]) -> usize {
		let count = dst.len().min(self.len());
		dst[..count].copy_from_slice(&self.data()[..count]);
		count
	}

	/// Commits `count` bytes written into [`free_mut`](Self::free_mut),
	/// advancing the tail. Fails if the advance would exceed the capacity;
	/// the request is never clamped.
	pub fn push(&mut self, count: usize) -> Result {
		if count > self.free() {
			return Err(Error::out_of_range(BufPush))
		}
		self.tail += count;
		Ok(())
	}

	/// Consumes `count` bytes from the front. Fails if the advance would pass
	/// the tail; the request is never clamped.
	pub fn pop(&mut self, count: usize) -> Result {
		if count > self.len() {
			return Err(Error::out_of_range(BufPop))
		}
		self.front += count;
		Ok(())
	}
}
