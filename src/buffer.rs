//! Reusable text buffers.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

/// An idle buffer above this count is dropped instead of retained.
const MAX_FREE: usize = 8;

/// A pool of growable text buffers.
///
/// `acquire` hands out a [`PooledBuffer`] guard; dropping the guard clears
/// the buffer and returns it to the pool with its capacity kept, on every
/// exit path.
#[derive(Clone, Default)]
pub struct BufferPool {
    free: Rc<RefCell<Vec<String>>>,
}

impl BufferPool {
    pub fn new() -> Self {
        BufferPool::default()
    }

    /// Returns a free buffer, or allocates one.
    pub fn acquire(&self) -> PooledBuffer {
        let buf = self.free.borrow_mut().pop().unwrap_or_default();
        PooledBuffer {
            free: Rc::clone(&self.free),
            buf,
        }
    }

    /// The number of idle buffers currently retained.
    pub fn idle(&self) -> usize {
        self.free.borrow().len()
    }
}

/// A buffer borrowed from a [`BufferPool`].
pub struct PooledBuffer {
    free: Rc<RefCell<Vec<String>>>,
    buf: String,
}

impl PooledBuffer {
    /// Removes the last `n` characters.
    pub fn drop_back(&mut self, n: usize) {
        for _ in 0..n {
            if self.buf.pop().is_none() {
                break;
            }
        }
    }

    /// Returns the accumulated text and leaves the buffer empty.
    pub fn take_value(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }
}

impl Deref for PooledBuffer {
    type Target = String;

    fn deref(&self) -> &String {
        &self.buf
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut String {
        &mut self.buf
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        let mut free = self.free.borrow_mut();
        if free.len() < MAX_FREE {
            let mut buf = std::mem::take(&mut self.buf);
            buf.clear();
            free.push(buf);
        }
    }
}
