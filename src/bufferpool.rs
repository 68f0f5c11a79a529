//! Byte-buffer recycling pool.
//!
//! Reduces allocation when proxying or streaming bytes: buffers are
//! handed out by [`BufferPool::acquire`] and returned by
//! [`BufferPool::release`] instead of being dropped. The binder itself
//! does not use the pool; it serves the surrounding I/O code.

use std::sync::Mutex;

use bytes::BytesMut;

/// Buffer capacity used when none is configured.
pub const DEFAULT_BUFFER_SIZE: usize = 32 * 1024;

/// A pool of reusable byte buffers of a fixed minimum capacity.
pub struct BufferPool {
    buffer_size: usize,
    free: Mutex<Vec<BytesMut>>,
}

impl BufferPool {
    /// Create a pool handing out buffers of at least `buffer_size`
    /// bytes capacity; `0` selects [`DEFAULT_BUFFER_SIZE`].
    pub fn new(buffer_size: usize) -> BufferPool {
        let buffer_size = if buffer_size == 0 {
            DEFAULT_BUFFER_SIZE
        } else {
            buffer_size
        };
        BufferPool {
            buffer_size,
            free: Mutex::new(Vec::new()),
        }
    }

    /// Take a cleared buffer from the pool, allocating a fresh one when
    /// the pool is empty.
    pub fn acquire(&self) -> BytesMut {
        let recycled = self
            .free
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop();
        match recycled {
            Some(buffer) => buffer,
            None => BytesMut::with_capacity(self.buffer_size),
        }
    }

    /// Return a buffer to the pool for reuse. The buffer is cleared;
    /// its capacity is kept.
    pub fn release(&self, mut buffer: BytesMut) {
        buffer.clear();
        self.free
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(buffer);
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        BufferPool::new(DEFAULT_BUFFER_SIZE)
    }
}
