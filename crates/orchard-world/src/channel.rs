//! The shared broadcast channel.
//!
//! A fixed-width byte buffer every agent can read. Scouts write to it with
//! their interaction action. There is no queue: each write replaces the whole
//! buffer, so the last writer in a tick wins.

/// Default channel width in bytes.
pub const DEFAULT_CHANNEL_BYTES: usize = 4;

/// Last-writer-wins broadcast buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Current contents; length never changes after construction.
    buffer: Vec<u8>,
}

impl Default for Channel {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_BYTES)
    }
}

impl Channel {
    /// Create a zero-filled channel `width` bytes wide.
    pub fn new(width: usize) -> Self {
        Self {
            buffer: vec![0; width],
        }
    }

    /// Replace the full buffer with `bytes`.
    ///
    /// Bytes past the channel width are dropped; positions not covered by
    /// `bytes` are zeroed.
    pub fn write(&mut self, bytes: &[u8]) {
        let mut incoming = bytes.iter().copied();
        for slot in &mut self.buffer {
            *slot = incoming.next().unwrap_or(0);
        }
    }

    /// Copy of the current contents.
    pub fn read(&self) -> Vec<u8> {
        self.buffer.clone()
    }

    /// Borrow the current contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Zero the buffer.
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        assert_eq!(Channel::default().read(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn single_byte_write_zero_fills_the_rest() {
        let mut channel = Channel::new(4);
        channel.write(&[9, 9, 9, 9]);
        channel.write(&[7]);
        assert_eq!(channel.read(), vec![7, 0, 0, 0]);
    }

    #[test]
    fn last_writer_wins() {
        let mut channel = Channel::new(2);
        channel.write(&[1]);
        channel.write(&[2]);
        assert_eq!(channel.as_bytes(), &[2, 0]);
    }

    #[test]
    fn oversized_write_is_truncated() {
        let mut channel = Channel::new(2);
        channel.write(&[1, 2, 3]);
        assert_eq!(channel.read(), vec![1, 2]);
    }

    #[test]
    fn clear_zeroes_without_shrinking() {
        let mut channel = Channel::new(3);
        channel.write(&[5, 6, 7]);
        channel.clear();
        assert_eq!(channel.read(), vec![0, 0, 0]);
    }
}
