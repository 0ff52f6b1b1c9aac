/// Default upper bound of a single encoded message, 64 MiB.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// WireConfig controls serialization of wire messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireConfig {
    max_message_size: usize,
}

impl Default for WireConfig {
    #[inline]
    fn default() -> Self {
        WireConfig {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl WireConfig {
    #[inline]
    pub fn with_max_message_size(mut self, max_message_size: usize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    #[inline]
    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }
}
