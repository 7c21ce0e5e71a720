//! Link and protocol settings for the byte channel.

/// Default ring buffer capacity in bytes; one slot is always kept free
pub const BUFFER_SIZE: usize = 128;

/// Longest status line payload; longer messages are truncated
pub const MESSAGE_CAPACITY: usize = 128;

/// Byte channel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Link symbol rate in bits per second
    pub baudrate: u32,
    /// Vector format announced to the host at startup
    pub vector_format: &'static str,
    /// Ready token asking the host for more data
    pub more_data_token: &'static str,
    /// First backoff interval of each fill cycle, in milliseconds
    pub initial_backoff_ms: u32,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            vector_format: "XSVF",
            more_data_token: "SEND",
            initial_backoff_ms: 5,
        }
    }
}
