//! Error handling for the GPIO web bridge.

/// A specialized `Result` type for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// The main error type for GPIO bridge operations.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A GPIO line read or write failed
    #[error("GPIO error: {0}")]
    Gpio(String),

    /// An ADC channel outside 0..=7 was requested
    #[error("Invalid ADC channel: {0} (expected 0..=7)")]
    InvalidChannel(u8),

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    /// Create a new GPIO error
    pub fn gpio_error(msg: impl Into<String>) -> Self {
        Self::Gpio(msg.into())
    }

    /// Create a new web server error
    pub fn web_server_error(msg: impl Into<String>) -> Self {
        Self::WebServer(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
