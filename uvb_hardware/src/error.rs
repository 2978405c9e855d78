use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("adc not connected")]
    Disconnected,
    #[error("power rail: {0}")]
    PowerRail(String),
    #[error("store: {0}")]
    Store(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;
