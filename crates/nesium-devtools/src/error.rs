use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevtoolsError {
    #[error("no bookmark at ${addr:04X}")]
    NotFound { addr: u16 },

    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("recent project slot {slot} is empty")]
    RecentSlotEmpty { slot: usize },

    #[error("autofire pattern {index} out of range (have {count})")]
    UnknownPattern { index: usize, count: usize },

    #[error("state encoding error: {0}")]
    Encode(#[from] postcard::Error),
}
