//! Error types for tz-engine operations.
//!
//! Most public conversion and detection functions never return these: they
//! degrade to a safe value instead. The error type is used by the fallible
//! core functions underneath them and at input boundaries.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TzError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid wall-clock time: {0}")]
    InvalidTime(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    #[error("Local time {time} does not exist in {timezone}")]
    NonexistentLocalTime { time: String, timezone: String },

    #[error("Detection failed: {0}")]
    Detection(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Profile store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, TzError>;
