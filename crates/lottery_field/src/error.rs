//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Most runtime paths in the field controller degrade instead of failing, so these
//! variants mainly surface at configuration, catalog and persistence boundaries.
use thiserror::Error;

use crate::prize::PrizeId;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("weight must be a finite value > 0 (got {weight})")]
    InvalidWeight { weight: f32 },

    #[error("unknown prize {id}")]
    UnknownPrize { id: PrizeId },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
