use thiserror::Error;

use crate::element::ApiVersion;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("batch for version {version} arrived after version {last}")]
    VersionOutOfOrder { version: ApiVersion, last: ApiVersion },

    #[error("observations cannot be merged once cleanup has run")]
    AlreadyCleaned,

    #[error("invalid api-versions XML: {0}")]
    InvalidXml(String),

    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
}
