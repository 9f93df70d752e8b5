use strum::{
    Display,
    EnumIter,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("provider error: {message}")]
    Provider { message: String },
    #[error("request to the CLC API failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("CLC API responded with status {status}: {message}")]
    ApiFailure { status: u16, message: String },
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

/// The three ways a provider call can fail, as far as callers care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum FailureKind {
    Provider,
    ApiFailure,
    MalformedRecord,
}

impl Error {
    pub fn provider(message: impl ToString) -> Self {
        Self::Provider {
            message: message.to_string(),
        }
    }

    /// Transport failures count as provider errors.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Provider { .. } | Self::Transport(_) => FailureKind::Provider,
            Self::ApiFailure { .. } => FailureKind::ApiFailure,
            Self::MalformedRecord(_) => FailureKind::MalformedRecord,
        }
    }
}
