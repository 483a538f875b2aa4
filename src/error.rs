use thiserror::Error as ThisError;

#[derive(Debug, ThisError, PartialEq)]
pub enum Error {
    #[error("invalid edge {start} -> {end}: {reason}")]
    InvalidEdge {
        start: String,
        end: String,
        reason: String,
    },
    #[error("graph has no nodes")]
    EmptyGraph,
    #[error("unknown node: {0}")]
    UnknownNode(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid distance matrix: {0}")]
    InvalidMatrix(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_edge(
        start: impl Into<String>,
        end: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidEdge {
            start: start.into(),
            end: end.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub fn invalid_matrix(message: impl Into<String>) -> Self {
        Self::InvalidMatrix(message.into())
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}
