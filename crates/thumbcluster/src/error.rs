//! Error taxonomy for cluster builds.
//!
//! Every variant is fatal: a build either yields complete, connected solids or
//! returns one of these. Nothing is retried or recovered inside the crate.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ClusterError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusterError {
    /// Malformed parameters (wrong arity, non-finite values, missing entries).
    #[error("invalid configuration `{field}`: {reason}")]
    Configuration { field: String, reason: String },
    /// Degenerate input to a hull/union primitive.
    #[error("geometry error in {context}: {reason}")]
    Geometry { context: String, reason: String },
    /// The assembled web/wall would not form one closed shell.
    #[error("adjacency gap: {reason}")]
    AdjacencyGap { reason: String },
}

impl ClusterError {
    pub(crate) fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn geometry(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Geometry {
            context: context.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn gap(reason: impl Into<String>) -> Self {
        Self::AdjacencyGap {
            reason: reason.into(),
        }
    }

    /// True for parameter errors, which are detected before any geometry call.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
