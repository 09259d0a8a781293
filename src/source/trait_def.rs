use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::models::Event;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("upstream returned {status}: {reason}")]
    Status { status: u16, reason: String },
    #[error("failed to reach upstream: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid event payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read event file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Shared(#[from] Arc<SourceError>),
}

impl SourceError {
    /// Upstream HTTP status, looking through shared wrappers
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            SourceError::Status { status, .. } => Some(*status),
            SourceError::Shared(inner) => inner.upstream_status(),
            _ => None,
        }
    }

    /// Whether the upstream answered badly or could not be reached
    pub fn is_upstream_failure(&self) -> bool {
        match self {
            SourceError::Status { .. } | SourceError::Transport(_) | SourceError::Decode(_) => true,
            SourceError::Shared(inner) => inner.is_upstream_failure(),
            SourceError::Io(_) => false,
        }
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Anything that can hand over the current event list
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self) -> SourceResult<Vec<Event>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_visible_through_shared() {
        let err = SourceError::from(Arc::new(SourceError::Status {
            status: 503,
            reason: "Service Unavailable".to_string(),
        }));
        assert_eq!(err.upstream_status(), Some(503));
        assert!(err.is_upstream_failure());
        assert_eq!(err.to_string(), "upstream returned 503: Service Unavailable");
    }

    #[test]
    fn test_io_is_not_upstream() {
        let err = SourceError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert_eq!(err.upstream_status(), None);
        assert!(!err.is_upstream_failure());
    }
}
