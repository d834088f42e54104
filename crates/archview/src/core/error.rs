//! Core error types for view composition
//!
//! Every fallible operation in the engine returns [`ViewResult`]. Best-effort
//! algorithms (nearest-neighbour expansion, default population, deployment
//! inclusion) match on [`ViewError::ContainmentRejected`] and carry on; every
//! other variant propagates to the caller.

use thiserror::Error;

/// Result alias used throughout the engine
pub type ViewResult<T> = Result<T, ViewError>;

/// Core error types for view composition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{element} is not permitted in view {view}: {reason}")]
    ContainmentRejected {
        element: String,
        view: String,
        reason: String,
    },

    #[error("Workspace validation failed: {message}")]
    WorkspaceValidation { message: String },
}

impl ViewError {
    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a new containment rejection naming the element and the view
    pub fn containment_rejected(
        element: impl Into<String>,
        view: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::ContainmentRejected {
            element: element.into(),
            view: view.into(),
            reason: reason.into(),
        }
    }

    /// Create a new workspace validation error
    pub fn workspace_validation(message: impl Into<String>) -> Self {
        Self::WorkspaceValidation {
            message: message.into(),
        }
    }

    /// Returns true if this error is a per-view-type policy rejection
    pub fn is_containment_rejected(&self) -> bool {
        matches!(self, ViewError::ContainmentRejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument() {
        let error = ViewError::invalid_argument("A key must be specified.");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Invalid argument"));
        assert!(error_msg.contains("A key must be specified."));
        assert!(!error.is_containment_rejected());
    }

    #[test]
    fn test_containment_rejected() {
        let error = ViewError::containment_rejected(
            "Web Application",
            "Containers",
            "its parent is already in this view",
        );
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Web Application"));
        assert!(error_msg.contains("Containers"));
        assert!(error_msg.contains("its parent is already in this view"));
        assert!(error.is_containment_rejected());
    }

    #[test]
    fn test_workspace_validation() {
        let error = ViewError::workspace_validation("element 42 does not exist");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Workspace validation failed"));
        assert!(error_msg.contains("element 42"));
    }
}
