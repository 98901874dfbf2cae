use serde::Serialize;

use crate::error::DeleteError;

/// Outcome of a tag deletion request, serialized as
/// `{"status": "success", "deleted": [...]}` or
/// `{"status": "error", "message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeleteTagsResponse {
    Success { deleted: Vec<String> },
    Error { message: String },
}

impl DeleteTagsResponse {
    pub fn success(deleted: Vec<String>) -> Self { Self::Success { deleted } }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool { matches!(self, Self::Success { .. }) }

    /// Tags removed from the repository, empty on error.
    pub fn deleted(&self) -> &[String] {
        match self {
            Self::Success { deleted } => deleted,
            Self::Error { .. } => &[],
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Error { message } => Some(message),
        }
    }
}

impl From<Result<Vec<String>, DeleteError>> for DeleteTagsResponse {
    fn from(result: Result<Vec<String>, DeleteError>) -> Self {
        match result {
            Ok(deleted) => Self::success(deleted),
            Err(err) => Self::error(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let response = DeleteTagsResponse::success(vec!["v1".into(), "latest".into()]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"status": "success", "deleted": ["v1", "latest"]}));
        assert!(response.message().is_none());
    }

    #[test]
    fn test_error_from_result() {
        let response = DeleteTagsResponse::from(Err(DeleteError::Timeout { tags_count: 3 }));
        assert!(!response.is_success());
        assert!(response.deleted().is_empty());
        assert_eq!(response.message(), Some("Timeout while deleting tags"));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
    }
}
