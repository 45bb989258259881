use docubricks_models::ModelError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum DocubricksError {
    #[error("Document error: {message}")]
    Document { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Model error: {message}")]
    Model { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },
}

impl DocubricksError {
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn model(message: impl Into<String>) -> Self {
        Self::Model {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Document { .. } => "DOCUMENT_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Model { .. } => "MODEL_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Io { .. } => "IO_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
        }
    }
}

pub type DocubricksResult<T> = Result<T, DocubricksError>;

// Conversion from common error types
impl From<ModelError> for DocubricksError {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::UnresolvedBrick { id } => Self::not_found(format!("brick {}", id)),
            ModelError::UnresolvedPart { id } => Self::not_found(format!("part {}", id)),
            other => Self::model(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for DocubricksError {
    fn from(error: serde_json::Error) -> Self {
        Self::document(format!("JSON: {}", error))
    }
}

impl From<quick_xml::Error> for DocubricksError {
    fn from(error: quick_xml::Error) -> Self {
        Self::document(format!("XML: {}", error))
    }
}

impl From<config::ConfigError> for DocubricksError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}

impl From<std::io::Error> for DocubricksError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_errors_map_to_codes() {
        let err: DocubricksError = ModelError::unresolved_part("P9").into();
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(err.to_string(), "Not found: part P9");

        let err: DocubricksError = ModelError::CyclicComposition {
            path: vec!["A".into(), "B".into(), "A".into()],
        }
        .into();
        assert_eq!(err.error_code(), "MODEL_ERROR");
        assert_eq!(
            err.to_string(),
            "Model error: Cyclic brick composition: A -> B -> A"
        );
    }

    #[test]
    fn test_json_error_is_document_error() {
        let err: DocubricksError =
            serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.error_code(), "DOCUMENT_ERROR");
    }

    #[test]
    fn test_io_error_keeps_message() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: DocubricksError = io.into();
        assert_eq!(err.error_code(), "IO_ERROR");
        assert_eq!(err.to_string(), "I/O error: no such file");
    }
}
