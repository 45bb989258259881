//! Project Loader
//!
//! Entry point for turning a document (JSON snapshot or XML markup) into a
//! [`Project`]. Format is taken from the caller or detected from the file
//! name.

use std::path::Path;

use docubricks_models::{Project, ProjectSnapshot};

use super::markup;
use super::validator::{ProjectValidator, ValidationResult};
use crate::config::LoaderConfig;
use crate::error::{DocubricksError, DocubricksResult};
use crate::validation::{validate_entities, validate_file_size, validate_file_type};

/// File extensions [`ProjectLoader::load_path`] accepts.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xml", "json"];

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// A previously serialized in-memory project
    Json,
    /// `<docubricks>` markup
    Xml,
}

impl DocumentFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }
}

/// A loaded project together with how it was read.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub project: Project,
    pub source: String,
    pub format: DocumentFormat,
    /// Present when reference validation is enabled.
    pub validation: Option<ValidationResult>,
}

pub struct ProjectLoader {
    config: LoaderConfig,
    validator: ProjectValidator,
}

impl Default for ProjectLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl ProjectLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            validator: ProjectValidator::new(),
        }
    }

    pub fn with_validator(mut self, validator: ProjectValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Read and load a document from disk. Files without a supported
    /// extension are rejected before they are read.
    pub fn load_path(&self, path: impl AsRef<Path>) -> DocubricksResult<LoadedProject> {
        let path = path.as_ref();
        let source = path.to_string_lossy();
        validate_file_type(&source, SUPPORTED_EXTENSIONS)?;
        let data = std::fs::read(path)?;
        self.load_bytes(&source, &data, None)
    }

    pub fn load_str(
        &self,
        source: &str,
        data: &str,
        format: DocumentFormat,
    ) -> DocubricksResult<LoadedProject> {
        self.load_bytes(source, data.as_bytes(), Some(format))
    }

    /// Load a document from bytes
    pub fn load_bytes(
        &self,
        source: &str,
        data: &[u8],
        format: Option<DocumentFormat>,
    ) -> DocubricksResult<LoadedProject> {
        validate_file_size(data.len() as u64, self.config.max_document_bytes)?;

        let format = format
            .or_else(|| DocumentFormat::from_extension(Path::new(source)))
            .ok_or_else(|| {
                DocubricksError::validation(
                    "format",
                    format!("Could not determine format of {}", source),
                )
            })?;

        crate::log_info!("Loading {:?} document {}", format, source);
        let snapshot = match format {
            DocumentFormat::Json => parse_snapshot(data)?,
            DocumentFormat::Xml => markup::parse_document(data)?,
        };

        validate_entities(&snapshot.bricks, &snapshot.parts, &snapshot.authors)?;
        let project = Project::try_from(snapshot)?;
        crate::log_info!(
            "Loaded project '{}' with {} bricks and {} parts",
            project.name_of_project(),
            project.bricks().len(),
            project.parts().len()
        );

        let validation = if self.config.validate_references {
            Some(self.check_references(source, &project)?)
        } else {
            None
        };

        Ok(LoadedProject {
            project,
            source: source.to_string(),
            format,
            validation,
        })
    }

    fn check_references(
        &self,
        source: &str,
        project: &Project,
    ) -> DocubricksResult<ValidationResult> {
        let result = self.validator.validate(project);

        for issue in &result.issues {
            crate::log_debug!("{}: {:?} {}", source, issue.severity, issue.message);
        }
        if result.warning_count > 0 {
            crate::log_warn!("{}: {} reference warnings", source, result.warning_count);
        }

        if !result.is_valid {
            let messages: Vec<&str> = result.errors().map(|i| i.message.as_str()).collect();
            let error = DocubricksError::validation("references", messages.join("; "));
            if self.config.reject_on_errors {
                return Err(error);
            }
            crate::log_error!(error, "Project has unresolved references");
        }
        Ok(result)
    }
}

/// Deserializes a snapshot. Function ids left empty are numbered by
/// position.
pub fn parse_snapshot(data: &[u8]) -> DocubricksResult<ProjectSnapshot> {
    let mut snapshot: ProjectSnapshot = serde_json::from_slice(data)?;
    for brick in &mut snapshot.bricks {
        for (index, function) in brick.functions.iter_mut().enumerate() {
            if function.id.is_empty() {
                function.id = index.to_string();
            }
        }
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docubricks_models::ImplementationKind;

    const SNAPSHOT: &str = r#"{
        "bricks": [
            {
                "id": "top",
                "name": "Top",
                "functions": [
                    {"implementations": [
                        {"type": "part", "id": "p", "quantity": 2},
                        {"type": "brick", "id": "sub", "quantity": 3}
                    ]}
                ]
            },
            {
                "id": "sub",
                "name": "Sub",
                "functions": [{"implementations": [{"type": "part", "id": "q", "quantity": 5}]}]
            }
        ],
        "parts": [{"id": "p", "name": "P"}, {"id": "q", "description": "Q part"}],
        "authors": []
    }"#;

    #[test]
    fn test_format_detection() {
        let detect = |name: &str| DocumentFormat::from_extension(Path::new(name));
        assert_eq!(detect("a.json"), Some(DocumentFormat::Json));
        assert_eq!(detect("a.XML"), Some(DocumentFormat::Xml));
        assert_eq!(detect("a.txt"), None);
    }

    #[test]
    fn test_load_snapshot() {
        let loaded = ProjectLoader::default()
            .load_bytes("project.json", SNAPSHOT.as_bytes(), None)
            .unwrap();

        assert_eq!(loaded.format, DocumentFormat::Json);
        assert_eq!(loaded.project.name_of_project(), "Top");
        assert_eq!(loaded.project.bricks()[0].functions[0].id, "0");
        assert_eq!(loaded.project.part_by_name("q").unwrap().name, "Q part");
        assert!(loaded.validation.unwrap().is_valid);

        let bom = loaded.project.bom("top", true).unwrap();
        assert_eq!(bom.quantity("p"), Some(2.0));
        assert_eq!(bom.quantity("q"), Some(15.0));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let err = ProjectLoader::default().load_bytes("project.txt", b"{}", None).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_oversized_document_is_rejected() {
        let loader = ProjectLoader::new(LoaderConfig {
            max_document_bytes: 4,
            ..LoaderConfig::default()
        });
        assert!(loader.load_str("p", "{\"bricks\": []}", DocumentFormat::Json).is_err());
    }

    #[test]
    fn test_untyped_implementation_is_skipped() {
        let doc = r#"{
            "bricks": [{"id": "a", "functions": [{"implementations": [
                {"id": "firmware", "quantity": 2},
                {"type": "part", "id": "case", "quantity": 1}
            ]}]}],
            "parts": [{"id": "firmware"}, {"id": "case"}]
        }"#;
        let loaded = ProjectLoader::default().load_str("p", doc, DocumentFormat::Json).unwrap();

        let implementation = &loaded.project.bricks()[0].functions[0].implementations[0];
        assert_eq!(implementation.kind, ImplementationKind::Unknown(String::new()));

        let validation = loaded.validation.unwrap();
        assert!(validation.is_valid);
        assert_eq!(validation.summary.unknown_kinds, 1);

        let bom = loaded.project.bom("a", true).unwrap();
        assert_eq!(bom.quantity("firmware"), None);
        assert_eq!(bom.quantity("case"), Some(1.0));
    }

    #[test]
    fn test_unsupported_file_type_is_rejected_before_reading() {
        let err = ProjectLoader::default().load_path("does/not/exist.txt").unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(err.to_string().contains("file_type"));
    }

    #[test]
    fn test_reject_on_reference_errors() {
        let doc = r#"{"bricks": [{"id": "a", "functions": [
            {"implementations": [{"type": "part", "id": "nope"}]}
        ]}]}"#;

        let lenient = ProjectLoader::default().load_str("p", doc, DocumentFormat::Json).unwrap();
        assert!(!lenient.validation.unwrap().is_valid);

        let strict = ProjectLoader::new(LoaderConfig {
            reject_on_errors: true,
            ..LoaderConfig::default()
        });
        let err = strict.load_str("p", doc, DocumentFormat::Json).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_duplicate_ids_are_model_errors() {
        let doc = r#"{"bricks": [{"id": "a"}, {"id": "a"}]}"#;
        let err = ProjectLoader::default().load_str("p", doc, DocumentFormat::Json).unwrap_err();
        assert_eq!(err.error_code(), "MODEL_ERROR");
    }

    #[test]
    fn test_validation_can_be_disabled() {
        let loader = ProjectLoader::new(LoaderConfig {
            validate_references: false,
            ..LoaderConfig::default()
        });
        let doc = r#"{"bricks": [{"id": "a"}]}"#;
        let loaded = loader.load_str("p", doc, DocumentFormat::Json).unwrap();
        assert!(loaded.validation.is_none());
    }
}
