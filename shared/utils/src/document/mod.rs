//! DocuBricks Document Module
//!
//! Loads projects from either of the two document forms and checks their
//! cross-references.

pub mod loader;
pub mod markup;
pub mod validator;

pub use loader::{DocumentFormat, LoadedProject, ProjectLoader, SUPPORTED_EXTENSIONS};
pub use markup::Element;
pub use validator::{
    ProjectValidator, ValidationIssue, ValidationResult, ValidationSeverity, ValidationSummary,
};
