//! Media references and step-by-step instructions.
//!
//! These carry documentation only; nothing in the BOM or tree computations
//! reads them.

use serde::{Deserialize, Serialize};

/// A file attached to a brick, part or step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaFile {
    pub url: String,
}

impl MediaFile {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// A named sequence of steps (assembly or manufacturing).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepByStepInstruction {
    pub name: String,
    pub steps: Vec<AssemblyStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyStep {
    pub description: String,
    pub files: Vec<MediaFile>,
    pub components: Vec<AssemblyStepComponent>,
}

/// A component mentioned by an assembly step. The quantity is kept as the
/// document wrote it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyStepComponent {
    pub id: String,
    pub quantity: String,
}

impl StepByStepInstruction {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
