//! Parts: the leaves of the composition graph.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::instruction::{MediaFile, StepByStepInstruction};

/// A physical component that is bought or made, never decomposed further.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Part {
    #[validate(length(min = 1, message = "Part id must not be empty"))]
    pub id: String,
    pub name: String,
    pub description: String,
    pub supplier: String,
    pub supplier_part_num: String,
    pub manufacturer_part_num: String,
    pub url: String,
    pub material_amount: String,
    pub material_unit: String,
    pub files: Vec<MediaFile>,
    pub manufacturing_instruction: Option<StepByStepInstruction>,
}

impl Part {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Copies the description into an empty name. Applied once when a
    /// project is assembled.
    pub(crate) fn apply_name_fallback(&mut self) {
        if self.name.is_empty() {
            self.name = self.description.clone();
        }
    }

    /// True when the part is sold by length, mass or volume rather than by
    /// the piece.
    pub fn is_material(&self) -> bool {
        !self.material_unit.is_empty()
    }
}
