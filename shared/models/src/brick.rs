//! Brick domain models: bricks, their functions and the implementations that
//! satisfy each function.
//!
//! A brick never holds references to other entities directly. Implementations
//! name their target by id and are resolved through a [`Project`] on demand,
//! so a document may contain forward references, dangling ids and cycles.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;
use validator::Validate;

use crate::author::Author;
use crate::bom::Bom;
use crate::error::{ModelError, ModelResult};
use crate::instruction::{MediaFile, StepByStepInstruction};
use crate::part::Part;
use crate::project::Project;

/// What an implementation points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImplementationKind {
    Part,
    Brick,
    /// Any other spelling found in a document. Kept so the BOM walk can
    /// report it instead of the loader guessing.
    Unknown(String),
}

/// An implementation that does not state its kind is not assumed to be a
/// part; it is reported and skipped like any other unrecognised kind.
impl Default for ImplementationKind {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<String> for ImplementationKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "part" | "physical_part" => Self::Part,
            "brick" => Self::Brick,
            _ => Self::Unknown(kind),
        }
    }
}

impl From<ImplementationKind> for String {
    fn from(kind: ImplementationKind) -> Self {
        match kind {
            ImplementationKind::Part => "part".to_string(),
            ImplementationKind::Brick => "brick".to_string(),
            ImplementationKind::Unknown(other) => other,
        }
    }
}

impl std::fmt::Display for ImplementationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Part => f.write_str("part"),
            Self::Brick => f.write_str("brick"),
            Self::Unknown(other) => f.write_str(other),
        }
    }
}

/// One way of realizing a function: `quantity` copies of a part or brick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FunctionImplementation {
    #[serde(rename = "type")]
    pub kind: ImplementationKind,
    #[validate(length(min = 1, message = "Implementation must reference an id"))]
    pub id: String,
    pub quantity: f64,
}

impl FunctionImplementation {
    pub fn of_part(id: impl Into<String>, quantity: f64) -> Self {
        Self {
            kind: ImplementationKind::Part,
            id: id.into(),
            quantity,
        }
    }

    pub fn of_brick(id: impl Into<String>, quantity: f64) -> Self {
        Self {
            kind: ImplementationKind::Brick,
            id: id.into(),
            quantity,
        }
    }

    pub fn is_part(&self) -> bool {
        self.kind == ImplementationKind::Part
    }

    pub fn is_brick(&self) -> bool {
        self.kind == ImplementationKind::Brick
    }

    pub fn resolve_part<'p>(&self, project: &'p Project) -> Option<&'p Part> {
        project.part_by_name(&self.id)
    }

    pub fn resolve_brick<'p>(&self, project: &'p Project) -> Option<&'p Brick> {
        project.brick_by_name(&self.id)
    }
}

/// A named capability of a brick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BrickFunction {
    pub id: String,
    pub description: String,
    pub designator: String,
    /// Legacy per-function multiplicity. Kept for round-tripping documents;
    /// aggregation uses the implementation quantity instead.
    pub quantity: String,
    #[validate]
    pub implementations: Vec<FunctionImplementation>,
}

impl BrickFunction {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_implementation(mut self, implementation: FunctionImplementation) -> Self {
        self.implementations.push(implementation);
        self
    }
}

/// A documented assembly or sub-assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Brick {
    #[validate(length(min = 1, message = "Brick id must not be empty"))]
    pub id: String,
    pub name: String,
    #[serde(rename = "abstract")]
    pub summary: String,
    pub long_description: String,
    pub notes: String,
    pub license: String,
    pub files: Vec<MediaFile>,
    /// Author ids, resolved with [`Brick::resolve_authors`].
    pub authors: Vec<String>,
    #[validate]
    pub functions: Vec<BrickFunction>,
    pub instructions: Vec<StepByStepInstruction>,
}

impl Brick {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_function(mut self, function: BrickFunction) -> Self {
        self.functions.push(function);
        self
    }

    /// Every implementation of every function, in document order.
    pub fn implementations(&self) -> impl Iterator<Item = &FunctionImplementation> {
        self.functions.iter().flat_map(|f| f.implementations.iter())
    }

    /// Parts needed to build one instance of this brick.
    ///
    /// All implementations of all functions are summed; alternatives are not
    /// chosen between. With `recursive` unset only the brick's own parts are
    /// counted. With it set, each referenced brick is expanded and scaled by
    /// the implementation quantity, so a sub-brick reached through two parents
    /// is counted twice.
    ///
    /// Fails if a part does not resolve, if a brick does not resolve during a
    /// recursive walk, or if a brick contains itself.
    ///
    /// Each sub-brick is expanded once per call and its BOM reused for every
    /// further reference, so shared sub-assemblies cost linear time.
    pub fn get_bom(&self, project: &Project, recursive: bool) -> ModelResult<Bom> {
        let mut chain = Vec::new();
        let mut expanded = HashMap::new();
        self.collect_bom(project, recursive, &mut chain, &mut expanded)
    }

    fn collect_bom<'p>(
        &'p self,
        project: &'p Project,
        recursive: bool,
        chain: &mut Vec<&'p str>,
        expanded: &mut HashMap<&'p str, Bom>,
    ) -> ModelResult<Bom> {
        chain.push(self.id.as_str());
        let mut bom = Bom::new();

        for implementation in self.implementations() {
            match &implementation.kind {
                ImplementationKind::Part => {
                    let part = implementation
                        .resolve_part(project)
                        .ok_or_else(|| ModelError::unresolved_part(&implementation.id))?;
                    bom.add_part(part.id.as_str(), implementation.quantity);
                }
                ImplementationKind::Brick => {
                    if !recursive {
                        continue;
                    }
                    if let Some(start) = chain.iter().position(|id| *id == implementation.id) {
                        let mut path: Vec<String> =
                            chain[start..].iter().map(|id| id.to_string()).collect();
                        path.push(implementation.id.clone());
                        return Err(ModelError::CyclicComposition { path });
                    }
                    let brick = implementation
                        .resolve_brick(project)
                        .ok_or_else(|| ModelError::unresolved_brick(&implementation.id))?;
                    // Bricks on the chain are never cached, so a hit is finished.
                    if !expanded.contains_key(brick.id.as_str()) {
                        let sub_bom = brick.collect_bom(project, true, chain, expanded)?;
                        expanded.insert(brick.id.as_str(), sub_bom);
                    }
                    bom.add_bom(&expanded[brick.id.as_str()], implementation.quantity);
                }
                ImplementationKind::Unknown(kind) => {
                    warn!(
                        brick = %self.id,
                        target = %implementation.id,
                        kind = %kind,
                        "Skipping implementation of unknown type"
                    );
                }
            }
        }

        chain.pop();
        Ok(bom)
    }

    /// Distinct ids of bricks referenced by any implementation, in the order
    /// they are first seen.
    pub fn child_bricks(&self) -> Vec<&str> {
        let mut children: Vec<&str> = Vec::new();
        for implementation in self.implementations().filter(|i| i.is_brick()) {
            if !children.contains(&implementation.id.as_str()) {
                children.push(implementation.id.as_str());
            }
        }
        children
    }

    /// Authors credited on this brick. Ids missing from the project are
    /// skipped.
    pub fn resolve_authors<'p>(&self, project: &'p Project) -> Vec<&'p Author> {
        self.authors
            .iter()
            .filter_map(|id| project.author_by_id(id))
            .collect()
    }
}
