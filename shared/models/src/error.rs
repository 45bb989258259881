//! Errors raised by the core model when a project's references cannot be
//! followed.

use thiserror::Error;

/// Which registry an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Brick,
    Part,
    Author,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Brick => "brick",
            Self::Part => "part",
            Self::Author => "author",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: EntityKind, id: String },

    #[error("Unresolved brick reference: {id}")]
    UnresolvedBrick { id: String },

    #[error("Unresolved part reference: {id}")]
    UnresolvedPart { id: String },

    #[error("Cyclic brick composition: {}", path.join(" -> "))]
    CyclicComposition { path: Vec<String> },
}

impl ModelError {
    pub fn duplicate_id(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::DuplicateId { kind, id: id.into() }
    }

    pub fn unresolved_brick(id: impl Into<String>) -> Self {
        Self::UnresolvedBrick { id: id.into() }
    }

    pub fn unresolved_part(id: impl Into<String>) -> Self {
        Self::UnresolvedPart { id: id.into() }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
