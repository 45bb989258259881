//! # DocuBricks Core Domain Models
//!
//! This module contains the core domain models for documenting open hardware
//! as a hierarchy of bricks. All models implement serialization with serde and
//! field validation with the validator crate.
//!
//! ## Key Models
//!
//! - **Brick**: An assembly or sub-assembly, made of functions
//! - **BrickFunction**: A capability of a brick, satisfied by implementations
//! - **FunctionImplementation**: A quantity of a part or of another brick
//! - **Part**: An indivisible physical component
//! - **Project**: The registry that owns everything and resolves ids
//! - **Bom**: Aggregated part quantities
//! - **BrickTree**: The parent/child display forest
//!
//! ## Derived values
//!
//! Entities reference each other by id only. Bills of materials and the brick
//! forest are computed on request from a [`Project`] and never stored.

pub mod author;
pub mod bom;
pub mod brick;
pub mod error;
pub mod instruction;
pub mod part;
pub mod project;
pub mod tree;


pub use author::*;
pub use bom::*;
pub use brick::*;
pub use error::*;
pub use instruction::*;
pub use part::*;
pub use project::{Project, ProjectSnapshot};
pub use tree::*;
