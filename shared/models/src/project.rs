//! The project registry.
//!
//! A [`Project`] owns every brick, part and author of one loaded document and
//! is the only place ids are resolved. It is assembled once by a loader and
//! read-only afterwards; every query returns a freshly built value.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::author::Author;
use crate::bom::Bom;
use crate::brick::Brick;
use crate::error::{EntityKind, ModelError, ModelResult};
use crate::part::Part;
use crate::tree::BrickTree;

/// Serialized shape of a project: three flat lists cross-referencing by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSnapshot {
    pub bricks: Vec<Brick>,
    pub parts: Vec<Part>,
    pub authors: Vec<Author>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProjectSnapshot", into = "ProjectSnapshot")]
pub struct Project {
    bricks: Vec<Brick>,
    parts: Vec<Part>,
    authors: Vec<Author>,
    part_index: HashMap<String, usize>,
    author_index: HashMap<String, usize>,
}

fn index_by_id<'a>(
    kind: EntityKind,
    ids: impl Iterator<Item = &'a str>,
) -> ModelResult<HashMap<String, usize>> {
    let mut index = HashMap::new();
    for (position, id) in ids.enumerate() {
        if index.insert(id.to_string(), position).is_some() {
            return Err(ModelError::duplicate_id(kind, id));
        }
    }
    Ok(index)
}

impl Project {
    /// Assembles a project, rejecting duplicate ids. Bricks keep their
    /// document order.
    pub fn new(
        bricks: Vec<Brick>,
        mut parts: Vec<Part>,
        authors: Vec<Author>,
    ) -> ModelResult<Self> {
        index_by_id(EntityKind::Brick, bricks.iter().map(|b| b.id.as_str()))?;
        let part_index = index_by_id(EntityKind::Part, parts.iter().map(|p| p.id.as_str()))?;
        let author_index =
            index_by_id(EntityKind::Author, authors.iter().map(|a| a.id.as_str()))?;

        for part in &mut parts {
            part.apply_name_fallback();
        }

        Ok(Self {
            bricks,
            parts,
            authors,
            part_index,
            author_index,
        })
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Looks a brick up by id. A miss is logged and returned as `None`.
    pub fn brick_by_name(&self, id: &str) -> Option<&Brick> {
        let brick = self.bricks.iter().find(|b| b.id == id);
        if brick.is_none() {
            warn!(brick = %id, known = self.bricks.len(), "No such brick");
        }
        brick
    }

    /// Looks a part up by id. A miss is logged and returned as `None`.
    pub fn part_by_name(&self, id: &str) -> Option<&Part> {
        let part = self.part_index.get(id).map(|&i| &self.parts[i]);
        if part.is_none() {
            warn!(part = %id, "Bad part id");
        }
        part
    }

    /// Whether a brick id resolves, without logging a miss.
    pub fn has_brick(&self, id: &str) -> bool {
        self.bricks.iter().any(|b| b.id == id)
    }

    /// Whether a part id resolves, without logging a miss.
    pub fn has_part(&self, id: &str) -> bool {
        self.part_index.contains_key(id)
    }

    pub fn author_by_id(&self, id: &str) -> Option<&Author> {
        self.author_index.get(id).map(|&i| &self.authors[i])
    }

    /// Bill of materials for the brick with the given id.
    pub fn bom(&self, brick_id: &str, recursive: bool) -> ModelResult<Bom> {
        self.brick_by_name(brick_id)
            .ok_or_else(|| ModelError::unresolved_brick(brick_id))?
            .get_bom(self, recursive)
    }

    /// Ids of bricks no other brick references, in document order.
    ///
    /// When every brick is referenced (a closed cycle) the first brick is
    /// returned alone so that a non-empty project always has a root.
    pub fn root_bricks(&self) -> Vec<&str> {
        let referenced: HashSet<&str> = self
            .bricks
            .iter()
            .flat_map(|b| b.child_bricks())
            .collect();

        let mut roots: Vec<&str> = self
            .bricks
            .iter()
            .map(|b| b.id.as_str())
            .filter(|id| !referenced.contains(id))
            .collect();

        if roots.is_empty() {
            if let Some(first) = self.bricks.first() {
                roots.push(first.id.as_str());
            }
        }
        roots
    }

    /// Builds the display forest rooted at [`Project::root_bricks`].
    ///
    /// One visited set spans the whole forest, so a brick shared by several
    /// parents appears only under the first one reached in root order. The
    /// result is lossy with respect to sharing and must not be used to count
    /// parts; use [`Brick::get_bom`] for that.
    pub fn brick_tree(&self) -> Vec<BrickTree<'_>> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut forest = Vec::new();

        for root_id in self.root_bricks() {
            if visited.contains(root_id) {
                continue;
            }
            if let Some(root) = self.brick_by_name(root_id) {
                forest.push(self.build_tree(root, &mut visited));
            }
        }
        forest
    }

    fn build_tree<'a>(
        &'a self,
        brick: &'a Brick,
        visited: &mut HashSet<&'a str>,
    ) -> BrickTree<'a> {
        visited.insert(brick.id.as_str());
        let mut node = BrickTree::new(brick);

        for child_id in brick.child_bricks() {
            if visited.contains(child_id) {
                continue;
            }
            // Dangling children are already logged by the lookup.
            if let Some(child) = self.brick_by_name(child_id) {
                let subtree = self.build_tree(child, visited);
                node.children.push(subtree);
            }
        }
        node
    }

    /// Name of the first root brick, or an empty string for an empty
    /// project.
    pub fn name_of_project(&self) -> &str {
        self.root_bricks()
            .first()
            .and_then(|id| self.brick_by_name(id))
            .map(|b| b.name.as_str())
            .unwrap_or("")
    }
}

impl TryFrom<ProjectSnapshot> for Project {
    type Error = ModelError;

    fn try_from(snapshot: ProjectSnapshot) -> Result<Self, Self::Error> {
        Self::new(snapshot.bricks, snapshot.parts, snapshot.authors)
    }
}

impl From<Project> for ProjectSnapshot {
    fn from(project: Project) -> Self {
        Self {
            bricks: project.bricks,
            parts: project.parts,
            authors: project.authors,
        }
    }
}
