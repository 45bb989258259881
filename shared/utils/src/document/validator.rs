//! Project Validator
//!
//! Checks that the ids a project's bricks use actually resolve, and flags
//! composition cycles before a recursive BOM walk runs into them.

use std::collections::{HashSet, VecDeque};

use docubricks_models::{ImplementationKind, Project};

/// Validation severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

/// Single validation issue
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    pub brick: Option<String>,
    pub field: Option<String>,
    pub message: String,
    pub suggestion: Option<String>,
}

/// Validation result for a project
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_count: usize,
    pub warning_count: usize,
    pub issues: Vec<ValidationIssue>,
    pub summary: ValidationSummary,
}

/// Summary statistics for validation
#[derive(Debug, Clone, Default)]
pub struct ValidationSummary {
    pub total_bricks: usize,
    pub total_parts: usize,
    pub dangling_parts: usize,
    pub dangling_bricks: usize,
    pub dangling_authors: usize,
    pub unknown_kinds: usize,
    pub cyclic_bricks: usize,
    pub zero_quantities: usize,
}

impl ValidationResult {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == ValidationSeverity::Error)
    }
}

/// Reference validator
pub struct ProjectValidator {
    check_authors: bool,
    check_cycles: bool,
    report_zero_quantities: bool,
}

impl Default for ProjectValidator {
    fn default() -> Self {
        Self {
            check_authors: true,
            check_cycles: true,
            report_zero_quantities: true,
        }
    }
}

impl ProjectValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_author_checks(mut self, enabled: bool) -> Self {
        self.check_authors = enabled;
        self
    }

    pub fn with_cycle_checks(mut self, enabled: bool) -> Self {
        self.check_cycles = enabled;
        self
    }

    pub fn with_zero_quantity_report(mut self, enabled: bool) -> Self {
        self.report_zero_quantities = enabled;
        self
    }

    /// Validate a loaded project
    pub fn validate(&self, project: &Project) -> ValidationResult {
        let mut issues = Vec::new();
        let mut summary = ValidationSummary {
            total_bricks: project.bricks().len(),
            total_parts: project.parts().len(),
            ..ValidationSummary::default()
        };

        for brick in project.bricks() {
            for implementation in brick.implementations() {
                match &implementation.kind {
                    ImplementationKind::Part if !project.has_part(&implementation.id) => {
                        summary.dangling_parts += 1;
                        issues.push(ValidationIssue {
                            severity: ValidationSeverity::Error,
                            brick: Some(brick.id.clone()),
                            field: Some("implementation".to_string()),
                            message: format!("Unknown part id: {}", implementation.id),
                            suggestion: Some("Add a physical_part with this id".to_string()),
                        });
                    }
                    ImplementationKind::Brick if !project.has_brick(&implementation.id) => {
                        summary.dangling_bricks += 1;
                        issues.push(ValidationIssue {
                            severity: ValidationSeverity::Warning,
                            brick: Some(brick.id.clone()),
                            field: Some("implementation".to_string()),
                            message: format!("Unknown brick id: {}", implementation.id),
                            suggestion: Some("Recursive BOMs of this brick will fail".to_string()),
                        });
                    }
                    ImplementationKind::Unknown(kind) => {
                        summary.unknown_kinds += 1;
                        issues.push(ValidationIssue {
                            severity: ValidationSeverity::Warning,
                            brick: Some(brick.id.clone()),
                            field: Some("type".to_string()),
                            message: format!(
                                "Unknown implementation type '{}' for {}",
                                kind, implementation.id
                            ),
                            suggestion: Some("Use 'part' or 'brick'".to_string()),
                        });
                    }
                    _ => {}
                }

                if self.report_zero_quantities && implementation.quantity == 0.0 {
                    summary.zero_quantities += 1;
                    issues.push(ValidationIssue {
                        severity: ValidationSeverity::Info,
                        brick: Some(brick.id.clone()),
                        field: Some("quantity".to_string()),
                        message: format!("No quantity for {}, counted as one", implementation.id),
                        suggestion: None,
                    });
                }
            }

            if self.check_authors {
                for author in brick.authors.iter().filter(|a| project.author_by_id(a).is_none()) {
                    summary.dangling_authors += 1;
                    issues.push(ValidationIssue {
                        severity: ValidationSeverity::Warning,
                        brick: Some(brick.id.clone()),
                        field: Some("authors".to_string()),
                        message: format!("Unknown author id: {}", author),
                        suggestion: Some("Add an author with this id".to_string()),
                    });
                }
            }
        }

        if self.check_cycles {
            for brick_id in self.cyclic_bricks(project) {
                summary.cyclic_bricks += 1;
                issues.push(ValidationIssue {
                    severity: ValidationSeverity::Error,
                    brick: Some(brick_id.to_string()),
                    field: Some("functions".to_string()),
                    message: format!("Brick {} contains itself through its sub-bricks", brick_id),
                    suggestion: Some(
                        "Break the cycle; recursive BOMs cannot be computed".to_string(),
                    ),
                });
            }
        }

        let count = |severity| issues.iter().filter(|i| i.severity == severity).count();
        let error_count = count(ValidationSeverity::Error);
        let warning_count = count(ValidationSeverity::Warning);

        ValidationResult {
            is_valid: error_count == 0,
            error_count,
            warning_count,
            issues,
            summary,
        }
    }

    /// Ids of bricks reachable from themselves, in document order.
    fn cyclic_bricks<'p>(&self, project: &'p Project) -> Vec<&'p str> {
        project
            .bricks()
            .iter()
            .filter(|brick| {
                let mut seen: HashSet<&str> = HashSet::new();
                let mut queue: VecDeque<&str> = brick.child_bricks().into_iter().collect();
                while let Some(id) = queue.pop_front() {
                    if id == brick.id {
                        return true;
                    }
                    if !seen.insert(id) || !project.has_brick(id) {
                        continue;
                    }
                    if let Some(child) = project.bricks().iter().find(|b| b.id == id) {
                        queue.extend(child.child_bricks());
                    }
                }
                false
            })
            .map(|brick| brick.id.as_str())
            .collect()
    }
}
