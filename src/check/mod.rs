//! Validation machinery: dependency walking, context completeness, marker
//! presence and HTML structure.

pub mod walker;
pub mod context;
pub mod marker;
pub mod structure;

pub use context::{check_context, effective_dependencies};
pub use marker::has_marker;
pub use structure::{find_violations, validate_structure, Region, StructuralViolation, Violation};
pub use walker::{variables_map, VariableMap};

use std::fmt;

use crate::component::ContentError;
use crate::render::RenderError;

/// A required variable nothing resolves, with the definer path that
/// required it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingVariable {
    pub name: String,
    pub trace: Vec<String>,
}

impl fmt::Display for MissingVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' (found in: {})", self.name, self.trace.join(" -> "))
    }
}

/// Errors raised by the checkers.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error(
        "the following template variables are not defined in the context and have no default in the definer's parameters:\n{}",
        join_lines(.0)
    )]
    MissingContextVariable(Vec<MissingVariable>),
    #[error("depends_on must be a list of dependencies, found {found}")]
    InvalidDependencyDeclaration { found: &'static str },
    #[error("dependency nesting exceeds {limit} levels: {}", .trace.join(" -> "))]
    DependencyTooDeep { limit: usize, trace: Vec<String> },
    #[error(transparent)]
    StructuralViolation(#[from] StructuralViolation),
    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
    #[error("content could not be resolved: {0}")]
    Content(#[from] ContentError),
}

fn join_lines<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
