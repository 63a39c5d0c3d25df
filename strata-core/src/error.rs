//! Errors
//!
//! Every failure the crate can report. Build errors carry enough context
//! (input position, names, cycle chains) to locate the offending object;
//! walk errors name the level that failed.

use thiserror::Error;

/// Boxed error produced by a caller-supplied walk action.
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid object name at offset {offset}: {reason}")]
    InvalidName { offset: usize, reason: String },

    #[error("duplicate object name {name:?} at offset {offset} (first seen at offset {first})")]
    DuplicateName {
        name: String,
        offset: usize,
        first: usize,
    },

    #[error("unknown dependency (of {dependent}): {missing}")]
    UnknownDependency { dependent: String, missing: String },

    #[error("dependency references itself on {0}")]
    SelfDependency(String),

    #[error("dependency cycles found ({}): {}", .0.len(), format_cycles(.0))]
    CycleDetected(Vec<Vec<String>>),

    #[error("no graph roots found")]
    NoRootFound,

    #[error("node {0} is not reachable from the root")]
    Unreachable(String),

    #[error("walk was cancelled before level {level}")]
    Cancelled { level: usize },

    #[error("error executing level {level}: {source}")]
    LevelExecutionFailed {
        level: usize,
        #[source]
        source: ActionError,
    },

    #[error("graph is empty")]
    EmptyGraph,

    #[error("error marshaling graph to dot: {0}")]
    ExportFailed(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for GraphError {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}

impl From<std::fmt::Error> for GraphError {
    fn from(value: std::fmt::Error) -> Self {
        Self::ExportFailed(value.to_string())
    }
}

fn format_cycles(cycles: &[Vec<String>]) -> String {
    cycles
        .iter()
        .map(|cycle| cycle.join(" -> "))
        .collect::<Vec<_>>()
        .join("; ")
}

impl GraphError {
    /// The cycle chains of a `CycleDetected` error.
    pub fn cycles(&self) -> Option<&[Vec<String>]> {
        match self {
            Self::CycleDetected(cycles) => Some(cycles),
            _ => None,
        }
    }
}
