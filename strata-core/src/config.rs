//! Configuration
//!
//! Shared constants and the settings that control a walk.

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Name reserved for the synthetic root node.
///
/// Caller objects may not use it; it is only ever assigned to the root that
/// is created when a graph has several natural roots.
pub const ROOT_NAME: &str = "__ROOT__";

/// Settings for [`ObjectGraph::walk_with`](crate::ObjectGraph::walk_with).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// Upper bound on actions running at once inside a level.
    ///
    /// `None` spawns every node of the level immediately.
    pub max_concurrency: Option<usize>,
}

impl WalkConfig {
    /// Create a config with no concurrency bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of in-flight actions per level.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit);
        self
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self> {
        let config = serde_json::from_str::<Self>(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would stall a walk.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == Some(0) {
            return Err(GraphError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
