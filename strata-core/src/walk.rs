//! Level-Ordered Walk
//!
//! Executes a caller action over every node of a built graph.
//!
//! # Ordering
//!
//! Levels are processed from the highest index down to 0: the nodes
//! furthest from the root run first. Because edges run from a dependency to
//! its dependent, this means dependents run before the objects they depend
//! on. Callers that need the opposite order must invert their action.
//!
//! Inside a level every node is spawned onto the tokio runtime and the level
//! is joined before the next one starts. The root is never passed to the
//! action.
//!
//! # Failure and Cancellation
//!
//! - If any action in a level fails, the remaining actions of that level
//!   still run to completion, the first error is reported, and no further
//!   level starts.
//! - Cancellation is cooperative and checked once per level before any of
//!   its nodes are dispatched. Running actions are never interrupted.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, trace, warn};

use crate::config::WalkConfig;
use crate::error::{ActionError, GraphError, Result};
use crate::graph::{GraphObject, Leveled, Vertex};

/// Cancellation signal for a walk.
///
/// Clones share the same flag, so one handle can be kept by the caller while
/// another is passed to the walk or into actions.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    cancelled: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. No new level is started afterwards.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Summary of a completed walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkReport {
    /// Number of levels processed.
    pub levels: usize,

    /// Number of actions that ran to success.
    pub actions: usize,
}

pub(crate) async fn walk_levels<O, F, Fut, E>(
    snapshot: Arc<Leveled<O>>,
    config: &WalkConfig,
    cancel: &Cancellation,
    action: F,
) -> Result<WalkReport>
where
    O: GraphObject + 'static,
    F: Fn(Arc<O>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
    E: Into<ActionError> + Send + 'static,
{
    config.validate()?;

    let action = Arc::new(action);
    let limiter = config
        .max_concurrency
        .map(|limit| Arc::new(Semaphore::new(limit)));
    let mut report = WalkReport::default();

    for level in (0..snapshot.levels.len()).rev() {
        if cancel.is_cancelled() {
            warn!(level, "walk cancelled");
            return Err(GraphError::Cancelled { level });
        }

        let mut tasks = JoinSet::new();
        for &offset in &snapshot.levels[level] {
            if offset == snapshot.root {
                continue;
            }
            let Vertex::Object(obj) = &snapshot.vertices[offset] else {
                continue;
            };
            trace!(level, node = obj.name(), "dispatching action");
            tasks.spawn(run_action(
                Arc::clone(&action),
                Arc::clone(obj),
                limiter.clone(),
            ));
        }

        let mut first_error: Option<ActionError> = None;
        while let Some(joined) = tasks.join_next().await {
            match joined.map_err(ActionError::from).and_then(|outcome| outcome) {
                Ok(()) => report.actions += 1,
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }
        report.levels += 1;

        if let Some(source) = first_error {
            warn!(level, error = %source, "level execution failed");
            return Err(GraphError::LevelExecutionFailed { level, source });
        }
        debug!(level, "level complete");
    }

    Ok(report)
}

async fn run_action<O, F, Fut, E>(
    action: Arc<F>,
    obj: Arc<O>,
    limiter: Option<Arc<Semaphore>>,
) -> std::result::Result<(), ActionError>
where
    F: Fn(Arc<O>) -> Fut,
    Fut: Future<Output = std::result::Result<(), E>>,
    E: Into<ActionError>,
{
    let _permit = match limiter {
        Some(limiter) => Some(limiter.acquire_owned().await.map_err(ActionError::from)?),
        None => None,
    };
    action(obj).await.map_err(Into::into)
}
