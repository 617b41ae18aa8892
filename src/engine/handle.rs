//! Engine load state
//!
//! Wraps an [`EngineLoader`] so the engine is loaded at most once per
//! attempt, no matter how many renders ask for it concurrently.
//!
//! # States
//!
//! | State | `ensure_loaded` | `preload` |
//! |-------|-----------------|-----------|
//! | NotRequested | starts a load, awaits it | starts a load, awaits it |
//! | Loading | awaits the shared attempt | awaits the shared attempt |
//! | Loaded | returns the engine | returns immediately |
//! | Failed | errors without retrying | starts a fresh load |

use crate::engine::backend::{EngineLoader, FormulaEngine};
use crate::error::{MathError, MathResult};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

type LoadOutcome = Result<Arc<dyn FormulaEngine>, Arc<MathError>>;
type LoadFuture = Shared<BoxFuture<'static, LoadOutcome>>;

enum LoadState {
    NotRequested,
    Loading { attempt: u64, future: LoadFuture },
    Loaded(Arc<dyn FormulaEngine>),
    Failed(Arc<MathError>),
}

/// Observable load state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    NotRequested,
    Loading,
    Loaded,
    Failed,
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotRequested => "not requested",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

struct Inner {
    state: LoadState,
    attempts: u64,
}

impl Inner {
    fn begin_load(&mut self, loader: &Arc<dyn EngineLoader>) -> (u64, LoadFuture) {
        self.attempts += 1;
        let attempt = self.attempts;
        debug!(
            "Starting engine load attempt {} ({})",
            attempt,
            loader.backend_name()
        );

        let loader = Arc::clone(loader);
        let future = async move { loader.load().await.map_err(Arc::new) }
            .boxed()
            .shared();
        self.state = LoadState::Loading {
            attempt,
            future: future.clone(),
        };
        (attempt, future)
    }
}

/// Shared, lazily loaded formula engine
pub struct EngineHandle {
    loader: Arc<dyn EngineLoader>,
    inner: Mutex<Inner>,
}

impl EngineHandle {
    pub fn new(loader: Arc<dyn EngineLoader>) -> Self {
        Self {
            loader,
            inner: Mutex::new(Inner {
                state: LoadState::NotRequested,
                attempts: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Backend name of the underlying loader
    pub fn backend_name(&self) -> &'static str {
        self.loader.backend_name()
    }

    /// Return the engine, loading it first if nobody has yet.
    ///
    /// After a failed load this errors immediately; only [`preload`]
    /// starts another attempt.
    ///
    /// [`preload`]: EngineHandle::preload
    pub async fn ensure_loaded(&self) -> MathResult<Arc<dyn FormulaEngine>> {
        let (attempt, future) = {
            let mut inner = self.lock();
            let pending = match &inner.state {
                LoadState::Loaded(engine) => return Ok(Arc::clone(engine)),
                LoadState::Failed(cause) => {
                    return Err(MathError::EngineUnavailable(Arc::clone(cause)))
                }
                LoadState::Loading { attempt, future } => Some((*attempt, future.clone())),
                LoadState::NotRequested => None,
            };
            match pending {
                Some(pending) => pending,
                None => inner.begin_load(&self.loader),
            }
        };

        let outcome = future.await;
        self.settle(attempt, &outcome);
        outcome.map_err(MathError::EngineUnavailable)
    }

    /// Load the engine now, retrying if an earlier attempt failed
    pub async fn preload(&self) -> MathResult<Arc<dyn FormulaEngine>> {
        {
            let mut inner = self.lock();
            if let LoadState::Failed(cause) = &inner.state {
                debug!("Retrying engine load after failure: {}", cause);
                inner.state = LoadState::NotRequested;
            }
        }
        self.ensure_loaded().await
    }

    /// The engine if it has finished loading
    pub fn loaded(&self) -> Option<Arc<dyn FormulaEngine>> {
        match &self.lock().state {
            LoadState::Loaded(engine) => Some(Arc::clone(engine)),
            _ => None,
        }
    }

    pub fn status(&self) -> LoadStatus {
        match self.lock().state {
            LoadState::NotRequested => LoadStatus::NotRequested,
            LoadState::Loading { .. } => LoadStatus::Loading,
            LoadState::Loaded(_) => LoadStatus::Loaded,
            LoadState::Failed(_) => LoadStatus::Failed,
        }
    }

    /// Record the outcome of `attempt` unless a newer attempt replaced it
    fn settle(&self, attempt: u64, outcome: &LoadOutcome) {
        let mut inner = self.lock();
        let current = matches!(
            inner.state,
            LoadState::Loading { attempt: a, .. } if a == attempt
        );
        if !current {
            return;
        }

        inner.state = match outcome {
            Ok(engine) => {
                info!(
                    "Formula engine ready: {} {}",
                    engine.engine_name(),
                    engine.version()
                );
                LoadState::Loaded(Arc::clone(engine))
            }
            Err(cause) => {
                warn!("Formula engine failed to load: {}", cause);
                LoadState::Failed(Arc::clone(cause))
            }
        };
    }
}
