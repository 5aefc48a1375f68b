use std::sync::Arc;
use std::time::Instant;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::model::{ModelError, QaEngine};

use super::error::QaError;
use super::types::{AnswerOutcome, AnswerRequest};

type Loader<E> = Arc<dyn Fn() -> Result<E, ModelError> + Send + Sync>;

/// Process-wide QA engine, loaded at most once.
///
/// The first [`get`](SharedEngine::get) runs the loader on the blocking pool;
/// concurrent callers wait for that load instead of starting their own. A
/// failed load leaves the slot empty, so a later call loads again.
pub struct SharedEngine<E> {
    cell: OnceCell<Arc<E>>,
    loader: Loader<E>,
}

impl<E> std::fmt::Debug for SharedEngine<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedEngine")
            .field("loaded", &self.cell.initialized())
            .finish()
    }
}

impl<E: QaEngine + 'static> SharedEngine<E> {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<E, ModelError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            loader: Arc::new(loader),
        }
    }

    /// Wraps an engine that is already loaded.
    pub fn preloaded(engine: E) -> Self {
        Self {
            cell: OnceCell::new_with(Some(Arc::new(engine))),
            loader: Arc::new(|| {
                Err(ModelError::InvalidConfig {
                    reason: "preloaded engine has no loader".to_string(),
                })
            }),
        }
    }

    /// Returns the engine, loading it first if nobody has yet.
    pub async fn get(&self) -> Result<Arc<E>, QaError> {
        let engine = self
            .cell
            .get_or_try_init(|| async {
                info!("Loading QA model, please wait...");
                let started = Instant::now();
                let loader = Arc::clone(&self.loader);

                let loaded = match tokio::task::spawn_blocking(move || loader()).await {
                    Ok(loaded) => loaded,
                    Err(e) => {
                        return Err(QaError::TaskFailed {
                            reason: e.to_string(),
                        });
                    }
                };

                match loaded {
                    Ok(engine) => {
                        info!(
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "QA model ready"
                        );
                        Ok::<_, QaError>(Arc::new(engine))
                    }
                    Err(e) => {
                        warn!(error = %e, "QA model failed to load");
                        Err(QaError::Model(e))
                    }
                }
            })
            .await?;

        Ok(Arc::clone(engine))
    }

    /// The engine if it has finished loading; never triggers a load.
    pub fn loaded(&self) -> Option<&Arc<E>> {
        self.cell.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Answers one request, loading the engine on first use.
    ///
    /// Blank inputs are reported without touching the engine.
    pub async fn answer(&self, request: AnswerRequest) -> Result<AnswerOutcome, QaError> {
        if let Some(outcome) = request.missing_input() {
            debug!(status = outcome.status(), "Rejected request with missing input");
            return Ok(outcome);
        }

        let engine = self.get().await?;
        tokio::task::spawn_blocking(move || super::answer(engine.as_ref(), &request))
            .await
            .map_err(|e| QaError::TaskFailed {
                reason: e.to_string(),
            })?
    }
}
