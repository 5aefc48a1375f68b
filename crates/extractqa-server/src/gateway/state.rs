use std::sync::Arc;

use extractqa::model::QaEngine;
use extractqa::pipeline::SharedEngine;

pub struct HandlerState<E: QaEngine + 'static> {
    pub engine: Arc<SharedEngine<E>>,
}

impl<E: QaEngine + 'static> Clone for HandlerState<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<E: QaEngine + 'static> HandlerState<E> {
    pub fn new(engine: Arc<SharedEngine<E>>) -> Self {
        Self { engine }
    }

    /// State around an engine that is already loaded.
    pub fn with_engine(engine: E) -> Self {
        Self::new(Arc::new(SharedEngine::preloaded(engine)))
    }
}
