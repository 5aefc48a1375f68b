//! Test server harness.

use extractqa::model::StubQaEngine;
use extractqa::pipeline::SharedEngine;
use extractqa_server::gateway::{HandlerState, create_router_with_state};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default)]
pub struct TestServerConfig {
    pub port: u16,
    /// Leave the engine unloaded until the first request needs it.
    pub lazy: bool,
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub engine: Arc<SharedEngine<StubQaEngine>>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Spawns a server backed by the lexical stub engine.
///
/// No model files or network access are needed. With `lazy` set the engine
/// loads on the first request that reaches it, so readiness can be observed
/// flipping. The listener is bound before this returns, so requests can be
/// sent right away.
pub async fn spawn_test_server(config: TestServerConfig) -> std::io::Result<TestServer> {
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let engine = if config.lazy {
        Arc::new(SharedEngine::new(|| Ok(StubQaEngine::new())))
    } else {
        Arc::new(SharedEngine::preloaded(StubQaEngine::new()))
    };

    let app = create_router_with_state(HandlerState::new(Arc::clone(&engine)));

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    Ok(TestServer {
        addr: local_addr,
        engine,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
