//! HTTP server lifecycle: load model, bind, serve, release.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{self, AppState};
use crate::app::holder::ModelHolder;
use crate::config::Settings;
use crate::error::AppError;

/// Load the model, then serve until Ctrl-C / SIGTERM.
///
/// A model that fails to load does not stop the server; binding failures do.
pub fn serve(settings: &Settings) -> Result<(), AppError> {
    let mut holder = ModelHolder::new();
    holder.load(&settings.pipeline_path);
    let state = Arc::new(AppState::new(holder));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::new(4, format!("Failed to start async runtime: {e}")))?;

    let addr = settings.bind_addr();
    runtime.block_on(async move {
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::new(4, format!("Failed to bind {addr}: {e}")))?;
        info!(address = %addr, "starting server at http://{addr}");
        serve_on(listener, state, shutdown_signal()).await
    })
}

/// Serve on an already-bound listener until `shutdown` resolves, then
/// release the model.
pub async fn serve_on(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), AppError> {
    let app = api::router(Arc::clone(&state));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::new(4, format!("Server error: {e}")))?;
    info!("server stopped");
    release(state);
    Ok(())
}

/// Clear the holder if this is the last reference to the state.
fn release(state: Arc<AppState>) -> bool {
    match Arc::try_unwrap(state) {
        Ok(mut state) => {
            state.holder.clear();
            true
        }
        Err(_) => {
            warn!("model holder still referenced at shutdown; it is dropped with the last request");
            false
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    use crate::io::artifact::tests::bundled_pipeline;

    #[test]
    fn release_clears_only_the_last_reference() {
        let state = Arc::new(AppState::new(ModelHolder::with_pipeline(bundled_pipeline())));
        let extra = Arc::clone(&state);
        assert!(!release(state));
        assert!(release(extra));
    }

    #[tokio::test]
    async fn serves_health_over_tcp_until_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::new(ModelHolder::with_pipeline(bundled_pipeline())));
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(serve_on(listener, state, async move {
            let _ = stop_rx.await;
        }));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(response.contains("\"pipeline_loaded\":true"), "{response}");

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
