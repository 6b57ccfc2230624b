use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use super::state::ApiState;
use super::{health, metrics};

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/ready", get(health::ready))
        .route("/metrics", get(metrics::metrics))
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: ApiState) -> std::io::Result<()> {
    let app = router(state);
    axum::serve(listener, app).await
}
