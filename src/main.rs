use axum::{
  extract::{ConnectInfo, State, WebSocketUpgrade},
  http::Method,
  response::IntoResponse,
  routing::get,
  Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

mod app;
mod game;
mod protocol;
mod shared;
mod transport;

use anyhow::Context;
use app::config::ServerConfig;
use game::room::Room;
use game::types::Point;

#[derive(Debug, Serialize)]
struct HealthResponse {
  ok: bool,
  rows: usize,
  cols: usize,
  players: usize,
  food: Option<Point>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let config = ServerConfig::from_env()?;
  let room = Arc::new(Room::new(config.rows, config.cols));
  let scheduler = room.start(config.tick_period, config.food_period);

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET])
    .allow_headers(Any);

  let app: Router = Router::new()
    .route("/", get(ws_handler))
    .route("/ws", get(ws_handler))
    .route("/api/health", get(health))
    .layer(cors)
    .with_state(Arc::clone(&room));

  let address = format!("0.0.0.0:{}", config.port);
  tracing::info!(
    rows = config.rows,
    cols = config.cols,
    tick = ?config.tick_period,
    food = ?config.food_period,
    "listening on {address}"
  );

  let listener = tokio::net::TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  let served = axum::serve(
    listener,
    app.into_make_service_with_connect_info::<SocketAddr>(),
  )
  .await;

  scheduler.abort();
  served?;
  Ok(())
}

async fn health(State(room): State<Arc<Room>>) -> impl IntoResponse {
  let stats = room.stats().await;
  Json(HealthResponse {
    ok: true,
    rows: stats.rows,
    cols: stats.cols,
    players: stats.players,
    food: stats.food,
  })
}

async fn ws_handler(
  ws: WebSocketUpgrade,
  ConnectInfo(addr): ConnectInfo<SocketAddr>,
  State(room): State<Arc<Room>>,
) -> impl IntoResponse {
  ws.on_upgrade(move |socket| transport::ws_session::handle_socket(socket, room, addr.to_string()))
}
