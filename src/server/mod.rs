pub mod protocol;

use crate::config::Config;
use crate::error::SimError;
use crate::runtime::SimulationRunner;
use axum::{
    extract::{ws::WebSocket, State as AxumState, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};
use protocol::{ClientMessage, ServerMessage};
use tokio::time::{interval, Duration};
use tower_http::services::ServeDir;

#[derive(Clone)]
struct AppState {
    runner: SimulationRunner,
    config: Config,
}

pub async fn run_server(
    config: Config,
    runner: SimulationRunner,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.server.address, config.server.port);

    let app_state = AppState {
        runner,
        config: config.clone(),
    };

    let app = Router::new()
        // WebSocket endpoint
        .route("/ws", get(websocket_handler))
        // Serve the static viewer assets
        .nest_service("/", ServeDir::new("static"))
        .with_state(app_state);

    log::info!("HTTP server with WebSocket listening on: {}", addr);
    log::info!("Static files served from: ./static/");
    log::info!("WebSocket endpoint: ws://{}/ws", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    AxumState(state): AxumState<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_websocket(socket, state))
}

async fn handle_websocket(socket: WebSocket, app_state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut update_interval = interval(Duration::from_secs_f64(
        1.0 / app_state.config.server.update_rate_hz.max(1) as f64,
    ));

    loop {
        tokio::select! {
            _ = update_interval.tick() => {
                let message = {
                    let shared = app_state.runner.state();
                    let state = shared.read().await;
                    ServerMessage::update(&state)
                };

                if let Ok(json) = serde_json::to_string(&message) {
                    if sender.send(axum::extract::ws::Message::Text(json)).await.is_err() {
                        log::info!("Client disconnected");
                        break;
                    }
                }
            }

            Some(msg) = receiver.next() => {
                match msg {
                    Ok(axum::extract::ws::Message::Text(text)) => {
                        if let Ok(client_msg) = serde_json::from_str::<ClientMessage>(&text) {
                            let reply = handle_client_message(client_msg, &app_state).await;
                            if let Ok(json) = serde_json::to_string(&reply) {
                                let _ = sender.send(axum::extract::ws::Message::Text(json)).await;
                            }
                        } else {
                            log::warn!("Unrecognized client message: {}", text);
                        }
                    }
                    Ok(axum::extract::ws::Message::Close(_)) => {
                        log::info!("Client requested close");
                        break;
                    }
                    Err(e) => {
                        log::error!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    log::info!("WebSocket connection closed");
}

async fn handle_client_message(message: ClientMessage, app_state: &AppState) -> ServerMessage {
    match message {
        ClientMessage::GetState => {
            let shared = app_state.runner.state();
            let state = shared.read().await;
            ServerMessage::full_state(
                &state,
                app_state.runner.is_paused(),
                app_state.runner.tick_rate(),
            )
        }
        ClientMessage::GetSamples => {
            let shared = app_state.runner.state();
            let state = shared.read().await;
            ServerMessage::Samples {
                samples: state.collector.samples().to_vec(),
            }
        }
        ClientMessage::Pause => ack(app_state.runner.pause(), "simulation paused"),
        ClientMessage::Resume => ack(app_state.runner.resume(), "simulation resumed"),
        ClientMessage::Reset => {
            app_state.runner.reset().await;
            ServerMessage::Notice {
                message: "simulation reset".to_string(),
            }
        }
        ClientMessage::SetTickRate { ticks_per_second } => ack(
            app_state.runner.set_tick_rate(ticks_per_second),
            "tick rate changed",
        ),
        ClientMessage::UpdateSettings { settings } => {
            let shared = app_state.runner.state();
            let mut state = shared.write().await;
            ack(state.apply_settings(&settings), "settings updated")
        }
    }
}

/// Malformed or ill-timed control requests are reported back to the client
/// and otherwise ignored; the previous state stands.
fn ack(result: Result<(), SimError>, ok_message: &str) -> ServerMessage {
    match result {
        Ok(()) => ServerMessage::Notice {
            message: ok_message.to_string(),
        },
        Err(e) => ServerMessage::Notice {
            message: format!("rejected: {e}"),
        },
    }
}
