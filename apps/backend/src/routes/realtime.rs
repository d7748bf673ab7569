use actix_web::{web, Error, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::ws::session;

#[derive(Debug, Serialize)]
struct StatsResponse {
    rooms: usize,
    connections: usize,
}

async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    session::upgrade(req, stream, app_state).await
}

async fn stats(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(StatsResponse {
        rooms: app_state.registry.room_count(),
        connections: app_state.hub.active_connections_count(),
    }))
}

pub fn configure_ws(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(upgrade));
}

pub fn configure_stats(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(stats));
}
