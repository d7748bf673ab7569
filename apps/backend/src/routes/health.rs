use actix_web::{web, HttpResponse};

use crate::error::AppError;

pub async fn root() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().body("Party game server"))
}

async fn health() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().content_type("text/plain").body("ok"))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(health));
}
