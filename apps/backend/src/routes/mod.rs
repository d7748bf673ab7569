use actix_web::web;

pub mod health;
pub mod hints;
pub mod realtime;

/// Register every route. Shared by `main.rs` and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::root));

    // Health check: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Realtime: /ws (websocket upgrade) and /api/stats
    cfg.service(web::scope("/ws").configure(realtime::configure_ws));
    cfg.service(web::scope("/api/stats").configure(realtime::configure_stats));

    // Hints: /api/hints
    cfg.service(web::scope("/api/hints").configure(hints::configure_routes));
}
