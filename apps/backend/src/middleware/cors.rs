use actix_cors::Cors;
use actix_web::http::header;

use crate::middleware::request_trace::REQUEST_ID_HEADER;

/// CORS for the configured frontend origins.
///
/// Only the methods the API serves are allowed; the request id header is
/// readable by the browser.
pub fn cors_middleware(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(3600);

    for origin in origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
