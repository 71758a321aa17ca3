//! CORS configuration.
//!
//! Origins come from `ServerConfig::allowed_origins` (the ALLOWED_ORIGINS
//! environment variable). An empty list means a development setup and
//! falls back to a permissive policy; production deployments list their
//! web origins explicitly.

use actix_cors::Cors;
use actix_web::http::{header, Method};

pub fn create_cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        log::info!("CORS: no allowed origins configured, allowing any origin");
        return base_cors().allow_any_origin();
    }

    let mut cors = base_cors();
    for origin in allowed_origins {
        log::info!("CORS: adding allowed origin {}", origin);
        cors = cors.allowed_origin(origin);
    }
    cors
}

fn base_cors() -> Cors {
    Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(3600)
}
