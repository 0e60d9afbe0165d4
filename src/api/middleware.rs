// Additional middleware for logging, CORS, etc.

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::{Compress, Logger, NormalizePath};

pub fn setup_middleware() -> (Logger, Compress) {
    let logger = Logger::new("%a \"%r\" %s %b %Dms");
    let compress = Compress::default();
    (logger, compress)
}

/// `/countries/` and `/countries` resolve to the same route.
pub fn normalize_path() -> NormalizePath {
    NormalizePath::trim()
}

/// Comma-separated origins; `*` allows any origin.
pub fn setup_cors(allowed_origins: &str) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "DELETE"])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600);

    for origin in allowed_origins.split(',').map(str::trim).filter(|o| !o.is_empty()) {
        if origin == "*" {
            return cors.allow_any_origin();
        }
        cors = cors.allowed_origin(origin);
    }

    cors
}
