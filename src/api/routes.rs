// API route configuration

use crate::api::handlers;
use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health_check))
        .route("/status", web::get().to(handlers::status))
        // fixed paths first so they are not captured by `/countries/{name}`
        .route("/countries/refresh", web::post().to(handlers::refresh_countries))
        .route("/countries/image", web::get().to(handlers::summary_image))
        .route("/countries", web::get().to(handlers::list_countries))
        .service(
            web::resource("/countries/{name}")
                .route(web::get().to(handlers::get_country))
                .route(web::delete().to(handlers::delete_country)),
        );
}
