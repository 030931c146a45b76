//! HTTP route handlers

pub mod assistant;
pub mod health;
pub mod models;

use actix_web::web;

/// Wire every route onto the application.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(health::liveness)).service(
        web::scope("/api")
            .route("/assistant", web::post().to(assistant::ask))
            .route("/models/free", web::get().to(models::list_free_models)),
    );
}
