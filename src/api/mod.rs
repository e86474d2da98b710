pub mod auth;
pub mod health;
pub mod recipes;
pub mod swagger;


use actix_web::web;

use crate::middleware::IdentityMiddleware;
use crate::utils::AppError;

/// Registers every route of the service. Shared by `main` and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::InvalidRequest(format!("Invalid JSON body: {}", err)).into()
    }))
    .route("/", web::get().to(health::home))
    .route("/api/health", web::get().to(health::health_check))
    .service(
        web::scope("/api/auth")
            .route("/login", web::post().to(auth::login))
            .route("/register", web::post().to(auth::register)),
    )
    .service(
        web::scope("/api/recipes")
            .wrap(IdentityMiddleware)
            .route("", web::get().to(recipes::list_recipes))
            .route("", web::post().to(recipes::create_recipe))
            .route("/{id}", web::get().to(recipes::get_recipe))
            .route("/{id}", web::put().to(recipes::update_recipe))
            .route("/{id}", web::delete().to(recipes::delete_recipe)),
    );
}
