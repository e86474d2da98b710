mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod state;
mod storage;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::models::{Recipe, User};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ Invalid configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    log::info!("🚀 Starting Culinary API...");
    log::info!("📊 Database: {}", config.database_name);

    let db = database::MongoDB::new(&config.database_url, &config.database_name)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, format!("Failed to connect to MongoDB: {}", e)))?;

    log::info!("✅ MongoDB connected successfully");

    if let Err(e) = db
        .ensure_indexes(&config.recipes_collection, &config.users_collection)
        .await
    {
        log::warn!("⚠️  Index setup incomplete: {}", e);
    }

    let blobs = storage::AzureBlobStore::new(&config.blob_container_url);
    blobs.ensure_container().await;

    let state = web::Data::new(state::AppState::new(
        Arc::new(db.container::<Recipe>(&config.recipes_collection)),
        Arc::new(db.container::<User>(&config.users_collection)),
        Arc::new(blobs),
        config.jwt.clone(),
    ));

    let (host, port) = (config.host.clone(), config.port);
    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .configure(api::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
