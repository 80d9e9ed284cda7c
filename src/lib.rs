pub mod application;
pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;
pub mod state;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};
pub use state::AppState;

use crate::errors::AppError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    if !applied.is_empty() {
        log::info!("Applied {} migration(s)", applied.len());
    }
    Ok(())
}

/// Register shared state, extractor configuration and every route.
///
/// Used by [`build_server`] and by tests that drive the app in-process.
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .service(
                web::scope("/api")
                    .service(
                        web::resource("/user/wishlist")
                            .route(web::get().to(handlers::wishlist::get_wishlist))
                            .route(web::post().to(handlers::wishlist::add_to_wishlist))
                            .route(web::delete().to(handlers::wishlist::remove_from_wishlist)),
                    )
                    .service(
                        web::resource("/orders")
                            .route(web::post().to(handlers::orders::create_order))
                            .route(web::get().to(handlers::orders::list_my_orders)),
                    )
                    .route("/orders/{id}", web::get().to(handlers::orders::get_order))
                    .service(
                        web::resource("/admin/orders")
                            .route(web::get().to(handlers::admin::list_orders))
                            .route(web::put().to(handlers::admin::update_order_status)),
                    )
                    .route("/auth/check", web::get().to(handlers::auth::check)),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
            );
    }
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(configure(state.clone()))
    })
    .bind((host.to_string(), port))?
    .run())
}
