use std::sync::Arc;

use dotenvy::dotenv;
use secrecy::ExposeSecret;
use storefront::auth::{AdminPassword, SessionSigner};
use storefront::config::Config;
use storefront::infrastructure::order_repo::DieselOrderRepository;
use storefront::infrastructure::wishlist_repo::DieselWishlistRepository;
use storefront::{build_server, create_pool, run_migrations, AppState};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env()?;

    let pool = create_pool(config.database_url.expose_secret())?;
    run_migrations(&pool)?;

    let state = AppState::new(
        Arc::new(DieselOrderRepository::new(pool.clone())),
        Arc::new(DieselWishlistRepository::new(pool)),
        SessionSigner::new(&config.session_secret)?,
        AdminPassword(config.admin_password.clone()),
    );

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await?;
    Ok(())
}
