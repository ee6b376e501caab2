use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;

use sparkle_clean::{auth::AuthContext, config::Config, db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger and environment
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::load();

    log::info!("Connecting to database...");
    let pool = db::get_db_pool(&config)
        .await
        .map_err(|e| std::io::Error::other(format!("failed to create pool: {e}")))?;

    log::info!("Running migrations...");
    db::run_migrations(&pool)
        .await
        .map_err(|e| std::io::Error::other(format!("failed to run migrations: {e}")))?;

    let auth = AuthContext::new(pool.clone(), &config);

    match auth.purge_expired_sessions().await {
        Ok(purged) if purged > 0 => log::info!("Purged {purged} expired session(s)"),
        Ok(_) => {}
        Err(e) => log::warn!("Could not purge expired sessions: {e}"),
    }

    if let Some(email) = &config.bootstrap_admin_email {
        if let Err(e) = auth.bootstrap_admin(email).await {
            log::warn!("Could not bootstrap admin {email}: {e}");
        }
    }

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let pool_data = web::Data::new(pool);
    let auth_data = web::Data::new(auth);

    HttpServer::new(move || {
        App::new()
            .app_data(pool_data.clone())
            .app_data(auth_data.clone())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
