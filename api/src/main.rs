use actix_web::{web, HttpServer};
use log::info;
use std::io;
use std::sync::Arc;

use tb_api::app::create_app;
use tb_api::routes::AppState;
use tb_core::services::verification::{VerificationConfig, VerificationService};
use tb_infra::auth_backend::AuthBackendClient;
use tb_infra::cache::{RedisClient, RedisCodeStore};
use tb_infra::email::create_email_notifier;
use tb_shared::config::{AuthBackendConfig, CacheConfig, EmailConfig, ServerConfig};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting TaskBay API server");

    let server_config = ServerConfig::from_env();
    let cache_config = CacheConfig::from_env();
    let email_config = EmailConfig::from_env();
    let auth_backend_config = AuthBackendConfig::from_env();

    let redis_client = RedisClient::new(cache_config)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    let code_store = Arc::new(RedisCodeStore::new(redis_client));

    let notifier = Arc::new(create_email_notifier(&email_config));

    let credentials = Arc::new(
        AuthBackendClient::new(auth_backend_config)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?,
    );

    let verification = Arc::new(VerificationService::new(
        code_store,
        notifier,
        credentials,
        VerificationConfig::default(),
    ));

    let app_state = web::Data::new(AppState { verification });

    let bind_address = server_config.bind_address();
    let workers = server_config.workers;
    let allowed_origins = server_config.allowed_origins;
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(app_state.clone(), &allowed_origins));
    if workers > 0 {
        server = server.workers(workers);
    }
    server.bind(&bind_address)?.run().await
}
