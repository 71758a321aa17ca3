//! Application factory.
//!
//! Builds the Actix application from an already-wired `AppState`, so the
//! same route table serves the binary and the integration tests.

use actix_web::{middleware::Logger, web, App, HttpResponse};

use tb_core::services::verification::{CodeStore, CredentialStore, EmailNotifier};
use tb_shared::types::response::ErrorResponse;

use crate::middleware::cors::create_cors;
use crate::routes::{otp, password, AppState};

/// Create and configure the application with all dependencies
pub fn create_app<S, N, P>(
    app_state: web::Data<AppState<S, N, P>>,
    allowed_origins: &[String],
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: CodeStore + 'static,
    N: EmailNotifier + 'static,
    P: CredentialStore + 'static,
{
    let cors = create_cors(allowed_origins);

    App::new()
        .app_data(app_state)
        .wrap(Logger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // OTP login flow
        .service(
            web::scope("/otp")
                .route("/send", web::post().to(otp::send_otp::<S, N, P>))
                .route("/verify", web::post().to(otp::verify_otp::<S, N, P>)),
        )
        // Password change flow
        .service(
            web::scope("/password")
                .route("/change", web::post().to(password::change_password::<S, N, P>))
                .route("/verify", web::post().to(password::verify_password::<S, N, P>)),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "taskbay-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "not_found",
        "The requested resource was not found",
    ))
}
