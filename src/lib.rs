use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod checkout;
pub mod config;
pub mod formatter;
pub mod generation;
pub mod payment;
pub mod state;
pub mod storage;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

/// JSON error payload returned by every failing endpoint except downloads.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(kind: &str, message: &str) -> Self {
        Self {
            error: message.to_string(),
            kind: kind.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::checkout::handlers::create_checkout_session,
        crate::checkout::handlers::payment_success,
        crate::checkout::handlers::download,
        crate::checkout::handlers::health
    ),
    components(
        schemas(
            checkout::models::CheckoutRequest,
            checkout::models::FormSubmission,
            checkout::models::ProtectionLevel,
            checkout::models::CheckoutSessionResponse,
            checkout::models::PaymentSuccessResponse,
            checkout::models::HealthResponse,
            checkout::models::ProblemDetails,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Checkout", description = "Payment session and document generation endpoints."),
        (name = "Documents", description = "Generated document downloads."),
        (name = "Health", description = "Payment provider connectivity.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost server")
    )
)]
pub struct ApiDoc;

pub async fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env()?;
    let app_state = match AppState::from_config(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!(
                "Failed to initialise application state. Check DOCUMENTS_DIR and the API keys in .env. Error: {}",
                e
            );
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("instant_legal_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create Prometheus metrics middleware: {}", e))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .configure(checkout::handlers::config)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
