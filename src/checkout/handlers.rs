use actix_multipart::Multipart;
use actix_web::error::{InternalError, QueryPayloadError};
use actix_web::{http::header, web, Either, Error, HttpRequest, HttpResponse, Responder};
use log::{error, info, warn};

use super::models::{
    CheckoutRequest, CheckoutSessionResponse, HealthResponse, PaymentSuccessQuery,
    PaymentSuccessResponse, ProblemDetails,
};
use super::multipart_parser::MultipartParser;
use super::validation::{validate_session_id, ValidationErrors};
use super::CheckoutError;
use crate::formatter::common::today;
use crate::formatter::{FormattedDocument, RenderError};
use crate::storage::{document_filename, is_plain_filename};
use crate::{AppState, ErrorResponse};

/// Validate the posted form and open a checkout session for it.
pub async fn open_checkout_session(
    state: &AppState,
    request: CheckoutRequest,
) -> Result<String, CheckoutError> {
    let checkout = request
        .validate()
        .map_err(|errors| CheckoutError::Validation(errors.to_message()))?;

    let session_id = state
        .gateway
        .create_session(&checkout.form, &checkout.host_url)
        .await?;
    Ok(session_id)
}

/// Turn a paid session into a stored document and return its file name.
///
/// Each call drafts and stores a new document; the caller decides when to
/// stop polling.
pub async fn fulfil_order(state: &AppState, session_id: &str) -> Result<String, CheckoutError> {
    let mut errors = ValidationErrors::new();
    validate_session_id(session_id, "session_id", &mut errors);
    if !errors.is_empty() {
        return Err(CheckoutError::Validation(errors.to_message()));
    }

    let session = state.gateway.fetch_session(session_id).await?;

    if !session.payment_status.is_settled() {
        warn!(
            "Refusing to generate document for session {}: payment status is '{}'",
            session.session_id, session.payment_status
        );
        return Err(CheckoutError::PaymentIncomplete {
            session_id: session.session_id,
            status: session.payment_status,
        });
    }

    let form = session.form;
    let text = state.assembler.generate(&form).await?;

    let document = FormattedDocument::new(
        &text,
        state.catalog.label_or_custom(&form.document_type),
        &form.business_name,
        today(),
    );
    let renderer = state.renderer.clone();
    let pdf = web::block(move || renderer.render(&document))
        .await
        .map_err(|e| RenderError::Worker(e.to_string()))??;

    let filename = document_filename(&form.document_type);
    state.store.save(&filename, &pdf).await?;
    info!(
        "Stored {} ({} bytes) for session {}",
        filename,
        pdf.len(),
        session_id
    );

    Ok(filename)
}

#[utoipa::path(
    tag = "Checkout",
    post,
    path = "/create-checkout-session",
    request_body(content = CheckoutRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutSessionResponse),
        (status = 400, description = "Invalid form or payment provider rejection", body = ErrorResponse)
    )
)]
pub async fn create_checkout_session(
    state: web::Data<AppState>,
    payload: Either<web::Form<CheckoutRequest>, Multipart>,
) -> impl Responder {
    info!("Executing create_checkout_session handler");

    let request = match payload {
        Either::Left(form) => form.into_inner(),
        Either::Right(multipart) => match MultipartParser::parse_checkout_multipart(multipart).await {
            Ok(request) => request,
            Err(e) => return HttpResponse::from(e),
        },
    };

    match open_checkout_session(&state, request).await {
        Ok(session_id) => {
            info!("Checkout session {} created", session_id);
            HttpResponse::Ok().json(CheckoutSessionResponse { session_id })
        }
        Err(e) => e.into(),
    }
}

#[utoipa::path(
    tag = "Checkout",
    get,
    path = "/payment-success",
    params(PaymentSuccessQuery),
    responses(
        (status = 200, description = "Document generated", body = PaymentSuccessResponse),
        (status = 400, description = "Session could not be read or is not paid", body = ErrorResponse),
        (status = 502, description = "Text generation failed", body = ErrorResponse),
        (status = 500, description = "Rendering or storage failed", body = ErrorResponse)
    )
)]
pub async fn payment_success(
    state: web::Data<AppState>,
    query: web::Query<PaymentSuccessQuery>,
) -> impl Responder {
    let session_id = query.into_inner().session_id;
    info!("Executing payment_success handler for session {}", session_id);

    match fulfil_order(&state, &session_id).await {
        Ok(filename) => HttpResponse::Ok().json(PaymentSuccessResponse {
            success: true,
            download_url: format!("/download/{}", filename),
        }),
        Err(e) => e.into(),
    }
}

#[utoipa::path(
    tag = "Documents",
    get,
    path = "/download/{filename}",
    params(
        ("filename" = String, Path, description = "Name returned in download_url")
    ),
    responses(
        (status = 200, description = "Document bytes, content type inferred from the extension"),
        (status = 404, description = "No such document")
    )
)]
pub async fn download(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let filename = path.into_inner();
    info!("Executing download handler for {}", filename);

    if !is_plain_filename(&filename) {
        warn!("Rejected download of suspicious name '{}'", filename);
        return HttpResponse::NotFound().finish();
    }

    match state.store.load(&filename).await {
        Ok(Some(data)) => {
            let mime = mime_guess::from_path(&filename).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.to_string())
                .insert_header(header::ContentDisposition::attachment(filename))
                .body(data)
        }
        Ok(None) => HttpResponse::NotFound().finish(),
        Err(e) => {
            error!("Failed to read document '{}': {}", filename, e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
    }
}

#[utoipa::path(
    tag = "Health",
    get,
    path = "/health",
    responses(
        (status = 200, description = "Payment provider reachable", body = HealthResponse),
        (status = 500, description = "Payment provider unreachable", body = ProblemDetails, content_type = "application/problem+json")
    )
)]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    match state.gateway.health().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: chrono::Local::now().to_rfc3339(),
        }),
        Err(e) => {
            error!("Health check failed: {}", e);
            HttpResponse::InternalServerError()
                .content_type("application/problem+json")
                .json(ProblemDetails {
                    problem_type: "about:blank".to_string(),
                    title: "Payment provider unreachable".to_string(),
                    status: 500,
                    detail: e.to_string(),
                })
        }
    }
}

/// Malformed query strings get the JSON error body.
fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    let message = err.to_string();
    warn!("Rejected query string: {}", message);
    InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message)),
    )
    .into()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::resource("/create-checkout-session")
                .route(web::post().to(create_checkout_session)),
        )
        .service(web::resource("/payment-success").route(web::get().to(payment_success)))
        .service(web::resource("/download/{filename}").route(web::get().to(download)))
        .service(web::resource("/health").route(web::get().to(health)));
}
