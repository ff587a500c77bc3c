use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::warn;

use crate::config::Settings;
use crate::convert::convert as convert_model;
use crate::domain::format_factory::{create_format, FormatType};
use crate::error::Error;
use crate::models::{ConvertQuery, ErrorResponse};

const API_KEY_HEADER: &str = "X-API-Key";

/// Register the service routes and their request limits.
pub fn configure(settings: Settings) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let limit = settings.payload_limit;
        cfg.app_data(web::Data::new(settings))
            .app_data(web::PayloadConfig::new(limit))
            .app_data(web::QueryConfig::default().error_handler(|err, _| {
                let body = ErrorResponse::new(err.to_string(), "INVALID_QUERY");
                InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
            }))
            .route("/", web::get().to(root_redirect))
            .route("/health", web::get().to(health_check))
            .route("/docs", web::get().to(docs))
            .route("/mps-to-model", web::post().to(mps_to_model))
            .route("/model-to-mps", web::post().to(model_to_mps))
            .route("/convert", web::post().to(convert));
    }
}

// ---------- Route handlers ----------

/// POST /mps-to-model
pub async fn mps_to_model(
    req: HttpRequest,
    settings: web::Data<Settings>,
    body: String,
) -> impl Responder {
    respond(&req, &settings, &body, FormatType::Mps, FormatType::Json)
}

/// POST /model-to-mps
pub async fn model_to_mps(
    req: HttpRequest,
    settings: web::Data<Settings>,
    body: String,
) -> impl Responder {
    respond(&req, &settings, &body, FormatType::Json, FormatType::Mps)
}

/// POST /convert?from=<format>&to=<format>
pub async fn convert(
    req: HttpRequest,
    settings: web::Data<Settings>,
    query: web::Query<ConvertQuery>,
    body: String,
) -> impl Responder {
    let (from, to) = match (
        FormatType::from_str(&query.from),
        FormatType::from_str(&query.to),
    ) {
        (Some(from), Some(to)) => (from, to),
        (None, _) => return unknown_format(&query.from),
        (_, None) => return unknown_format(&query.to),
    };
    respond(&req, &settings, &body, from, to)
}

/// GET /health
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

/// GET /docs
pub async fn docs() -> impl Responder {
    let docs_html = include_str!("../static/docs.html");
    HttpResponse::Ok()
        .content_type("text/html")
        .body(docs_html)
}

/// GET / - Redirect to docs
pub async fn root_redirect() -> impl Responder {
    HttpResponse::Found()
        .append_header(("Location", "/docs"))
        .finish()
}

// ---------- Helpers ----------

fn respond(
    req: &HttpRequest,
    settings: &Settings,
    body: &str,
    from: FormatType,
    to: FormatType,
) -> HttpResponse {
    if let Err(rejection) = authorize(req, settings) {
        return rejection;
    }
    let reader = create_format(from);
    let writer = create_format(to);
    match convert_model(body, reader.as_ref(), writer.as_ref()) {
        Ok(text) => HttpResponse::Ok()
            .content_type(writer.content_type())
            .body(text),
        Err(err) => error_response(&err),
    }
}

fn authorize(req: &HttpRequest, settings: &Settings) -> Result<(), HttpResponse> {
    if !settings.protect {
        return Ok(());
    }
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());
    match (provided, settings.api_key.as_deref()) {
        (Some(provided), Some(expected)) if provided == expected => Ok(()),
        _ => {
            warn!("rejected {} {}: missing or invalid API key", req.method(), req.path());
            Err(HttpResponse::Unauthorized().json(ErrorResponse::new(
                "missing or invalid API key",
                "UNAUTHORIZED",
            )))
        }
    }
}

/// Write errors mean the request was well-formed but the model cannot be
/// expressed as MPS; everything else is a bad request.
fn error_response(err: &Error) -> HttpResponse {
    let status = match err {
        Error::Write(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Parse(_) | Error::Model(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
    };
    HttpResponse::build(status).json(ErrorResponse::from(err))
}

fn unknown_format(name: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(
        format!("unknown format `{}` (expected `mps` or `json`)", name),
        "UNKNOWN_FORMAT",
    ))
}
