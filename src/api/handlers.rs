// HTTP request handlers for API endpoints

use crate::api::errors::ApiError;
use crate::api::models::*;
use crate::api::AppState;
use crate::summary::{CONTENT_TYPE, SUMMARY_FILE};
use actix_web::http::header;
use actix_web::{web, HttpResponse};

type ApiResult = Result<HttpResponse, ApiError>;

/// Health check endpoint
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database = if state.store.ping().await {
        "connected"
    } else {
        "disconnected"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        database: database.to_string(),
    })
}

/// Pull both upstreams, rebuild the cache and regenerate the summary image.
pub async fn refresh_countries(state: web::Data<AppState>) -> ApiResult {
    tracing::info!("Refresh requested");
    let summary = state.refresh.run().await?;
    Ok(HttpResponse::Ok().json(RefreshResponse::from(summary)))
}

pub async fn list_countries(
    state: web::Data<AppState>,
    params: web::Query<ListCountriesParams>,
) -> ApiResult {
    // reject a bad sort before touching the store
    let query = params.into_inner().into_query()?;
    let countries = state.store.list_all().await?;
    Ok(HttpResponse::Ok().json(query.apply(countries)))
}

pub async fn get_country(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult {
    let name = path.into_inner();
    let country = state.store.get(&name).await?.ok_or(ApiError::NotFound)?;

    let errors = validation_errors(&country);
    if !errors.is_empty() {
        tracing::warn!(country = %country.name, ?errors, "stored record failed validation");
        return Err(ApiError::Validation(errors));
    }

    Ok(HttpResponse::Ok().json(country))
}

pub async fn delete_country(state: web::Data<AppState>, path: web::Path<String>) -> ApiResult {
    let name = path.into_inner();
    if !state.store.delete(&name).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(country = %name, "Country deleted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Country deleted successfully.")))
}

pub async fn status(state: web::Data<AppState>) -> ApiResult {
    let status = state.store.status().await?;
    Ok(HttpResponse::Ok().json(StatusResponse {
        total_countries: status.total_countries,
        last_refreshed_at: status.last_refreshed_at,
    }))
}

/// Serve the cached summary image produced by the last refresh.
pub async fn summary_image(state: web::Data<AppState>) -> ApiResult {
    let bytes = state.summary.load().await?.ok_or(ApiError::ImageNotFound)?;
    Ok(HttpResponse::Ok()
        .content_type(CONTENT_TYPE)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{SUMMARY_FILE}\""),
        ))
        .body(bytes))
}
