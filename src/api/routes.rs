use axum::{
    body::Bytes,
    routing::get,
    Router,
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;

use crate::error::{Result, AppError};
use crate::api::models::{PingResponse, SummaryRecord, SummaryResponse};
use crate::summarizer::generate_summary;
use crate::validation::{combine, parse_create, parse_id, parse_update};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    // Both spellings of each path are served so clients need not follow redirects.
    Router::new()
        .route("/ping", get(ping))
        .route("/summaries/", get(read_all_summaries).post(create_summary))
        .route("/summaries", get(read_all_summaries).post(create_summary))
        .route(
            "/summaries/:id/",
            get(read_summary).put(update_summary).delete(remove_summary),
        )
        .route(
            "/summaries/:id",
            get(read_summary).put(update_summary).delete(remove_summary),
        )
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    Json(PingResponse {
        ping: "pong!",
        environment: state.config.environment.clone(),
        testing: state.config.testing,
    })
}

async fn create_summary(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<SummaryResponse>)> {
    let payload = parse_create(&body).map_err(AppError::ValidationError)?;
    let id = state.repo.post(&payload).await?;
    tracing::info!(id, url = %payload.url, "summary record created");

    let response = SummaryResponse {
        id,
        url: payload.url.to_string(),
    };

    state.tasks.spawn(generate_summary(
        state.repo.clone(),
        state.generator.clone(),
        id,
        response.url.clone(),
    ));

    Ok((StatusCode::CREATED, Json(response)))
}

async fn read_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SummaryRecord>> {
    let id = parse_id(&id).map_err(AppError::ValidationError)?;
    let record = state.repo.get(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(record))
}

async fn read_all_summaries(State(state): State<AppState>) -> Result<Json<Vec<SummaryRecord>>> {
    let records = state.repo.get_all().await?;
    Ok(Json(records))
}

async fn update_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<SummaryRecord>> {
    let (id, payload) = combine(parse_id(&id), parse_update(&body))?;
    let record = state.repo.put(id, &payload).await?.ok_or(AppError::NotFound)?;
    tracing::info!(id, url = %record.url, "summary record updated");
    Ok(Json(record))
}

async fn remove_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SummaryResponse>> {
    let id = parse_id(&id).map_err(AppError::ValidationError)?;
    let record = state.repo.get(id).await?.ok_or(AppError::NotFound)?;
    state.repo.delete(id).await?.ok_or(AppError::NotFound)?;
    tracing::info!(id, url = %record.url, "summary record deleted");

    Ok(Json(SummaryResponse {
        id: record.id,
        url: record.url,
    }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({ "detail": "Not Found" })))
}
