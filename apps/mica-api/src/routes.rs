use std::collections::BTreeMap;

use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;

use mica_service::{
	Error, FacetResponse, InvalidateResponse, SearchParams, SearchResponse, Surface,
	VocabularyResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/catalog/vocabulary", get(vocabulary))
		.route("/v1/catalog/{surface}", get(search))
		.route("/v1/catalog/{surface}/facets/{dimension}", get(facet))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new().route("/v1/admin/facets/invalidate", post(invalidate_facets)).with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn vocabulary(State(state): State<AppState>) -> Result<Json<VocabularyResponse>, ApiError> {
	let response = state.service.vocabulary().await?;

	Ok(Json(response))
}

async fn search(
	State(state): State<AppState>,
	Path(surface): Path<String>,
	Query(query): Query<BTreeMap<String, String>>,
) -> Result<Json<SearchResponse>, ApiError> {
	let surface = Surface::parse(&surface)?;
	let response = state.service.search(surface, SearchParams::from_query(&query)).await?;

	Ok(Json(response))
}

async fn facet(
	State(state): State<AppState>,
	Path((surface, dimension)): Path<(String, String)>,
	Query(query): Query<BTreeMap<String, String>>,
) -> Result<Json<FacetResponse>, ApiError> {
	let surface = Surface::parse(&surface)?;
	let response =
		state.service.facet(surface, &dimension, SearchParams::from_query(&query)).await?;

	Ok(Json(response))
}

async fn invalidate_facets(State(state): State<AppState>) -> Json<InvalidateResponse> {
	Json(state.service.invalidate_facets())
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			Error::Timeout { source_name, timeout_ms } => Self::new(
				StatusCode::GATEWAY_TIMEOUT,
				"SOURCE_TIMEOUT",
				format!("Source {source_name} timed out after {timeout_ms} ms."),
				Some(vec![source_name.to_string()]),
			),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Catalog store request failed.");

				Self::new(
					StatusCode::SERVICE_UNAVAILABLE,
					"STORAGE_ERROR",
					"Catalog store is unavailable.",
					None,
				)
			},
			Error::Config { message } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR", message, None),
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}
