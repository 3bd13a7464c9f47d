use std::convert::Infallible;

use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{
		IntoResponse, Response,
		sse::{Event, KeepAlive, Sse},
	},
	routing::{get, post},
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use coach_service::{
	CompanySummary, EventSink, SearchEvent, ServiceError, UserDetail, UserSummary,
};

use crate::state::AppState;

/// Bounded event buffer between the orchestrator task and the SSE response.
/// A slow consumer backpressures the orchestrator instead of dropping events.
const EVENT_CHANNEL_CAPACITY: usize = 32;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/companies", get(list_companies))
		.route("/companies/{company_id}/users", get(list_company_users))
		.route("/users/{user_id}", get(user_detail))
		.route("/search", post(search))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn list_companies(
	State(state): State<AppState>,
) -> Result<Json<Vec<CompanySummary>>, ApiError> {
	let companies = state.service.list_companies().await?;

	Ok(Json(companies))
}

async fn list_company_users(
	State(state): State<AppState>,
	Path(company_id): Path<String>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
	let users = state.service.list_company_users(&company_id).await?;

	Ok(Json(users))
}

async fn user_detail(
	State(state): State<AppState>,
	Path(user_id): Path<String>,
) -> Result<Json<UserDetail>, ApiError> {
	let detail = state.service.user_detail(&user_id).await?;

	Ok(Json(detail))
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
	pub user_id: String,
	pub query: String,
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
	// An unknown user aborts with 404 before any event stream starts.
	let user = state.service.fetch_user(&payload.user_id).await?;
	let (mut sink, rx) = EventSink::channel(EVENT_CHANNEL_CAPACITY);
	let service = state.service.clone();

	tokio::spawn(async move {
		service.search(&user, &payload.query, &mut sink).await;
	});

	let stream = rx.map(|event: SearchEvent| {
		Ok(Event::default().event(event.name()).data(event.data().to_string()))
	});

	Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: &'static str,
	message: String,
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::NotFound { message } => {
				Self { status: StatusCode::NOT_FOUND, error_code: "not_found", message }
			},
			ServiceError::InvalidRequest { message } => {
				Self { status: StatusCode::BAD_REQUEST, error_code: "invalid_request", message }
			},
			ServiceError::Provider { .. } => {
				tracing::error!(error = %err, "Provider failure surfaced to the API.");

				Self {
					status: StatusCode::BAD_GATEWAY,
					error_code: "provider_error",
					message: err.to_string(),
				}
			},
			ServiceError::Storage { .. } | ServiceError::Index { .. } | ServiceError::Canceled => {
				tracing::error!(error = %err, "Internal failure surfaced to the API.");

				Self {
					status: StatusCode::INTERNAL_SERVER_ERROR,
					error_code: "internal_error",
					message: err.to_string(),
				}
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code.to_string(), message: self.message };

		(self.status, Json(body)).into_response()
	}
}
