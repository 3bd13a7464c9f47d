use axum::{
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::Map;
use sqlx::PgPool;
use tower::util::ServiceExt;

use coach_api::{routes, state::AppState};
use coach_config::{
	Config, EmbeddingProviderConfig, Postgres, ProviderConfig, Providers, Qdrant, Search, Service,
	Storage,
};

fn test_config(dsn: String) -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		storage: Storage {
			postgres: Postgres { dsn, pool_max_conns: 2 },
			qdrant: Qdrant {
				url: "http://127.0.0.1:1".to_string(),
				knowledge_collection: "knowledge".to_string(),
				submissions_collection: "submissions".to_string(),
				vector_dim: 4,
			},
		},
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "test".to_string(),
				dimensions: 4,
				max_input_chars: 8_000,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			classifier: dummy_provider(),
			generation: dummy_provider(),
		},
		search: Search { knowledge_top_k: 8, history_top_k: 6 },
	}
}

fn dummy_provider() -> ProviderConfig {
	ProviderConfig {
		api_base: "http://127.0.0.1:1".to_string(),
		api_key: "test-key".to_string(),
		path: "/v1/chat/completions".to_string(),
		model: "test".to_string(),
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

async fn seed_directory(pool: &PgPool) {
	let statements = [
		"INSERT INTO companies (id, name, description) VALUES ('c1', 'Acme', 'Pharma sales')",
		"INSERT INTO users (id, username, display_name, role, segment, is_active, company_id) VALUES \
			('u1', 'ana', 'Ana', 'rep', 'enterprise', TRUE, 'c1'), \
			('u3', 'cora', 'Cora', 'rep', 'smb', TRUE, 'c1')",
	];

	for statement in statements {
		sqlx::query(statement).execute(pool).await.expect("Failed to seed fixture row.");
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set COACH_PG_DSN to run."]
async fn health_ok() {
	let Some(base_dsn) = coach_testkit::env_dsn() else {
		return;
	};

	coach_testkit::with_test_db(&base_dsn, async move |test_db| {
		let state = AppState::new(test_config(test_db.dsn().to_string()))
			.await
			.expect("Failed to initialize app state.");
		let app = routes::router(state);
		let response = app
			.oneshot(
				Request::builder()
					.uri("/health")
					.body(Body::empty())
					.expect("Failed to build request."),
			)
			.await
			.expect("Failed to call /health.");

		assert_eq!(response.status(), StatusCode::OK);

		Ok(())
	})
	.await
	.expect("Test database run failed.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set COACH_PG_DSN to run."]
async fn directory_endpoints_list_and_404() {
	let Some(base_dsn) = coach_testkit::env_dsn() else {
		return;
	};

	coach_testkit::with_test_db(&base_dsn, async move |test_db| {
		let state = AppState::new(test_config(test_db.dsn().to_string()))
			.await
			.expect("Failed to initialize app state.");

		seed_directory(&state.service.db.pool).await;

		let app = routes::router(state);
		let response = app
			.clone()
			.oneshot(
				Request::builder()
					.uri("/companies")
					.body(Body::empty())
					.expect("Failed to build request."),
			)
			.await
			.expect("Failed to call /companies.");

		assert_eq!(response.status(), StatusCode::OK);

		let bytes = body::to_bytes(response.into_body(), usize::MAX)
			.await
			.expect("Failed to read response body.");
		let companies: serde_json::Value =
			serde_json::from_slice(&bytes).expect("Failed to parse response.");

		assert_eq!(companies[0]["name"], "Acme");

		let response = app
			.clone()
			.oneshot(
				Request::builder()
					.uri("/companies/c1/users")
					.body(Body::empty())
					.expect("Failed to build request."),
			)
			.await
			.expect("Failed to call /companies/c1/users.");
		let bytes = body::to_bytes(response.into_body(), usize::MAX)
			.await
			.expect("Failed to read response body.");
		let users: serde_json::Value =
			serde_json::from_slice(&bytes).expect("Failed to parse response.");

		assert_eq!(users[0]["username"], "ana");
		assert_eq!(users[1]["username"], "cora");

		let response = app
			.oneshot(
				Request::builder()
					.uri("/users/nobody")
					.body(Body::empty())
					.expect("Failed to build request."),
			)
			.await
			.expect("Failed to call /users/nobody.");

		assert_eq!(response.status(), StatusCode::NOT_FOUND);

		let bytes = body::to_bytes(response.into_body(), usize::MAX)
			.await
			.expect("Failed to read response body.");
		let error: serde_json::Value =
			serde_json::from_slice(&bytes).expect("Failed to parse response.");

		assert_eq!(error["error_code"], "not_found");

		Ok(())
	})
	.await
	.expect("Test database run failed.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set COACH_PG_DSN to run."]
async fn search_unknown_user_is_404_before_any_stream() {
	let Some(base_dsn) = coach_testkit::env_dsn() else {
		return;
	};

	coach_testkit::with_test_db(&base_dsn, async move |test_db| {
		let state = AppState::new(test_config(test_db.dsn().to_string()))
			.await
			.expect("Failed to initialize app state.");
		let app = routes::router(state);
		let payload = serde_json::json!({ "user_id": "nobody", "query": "anything" });
		let response = app
			.oneshot(
				Request::builder()
					.method("POST")
					.uri("/search")
					.header("content-type", "application/json")
					.body(Body::from(payload.to_string()))
					.expect("Failed to build request."),
			)
			.await
			.expect("Failed to call /search.");

		assert_eq!(response.status(), StatusCode::NOT_FOUND);

		Ok(())
	})
	.await
	.expect("Test database run failed.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set COACH_PG_DSN to run."]
async fn search_streams_guidance_for_an_empty_scope() {
	let Some(base_dsn) = coach_testkit::env_dsn() else {
		return;
	};

	coach_testkit::with_test_db(&base_dsn, async move |test_db| {
		let state = AppState::new(test_config(test_db.dsn().to_string()))
			.await
			.expect("Failed to initialize app state.");

		seed_directory(&state.service.db.pool).await;

		let app = routes::router(state);
		// The classifier endpoint is unreachable, so the intent degrades to
		// KNOWLEDGE_SEARCH; the user has no play assignments, so the stream
		// carries guidance and completes without touching the vector index.
		let payload = serde_json::json!({ "user_id": "u3", "query": "Amproxin dosage?" });
		let response = app
			.oneshot(
				Request::builder()
					.method("POST")
					.uri("/search")
					.header("content-type", "application/json")
					.body(Body::from(payload.to_string()))
					.expect("Failed to build request."),
			)
			.await
			.expect("Failed to call /search.");

		assert_eq!(response.status(), StatusCode::OK);

		let bytes = body::to_bytes(response.into_body(), usize::MAX)
			.await
			.expect("Failed to read response body.");
		let text = String::from_utf8_lossy(&bytes);

		assert!(text.contains("event: intent"));
		assert!(text.contains("KNOWLEDGE_SEARCH"));
		assert!(text.contains("event: answer_chunk"));
		assert!(text.contains("event: done"));
		assert!(text.contains("\"status\":\"complete\""));

		Ok(())
	})
	.await
	.expect("Test database run failed.");
}
