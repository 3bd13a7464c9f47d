//! Read-only lookups. Every function here takes a pool reference and returns
//! owned rows; nothing in this crate mutates the relational store.

use sqlx::PgPool;

use crate::{
	Result,
	models::{Asset, AssignedPlay, Company, Play, Rep, SubmissionContext, User},
};

pub async fn list_companies(pool: &PgPool) -> Result<Vec<Company>> {
	let rows = sqlx::query_as("SELECT id, name, description FROM companies ORDER BY name")
		.fetch_all(pool)
		.await?;

	Ok(rows)
}

pub async fn list_users_by_company(pool: &PgPool, company_id: &str) -> Result<Vec<User>> {
	let rows = sqlx::query_as(
		"\
SELECT id, username, display_name, role, segment, is_active, company_id
FROM users
WHERE company_id = $1
ORDER BY username",
	)
	.bind(company_id)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

pub async fn fetch_user(pool: &PgPool, user_id: &str) -> Result<Option<User>> {
	let row = sqlx::query_as(
		"\
SELECT id, username, display_name, role, segment, is_active, company_id
FROM users
WHERE id = $1",
	)
	.bind(user_id)
	.fetch_optional(pool)
	.await?;

	Ok(row)
}

pub async fn assigned_plays(pool: &PgPool, user_id: &str) -> Result<Vec<AssignedPlay>> {
	let rows = sqlx::query_as(
		"\
SELECT p.id AS play_id, p.title, pa.status, pa.assigned_date
FROM play_assignments pa
JOIN plays p ON p.id = pa.play_id
WHERE pa.user_id = $1
ORDER BY pa.assigned_date, p.id",
	)
	.bind(user_id)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

/// Asset ids referenced by watch-type reps across every play assigned to the
/// user. Assignment status is intentionally not filtered; reps without a
/// linked asset are excluded.
pub async fn knowledge_asset_ids(pool: &PgPool, user_id: &str) -> Result<Vec<String>> {
	let ids = sqlx::query_scalar(
		"\
SELECT DISTINCT r.asset_id
FROM reps r
JOIN play_assignments pa ON pa.play_id = r.play_id
WHERE pa.user_id = $1
	AND r.prompt_type = 'watch'
	AND r.asset_id IS NOT NULL",
	)
	.bind(user_id)
	.fetch_all(pool)
	.await?;

	Ok(ids)
}

/// Asset ids of the user's own submissions only.
pub async fn submission_asset_ids(pool: &PgPool, user_id: &str) -> Result<Vec<String>> {
	let ids = sqlx::query_scalar(
		"SELECT DISTINCT asset_id FROM submissions WHERE user_id = $1",
	)
	.bind(user_id)
	.fetch_all(pool)
	.await?;

	Ok(ids)
}

/// One-shot prefetch for history context assembly: the user's submissions with
/// rep titles and feedback, avoiding a relational lookup per chunk. Feedback
/// is at most one row per submission.
pub async fn submissions_with_feedback(
	pool: &PgPool,
	user_id: &str,
) -> Result<Vec<SubmissionContext>> {
	let rows = sqlx::query_as(
		"\
SELECT s.id AS submission_id, s.asset_id, r.prompt_title AS rep_title,
	f.score AS feedback_score, f.text AS feedback_text
FROM submissions s
LEFT JOIN reps r ON r.id = s.rep_id
LEFT JOIN feedback f ON f.submission_id = s.id
WHERE s.user_id = $1",
	)
	.bind(user_id)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

pub async fn assets_by_ids(pool: &PgPool, asset_ids: &[String]) -> Result<Vec<Asset>> {
	if asset_ids.is_empty() {
		return Ok(Vec::new());
	}

	let rows = sqlx::query_as(
		"SELECT id, type, file_name, company_id FROM assets WHERE id = ANY($1)",
	)
	.bind(asset_ids)
	.fetch_all(pool)
	.await?;

	Ok(rows)
}

pub async fn asset_by_id(pool: &PgPool, asset_id: &str) -> Result<Option<Asset>> {
	let row = sqlx::query_as(
		"SELECT id, type, file_name, company_id FROM assets WHERE id = $1",
	)
	.bind(asset_id)
	.fetch_optional(pool)
	.await?;

	Ok(row)
}

pub async fn rep_for_asset(pool: &PgPool, asset_id: &str) -> Result<Option<Rep>> {
	let row = sqlx::query_as(
		"\
SELECT id, prompt_title, prompt_type, play_id, company_id, asset_id
FROM reps
WHERE asset_id = $1
ORDER BY id
LIMIT 1",
	)
	.bind(asset_id)
	.fetch_optional(pool)
	.await?;

	Ok(row)
}

pub async fn play_by_id(pool: &PgPool, play_id: &str) -> Result<Option<Play>> {
	let row = sqlx::query_as(
		"SELECT id, company_id, title, description FROM plays WHERE id = $1",
	)
	.bind(play_id)
	.fetch_optional(pool)
	.await?;

	Ok(row)
}
