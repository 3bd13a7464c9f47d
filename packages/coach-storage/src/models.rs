//! Row types for the read-only relational entities. Ids and timestamps are
//! opaque TEXT written by the offline ingestion process; this service never
//! writes any of these tables.

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Company {
	pub id: String,
	pub name: String,
	pub description: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
	pub id: String,
	pub username: String,
	pub display_name: Option<String>,
	pub role: Option<String>,
	pub segment: Option<String>,
	pub is_active: bool,
	pub company_id: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Play {
	pub id: String,
	pub company_id: String,
	pub title: String,
	pub description: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlayAssignment {
	pub id: String,
	pub user_id: String,
	pub play_id: String,
	pub status: Option<String>,
	pub assigned_date: Option<String>,
	pub completed_at: Option<String>,
}

/// A unit within a play: "watch" reps reference an asset, "practice" reps are
/// fulfilled by submissions.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Rep {
	pub id: String,
	pub prompt_title: Option<String>,
	pub prompt_type: String,
	pub play_id: String,
	pub company_id: String,
	pub asset_id: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Asset {
	pub id: String,
	pub r#type: String,
	pub file_name: String,
	pub company_id: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Submission {
	pub id: String,
	pub user_id: String,
	pub rep_id: String,
	pub asset_id: String,
	pub company_id: String,
	pub submitted_at: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Feedback {
	pub id: String,
	pub submission_id: String,
	pub company_id: String,
	pub score: i32,
	pub text: Option<String>,
}

/// One row of the `GET /users/{id}` assigned-plays join.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AssignedPlay {
	pub play_id: String,
	pub title: String,
	pub status: Option<String>,
	pub assigned_date: Option<String>,
}

/// Per-user prefetch joining submissions to rep titles and feedback, keyed by
/// asset id during history context assembly.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SubmissionContext {
	pub submission_id: String,
	pub asset_id: String,
	pub rep_title: Option<String>,
	pub feedback_score: Option<i32>,
	pub feedback_text: Option<String>,
}
