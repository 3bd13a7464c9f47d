//! DDL for the read-only relational entities. Applied idempotently at boot and
//! by tests; population happens in the offline ingestion process.

pub const SCHEMA_SQL: &str = "\
CREATE TABLE IF NOT EXISTS companies (
	id          TEXT PRIMARY KEY,
	name        TEXT NOT NULL,
	description TEXT
);

CREATE TABLE IF NOT EXISTS users (
	id           TEXT PRIMARY KEY,
	username     TEXT NOT NULL,
	display_name TEXT,
	role         TEXT,
	segment      TEXT,
	is_active    BOOLEAN NOT NULL DEFAULT TRUE,
	company_id   TEXT NOT NULL REFERENCES companies (id)
);

CREATE TABLE IF NOT EXISTS plays (
	id          TEXT PRIMARY KEY,
	company_id  TEXT NOT NULL REFERENCES companies (id),
	title       TEXT NOT NULL,
	description TEXT
);

CREATE TABLE IF NOT EXISTS play_assignments (
	id            TEXT PRIMARY KEY,
	user_id       TEXT NOT NULL REFERENCES users (id),
	play_id       TEXT NOT NULL REFERENCES plays (id),
	status        TEXT,
	assigned_date TEXT,
	completed_at  TEXT
);

CREATE TABLE IF NOT EXISTS assets (
	id         TEXT PRIMARY KEY,
	type       TEXT NOT NULL,
	file_name  TEXT NOT NULL,
	company_id TEXT NOT NULL REFERENCES companies (id)
);

CREATE TABLE IF NOT EXISTS reps (
	id           TEXT PRIMARY KEY,
	prompt_title TEXT,
	prompt_type  TEXT NOT NULL,
	play_id      TEXT NOT NULL REFERENCES plays (id),
	company_id   TEXT NOT NULL REFERENCES companies (id),
	asset_id     TEXT REFERENCES assets (id)
);

CREATE TABLE IF NOT EXISTS submissions (
	id           TEXT PRIMARY KEY,
	user_id      TEXT NOT NULL REFERENCES users (id),
	rep_id       TEXT NOT NULL REFERENCES reps (id),
	asset_id     TEXT NOT NULL REFERENCES assets (id),
	company_id   TEXT NOT NULL REFERENCES companies (id),
	submitted_at TEXT
);

CREATE TABLE IF NOT EXISTS feedback (
	id            TEXT PRIMARY KEY,
	submission_id TEXT NOT NULL REFERENCES submissions (id),
	company_id    TEXT NOT NULL REFERENCES companies (id),
	score         INTEGER NOT NULL,
	text          TEXT
);

CREATE INDEX IF NOT EXISTS idx_users_company ON users (company_id);
CREATE INDEX IF NOT EXISTS idx_play_assignments_user ON play_assignments (user_id);
CREATE INDEX IF NOT EXISTS idx_reps_play ON reps (play_id);
CREATE INDEX IF NOT EXISTS idx_reps_asset ON reps (asset_id);
CREATE INDEX IF NOT EXISTS idx_submissions_user ON submissions (user_id);
CREATE INDEX IF NOT EXISTS idx_feedback_submission ON feedback (submission_id)";
