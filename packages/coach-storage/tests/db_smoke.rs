use sqlx::PgPool;

use coach_storage::{db::Db, queries};

async fn seed_fixture(pool: &PgPool) {
	let statements = [
		"INSERT INTO companies (id, name, description) VALUES ('c1', 'Acme', NULL), ('c2', 'Globex', NULL)",
		"INSERT INTO users (id, username, display_name, role, segment, is_active, company_id) VALUES \
			('u1', 'ana', 'Ana', 'rep', 'enterprise', TRUE, 'c1'), \
			('u2', 'bo', 'Bo', 'rep', 'smb', TRUE, 'c1')",
		"INSERT INTO plays (id, company_id, title, description) VALUES \
			('p1', 'c1', 'Antibiotics Launch', NULL), \
			('p2', 'c1', 'Locked Play', NULL)",
		"INSERT INTO play_assignments (id, user_id, play_id, status, assigned_date, completed_at) VALUES \
			('pa1', 'u1', 'p1', 'assigned', '2025-01-01', NULL), \
			('pa2', 'u1', 'p2', 'locked', '2025-01-02', NULL)",
		"INSERT INTO assets (id, type, file_name, company_id) VALUES \
			('a1', 'pdf', 'amproxin-guide.json', 'c1'), \
			('a2', 'video', 'locked-video.json', 'c1'), \
			('a3', 'audio', 'u1-pitch.json', 'c1'), \
			('a4', 'audio', 'u2-pitch.json', 'c1')",
		"INSERT INTO reps (id, prompt_title, prompt_type, play_id, company_id, asset_id) VALUES \
			('r1', 'Watch the product guide', 'watch', 'p1', 'c1', 'a1'), \
			('r2', 'Record your pitch', 'practice', 'p1', 'c1', NULL), \
			('r3', 'Watch the locked video', 'watch', 'p2', 'c1', 'a2')",
		"INSERT INTO submissions (id, user_id, rep_id, asset_id, company_id, submitted_at) VALUES \
			('s1', 'u1', 'r2', 'a3', 'c1', '2025-02-01'), \
			('s2', 'u2', 'r2', 'a4', 'c1', '2025-02-02')",
		"INSERT INTO feedback (id, submission_id, company_id, score, text) VALUES \
			('f1', 's1', 'c1', 8, 'Good energy')",
	];

	for statement in statements {
		sqlx::query(statement).execute(pool).await.expect("Failed to seed fixture row.");
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set COACH_PG_DSN to run."]
async fn scope_and_directory_queries() {
	let Some(base_dsn) = coach_testkit::env_dsn() else {
		eprintln!("Skipping db smoke test; set COACH_PG_DSN to run this test.");

		return;
	};

	coach_testkit::with_test_db(&base_dsn, async move |test_db| {
		let db = Db::connect(&coach_config::Postgres {
			dsn: test_db.dsn().to_string(),
			pool_max_conns: 2,
		})
		.await
		.expect("Failed to connect.");

		db.ensure_schema().await.expect("Failed to ensure schema.");
		// Re-running must be a no-op.
		db.ensure_schema().await.expect("Failed to re-ensure schema.");

		seed_fixture(&db.pool).await;

		// Knowledge scope unions watch-rep assets across all assigned plays,
		// regardless of assignment status, and skips reps without assets.
		let mut knowledge = queries::knowledge_asset_ids(&db.pool, "u1")
			.await
			.expect("Failed to resolve knowledge assets.");

		knowledge.sort();

		assert_eq!(knowledge, vec!["a1".to_string(), "a2".to_string()]);

		// History scope is strictly first-person.
		let history = queries::submission_asset_ids(&db.pool, "u1")
			.await
			.expect("Failed to resolve submission assets.");

		assert_eq!(history, vec!["a3".to_string()]);

		let contexts = queries::submissions_with_feedback(&db.pool, "u1")
			.await
			.expect("Failed to prefetch submissions.");

		assert_eq!(contexts.len(), 1);
		assert_eq!(contexts[0].asset_id, "a3");
		assert_eq!(contexts[0].rep_title.as_deref(), Some("Record your pitch"));
		assert_eq!(contexts[0].feedback_score, Some(8));
		assert_eq!(contexts[0].feedback_text.as_deref(), Some("Good energy"));

		// u2 has a submission but no feedback row.
		let contexts = queries::submissions_with_feedback(&db.pool, "u2")
			.await
			.expect("Failed to prefetch submissions.");

		assert_eq!(contexts.len(), 1);
		assert_eq!(contexts[0].feedback_score, None);

		let companies = queries::list_companies(&db.pool).await.expect("Failed to list companies.");

		assert_eq!(companies.len(), 2);
		assert_eq!(companies[0].name, "Acme");

		let users = queries::list_users_by_company(&db.pool, "c1")
			.await
			.expect("Failed to list users.");

		assert_eq!(users.iter().map(|u| u.username.as_str()).collect::<Vec<_>>(), vec!["ana", "bo"]);

		let plays = queries::assigned_plays(&db.pool, "u1").await.expect("Failed to list plays.");

		assert_eq!(plays.len(), 2);
		assert_eq!(plays[0].play_id, "p1");
		assert_eq!(plays[0].status.as_deref(), Some("assigned"));

		assert!(
			queries::fetch_user(&db.pool, "missing")
				.await
				.expect("Failed to fetch user.")
				.is_none()
		);

		let rep = queries::rep_for_asset(&db.pool, "a1")
			.await
			.expect("Failed to fetch rep.")
			.expect("Expected a rep for a1.");

		assert_eq!(rep.id, "r1");

		Ok(())
	})
	.await
	.expect("Test database run failed.");
}
