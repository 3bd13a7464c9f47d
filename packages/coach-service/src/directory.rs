//! Read-only directory surface backing the company/user endpoints.

use coach_storage::queries;

use crate::{SearchService, ServiceResult};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CompanySummary {
	pub id: String,
	pub name: String,
	pub description: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UserSummary {
	pub id: String,
	pub username: String,
	pub display_name: Option<String>,
	pub role: Option<String>,
	pub segment: Option<String>,
	pub is_active: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AssignedPlaySummary {
	pub play_id: String,
	pub title: String,
	pub status: Option<String>,
	pub assigned_date: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct UserDetail {
	pub id: String,
	pub username: String,
	pub display_name: Option<String>,
	pub company_id: String,
	pub role: Option<String>,
	pub segment: Option<String>,
	pub assigned_plays: Vec<AssignedPlaySummary>,
}

impl SearchService {
	pub async fn list_companies(&self) -> ServiceResult<Vec<CompanySummary>> {
		let companies = queries::list_companies(&self.db.pool).await?;

		Ok(companies
			.into_iter()
			.map(|company| CompanySummary {
				id: company.id,
				name: company.name,
				description: company.description,
			})
			.collect())
	}

	pub async fn list_company_users(&self, company_id: &str) -> ServiceResult<Vec<UserSummary>> {
		let users = queries::list_users_by_company(&self.db.pool, company_id).await?;

		Ok(users
			.into_iter()
			.map(|user| UserSummary {
				id: user.id,
				username: user.username,
				display_name: user.display_name,
				role: user.role,
				segment: user.segment,
				is_active: user.is_active,
			})
			.collect())
	}

	pub async fn user_detail(&self, user_id: &str) -> ServiceResult<UserDetail> {
		let user = self.fetch_user(user_id).await?;
		let plays = queries::assigned_plays(&self.db.pool, user_id).await?;

		Ok(UserDetail {
			id: user.id,
			username: user.username,
			display_name: user.display_name,
			company_id: user.company_id,
			role: user.role,
			segment: user.segment,
			assigned_plays: plays
				.into_iter()
				.map(|play| AssignedPlaySummary {
					play_id: play.play_id,
					title: play.title,
					status: play.status,
					assigned_date: play.assigned_date,
				})
				.collect(),
		})
	}
}
