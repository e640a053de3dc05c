//! Voter roll service.

use sampark_common::AppResult;
use sampark_db::entities::{
    voter,
    voter::VoterCategory,
};
use sampark_db::repositories::{VoterFilter, VoterRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a voter record.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVoterInput {
    #[validate(length(min = 2, max = 256))]
    pub name: String,
    #[validate(length(min = 10, max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 2048))]
    pub address: Option<String>,
    pub ward: Option<String>,
    pub booth: Option<String>,
    pub category: Option<VoterCategory>,
    #[validate(length(max = 4096))]
    pub notes: Option<String>,
}

/// Input for updating a voter record. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVoterInput {
    #[validate(length(min = 2, max = 256))]
    pub name: Option<String>,
    #[validate(length(min = 10, max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 2048))]
    pub address: Option<String>,
    pub ward: Option<String>,
    pub booth: Option<String>,
    pub category: Option<VoterCategory>,
    #[validate(length(max = 4096))]
    pub notes: Option<String>,
}

/// Per-category voter counts.
#[derive(Debug, serde::Serialize)]
pub struct VoterBreakdown {
    pub total: u64,
    pub supporters: u64,
    pub neutral: u64,
    pub opponents: u64,
}

/// Voter roll service.
#[derive(Clone)]
pub struct VoterService {
    voter_repo: VoterRepository,
}

impl VoterService {
    /// Create a new voter service.
    #[must_use]
    pub const fn new(voter_repo: VoterRepository) -> Self {
        Self { voter_repo }
    }

    /// Add a voter record.
    pub async fn create(&self, input: CreateVoterInput) -> AppResult<voter::Model> {
        input.validate()?;

        let model = voter::ActiveModel {
            id: Set(crate::generate_id()),
            user_id: Set(None),
            name: Set(input.name),
            phone: Set(input.phone),
            address: Set(input.address),
            ward: Set(input.ward),
            booth: Set(input.booth),
            category: Set(input.category.unwrap_or_default()),
            notes: Set(input.notes),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        self.voter_repo.create(model).await
    }

    /// Get a voter by ID.
    pub async fn get(&self, id: &str) -> AppResult<voter::Model> {
        self.voter_repo.get_by_id(id).await
    }

    /// Update a voter record.
    pub async fn update(&self, id: &str, input: UpdateVoterInput) -> AppResult<voter::Model> {
        input.validate()?;

        let voter = self.voter_repo.get_by_id(id).await?;
        let mut model: voter::ActiveModel = voter.into();

        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(phone) = input.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(address) = input.address {
            model.address = Set(Some(address));
        }
        if let Some(ward) = input.ward {
            model.ward = Set(Some(ward));
        }
        if let Some(booth) = input.booth {
            model.booth = Set(Some(booth));
        }
        if let Some(category) = input.category {
            model.category = Set(category);
        }
        if let Some(notes) = input.notes {
            model.notes = Set(Some(notes));
        }
        model.updated_at = Set(Some(chrono::Utc::now().into()));

        self.voter_repo.update(model).await
    }

    /// Delete a voter record.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        // 404 for unknown IDs rather than a silent no-op delete.
        self.voter_repo.get_by_id(id).await?;
        self.voter_repo.delete(id).await
    }

    /// List voters.
    pub async fn list(
        &self,
        filter: &VoterFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<voter::Model>> {
        self.voter_repo.list(filter, limit, offset).await
    }

    /// Count voters matching a filter.
    pub async fn count(&self, filter: &VoterFilter) -> AppResult<u64> {
        self.voter_repo.count(filter).await
    }

    /// Per-category breakdown for the dashboard.
    pub async fn breakdown(&self) -> AppResult<VoterBreakdown> {
        let supporters = self
            .voter_repo
            .count_by_category(VoterCategory::Supporter)
            .await?;
        let neutral = self
            .voter_repo
            .count_by_category(VoterCategory::Neutral)
            .await?;
        let opponents = self
            .voter_repo
            .count_by_category(VoterCategory::Opponent)
            .await?;

        Ok(VoterBreakdown {
            total: supporters + neutral + opponents,
            supporters,
            neutral,
            opponents,
        })
    }
}
