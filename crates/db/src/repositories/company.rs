//! Company repository.
//!
//! Companies are the tenancy boundary: every account, journal entry, and
//! closing row belongs to exactly one company, and every operation takes an
//! explicit company ID.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::companies;

/// Error types for company operations.
#[derive(Debug, thiserror::Error)]
pub enum CompanyError {
    /// Company not found.
    #[error("Company not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Company repository.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_company(&self, name: String) -> Result<companies::Model, CompanyError> {
        let now = chrono::Utc::now().into();
        let company = companies::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let company = company.insert(&self.db).await?;
        tracing::info!(company_id = %company.id, name = %company.name, "company created");
        Ok(company)
    }

    /// Finds a company by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<companies::Model>, CompanyError> {
        let company = companies::Entity::find_by_id(id).one(&self.db).await?;
        Ok(company)
    }

    /// Lists active companies ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_active(&self) -> Result<Vec<companies::Model>, CompanyError> {
        let companies = companies::Entity::find()
            .filter(companies::Column::IsActive.eq(true))
            .order_by_asc(companies::Column::Name)
            .all(&self.db)
            .await?;
        Ok(companies)
    }

    /// Deactivates a company. Historical data is retained.
    ///
    /// # Errors
    ///
    /// Returns an error if the company does not exist or the update fails.
    pub async fn deactivate(&self, id: Uuid) -> Result<(), CompanyError> {
        let company = companies::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CompanyError::NotFound(id))?;

        let mut active: companies::ActiveModel = company.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await?;

        Ok(())
    }
}
