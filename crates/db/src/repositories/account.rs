//! Account repository for chart of accounts database operations.
//!
//! Account codes are unique per company. Accounts are never deleted once
//! they carry journal lines; deactivation is the only removal.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use tally_core::account::{default_chart, validate_account_code, AccountCodeError};

use crate::entities::{accounts, sea_orm_active_enums::AccountType};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account code already exists in company.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Account code is malformed.
    #[error(transparent)]
    InvalidCode(#[from] AccountCodeError),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(Uuid),

    /// Parent account belongs to a different company.
    #[error("Parent account belongs to a different company")]
    ParentWrongCompany,

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Chart template references a parent code not created earlier.
    #[error("Chart template parent code '{0}' missing")]
    TemplateParentMissing(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Company the account belongs to.
    pub company_id: Uuid,
    /// Account code, unique within the company.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Parent account for hierarchy display.
    pub parent_id: Option<Uuid>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
}

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the code is malformed or already exists in the company
    /// - the parent account does not exist or belongs to a different company
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        validate_account_code(&input.code)?;

        let existing = accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(input.company_id))
            .filter(accounts::Column::Code.eq(&input.code))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(AccountError::DuplicateCode(input.code));
        }

        if let Some(parent_id) = input.parent_id {
            let parent = accounts::Entity::find_by_id(parent_id).one(&self.db).await?;
            match parent {
                None => return Err(AccountError::ParentNotFound(parent_id)),
                Some(p) if p.company_id != input.company_id => {
                    return Err(AccountError::ParentWrongCompany);
                }
                _ => {}
            }
        }

        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_id: Set(input.company_id),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(input.account_type),
            parent_id: Set(input.parent_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let account = account.insert(&self.db).await?;
        Ok(account)
    }

    /// Seeds the default chart of accounts for a new company.
    ///
    /// Inserts all template accounts in one transaction, resolving parent
    /// codes to the IDs created earlier in the same pass. A company that
    /// already has accounts is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if a template parent code is missing or the
    /// transaction fails.
    pub async fn seed_default_chart(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<accounts::Model>, AccountError> {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(company_id))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Ok(Vec::new());
        }

        let txn = self.db.begin().await?;
        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();

        let mut created = Vec::new();
        let mut ids_by_code: HashMap<&'static str, Uuid> = HashMap::new();

        for template in default_chart() {
            let parent_id = match template.parent_code {
                Some(code) => Some(
                    ids_by_code
                        .get(code)
                        .copied()
                        .ok_or_else(|| AccountError::TemplateParentMissing(code.to_string()))?,
                ),
                None => None,
            };

            let id = Uuid::new_v4();
            ids_by_code.insert(template.code, id);

            let account = accounts::ActiveModel {
                id: Set(id),
                company_id: Set(company_id),
                code: Set(template.code.to_string()),
                name: Set(template.name.to_string()),
                account_type: Set(template.account_type.into()),
                parent_id: Set(parent_id),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            };
            created.push(account.insert(&txn).await?);
        }

        txn.commit().await?;
        tracing::info!(%company_id, count = created.len(), "default chart seeded");
        Ok(created)
    }

    /// Lists accounts for a company ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_accounts(
        &self,
        company_id: Uuid,
        filter: AccountFilter,
    ) -> Result<Vec<accounts::Model>, AccountError> {
        let mut query = accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(company_id))
            .order_by_asc(accounts::Column::Code);

        if let Some(account_type) = filter.account_type {
            query = query.filter(accounts::Column::AccountType.eq(account_type));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }

        let accounts = query.all(&self.db).await?;
        Ok(accounts)
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<accounts::Model>, AccountError> {
        let account = accounts::Entity::find_by_id(id).one(&self.db).await?;
        Ok(account)
    }

    /// Finds an account by company and code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn find_by_code(
        &self,
        company_id: Uuid,
        code: &str,
    ) -> Result<Option<accounts::Model>, AccountError> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::CompanyId.eq(company_id))
            .filter(accounts::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        Ok(account)
    }

    /// Deactivates an account. Posted history is untouched; the account
    /// simply stops accepting new lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the update fails.
    pub async fn deactivate_account(&self, id: Uuid) -> Result<(), AccountError> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::AccountNotFound(id))?;

        let mut active: accounts::ActiveModel = account.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await?;

        Ok(())
    }
}
