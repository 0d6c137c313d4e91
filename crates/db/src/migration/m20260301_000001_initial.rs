//! Initial database migration.
//!
//! Creates the ledger schema: companies, chart of accounts, journal entries
//! and lines, period closings, and opening-balance snapshots.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: COMPANIES & CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: JOURNAL
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // ============================================================
        // PART 4: PERIOD CLOSING
        // ============================================================
        db.execute_unprepared(PERIOD_CLOSINGS_SQL).await?;
        db.execute_unprepared(OPENING_BALANCES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Account types
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense',
    'cash_bank'
);

-- Journal entry source document type
CREATE TYPE reference_type AS ENUM (
    'manual',
    'sales',
    'purchase',
    'payment',
    'pos',
    'adjustment'
);

-- Period closing status
CREATE TYPE closing_status AS ENUM ('closed', 'reopened');
";

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    code VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    parent_id UUID REFERENCES accounts(id),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (company_id, code)
);

CREATE INDEX idx_accounts_company ON accounts(company_id);
CREATE INDEX idx_accounts_company_type ON accounts(company_id, account_type);
CREATE INDEX idx_accounts_parent ON accounts(parent_id);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    entry_number VARCHAR(20) NOT NULL,
    entry_date DATE NOT NULL,
    description TEXT NOT NULL,
    reference_type reference_type NOT NULL DEFAULT 'manual',
    reference_id UUID,
    total_debit NUMERIC(19, 4) NOT NULL,
    total_credit NUMERIC(19, 4) NOT NULL,
    is_posted BOOLEAN NOT NULL DEFAULT true,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (company_id, entry_number)
);

CREATE INDEX idx_journal_entries_company_date ON journal_entries(company_id, entry_date);
CREATE INDEX idx_journal_entries_reference ON journal_entries(reference_type, reference_id);
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    description TEXT,
    line_order INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_debit_or_credit CHECK (
        (debit > 0 AND credit = 0) OR (debit = 0 AND credit > 0)
    )
);

CREATE INDEX idx_journal_lines_entry ON journal_lines(entry_id);
CREATE INDEX idx_journal_lines_account ON journal_lines(account_id);
";

const PERIOD_CLOSINGS_SQL: &str = r"
CREATE TABLE period_closings (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    period_start DATE NOT NULL,
    period_end DATE NOT NULL,
    status closing_status NOT NULL DEFAULT 'closed',
    notes TEXT,
    closed_by UUID NOT NULL,
    closed_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_period_order CHECK (period_start <= period_end),
    UNIQUE (company_id, period_end)
);

CREATE INDEX idx_period_closings_company ON period_closings(company_id, period_end);
";

const OPENING_BALANCES_SQL: &str = r"
CREATE TABLE opening_balances (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    closing_id UUID NOT NULL REFERENCES period_closings(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    balance_date DATE NOT NULL,
    debit_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_one_side CHECK (debit_balance = 0 OR credit_balance = 0),
    UNIQUE (account_id, balance_date)
);

CREATE INDEX idx_opening_balances_closing ON opening_balances(closing_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS opening_balances CASCADE;
DROP TABLE IF EXISTS period_closings CASCADE;
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS companies CASCADE;

DROP TYPE IF EXISTS closing_status;
DROP TYPE IF EXISTS reference_type;
DROP TYPE IF EXISTS account_type;
";
