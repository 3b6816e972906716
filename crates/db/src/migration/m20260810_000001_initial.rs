//! Initial database migration.
//!
//! Creates the enum, the four core tables, and the indexes the balance
//! resolvers rely on (payer, date, and JSONB containment probes).

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
        // PART 2: CORE TABLES
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(GROUPS_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;
        db.execute_unprepared(SETTLEMENTS_SQL).await?;

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
-- How an expense was divided (informational; split amounts are authoritative)
CREATE TYPE split_type AS ENUM (
    'equal',
    'percentage',
    'exact'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    image_url TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const GROUPS_SQL: &str = r"
CREATE TABLE groups (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    created_by UUID NOT NULL REFERENCES users(id),
    members JSONB NOT NULL DEFAULT '[]',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_groups_created_by ON groups(created_by);
-- Membership containment probes on members
CREATE INDEX idx_groups_members ON groups USING GIN (members jsonb_path_ops);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    description TEXT NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    category VARCHAR(100) NOT NULL DEFAULT 'Other',
    date TIMESTAMPTZ NOT NULL,
    paid_by_user_id UUID NOT NULL REFERENCES users(id),
    split_type split_type NOT NULL DEFAULT 'equal',
    splits JSONB NOT NULL DEFAULT '[]',
    group_id UUID REFERENCES groups(id),
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_expense_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_expenses_paid_by ON expenses(paid_by_user_id, date DESC);
CREATE INDEX idx_expenses_date ON expenses(date);
CREATE INDEX idx_expenses_group ON expenses(group_id) WHERE group_id IS NOT NULL;
-- Split-holder containment probes on splits
CREATE INDEX idx_expenses_splits ON expenses USING GIN (splits jsonb_path_ops);
";

const SETTLEMENTS_SQL: &str = r"
CREATE TABLE settlements (
    id UUID PRIMARY KEY,
    amount NUMERIC(19, 4) NOT NULL,
    note TEXT,
    date TIMESTAMPTZ NOT NULL,
    paid_by_user_id UUID NOT NULL REFERENCES users(id),
    received_by_user_id UUID NOT NULL REFERENCES users(id),
    -- Advisory links to the expenses this payment covered; not a FK
    related_expense_ids JSONB NOT NULL DEFAULT '[]',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_settlement_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_settlement_parties_differ CHECK (paid_by_user_id <> received_by_user_id)
);

CREATE INDEX idx_settlements_paid_by ON settlements(paid_by_user_id, date DESC);
CREATE INDEX idx_settlements_received_by ON settlements(received_by_user_id, date DESC);
-- Cascade containment lookups on related_expense_ids
CREATE INDEX idx_settlements_related ON settlements USING GIN (related_expense_ids jsonb_path_ops);
";

const DROP_ALL_SQL: &str = r"
-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS settlements CASCADE;
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS groups CASCADE;
DROP TABLE IF EXISTS users CASCADE;

-- Drop enums
DROP TYPE IF EXISTS split_type CASCADE;
";
