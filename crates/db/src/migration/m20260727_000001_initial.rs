//! Initial database migration.
//!
//! Creates the enums, tables, the non-negative-balance defense-in-depth
//! trigger, and seed data for the ledger engine.

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
        // PART 2: PRINCIPALS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(EMPLOYEES_SQL).await?;

        // ============================================================
        // PART 3: ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        if one_account_per_user_enabled() {
            db.execute_unprepared(ONE_ACCOUNT_PER_USER_INDEX_SQL).await?;
        }

        // ============================================================
        // PART 4: TRANSACTIONS & LEDGER
        // ============================================================
        db.execute_unprepared(TRANSACTION_TYPES_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(TRANSACTION_ENTRIES_SQL).await?;

        // ============================================================
        // PART 5: AUDIT & RISK
        // ============================================================
        db.execute_unprepared(AUDIT_LOGS_SQL).await?;
        db.execute_unprepared(RISK_SCORES_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 7: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_TRANSACTION_TYPES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

/// Reads the deployment-time one-account-per-user policy the same way
/// `ledger_shared::config::LedgerConfig` resolves it, so the migration
/// and the repository layer agree on whether the partial unique index
/// exists. Defaults to `true`, matching `LedgerConfig::default()`.
fn one_account_per_user_enabled() -> bool {
    std::env::var("LEDGER__LEDGER__ONE_ACCOUNT_PER_USER")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(true)
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE kyc_status AS ENUM ('pending', 'verified', 'rejected');
CREATE TYPE user_role AS ENUM ('customer', 'admin', 'auditor');
CREATE TYPE employee_department AS ENUM ('admin', 'operations', 'support', 'audit');
CREATE TYPE account_type AS ENUM ('savings', 'checking', 'wallet', 'loan');
CREATE TYPE account_status AS ENUM ('active', 'frozen', 'closed');
CREATE TYPE transaction_type_code AS ENUM ('DEPOSIT', 'WITHDRAWAL', 'TRANSFER', 'PAYMENT', 'INTEREST', 'FEE');
CREATE TYPE transaction_status AS ENUM ('pending', 'completed', 'failed', 'reversed');
CREATE TYPE audit_entity_type AS ENUM ('USER', 'ACCOUNT', 'TRANSACTION');
CREATE TYPE risk_verdict AS ENUM ('SAFE', 'SUSPICIOUS', 'CRITICAL');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(64) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    phone VARCHAR(32),
    full_name VARCHAR(255) NOT NULL,
    kyc_status kyc_status NOT NULL DEFAULT 'pending',
    role user_role NOT NULL DEFAULT 'customer',
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_role ON users(role);
";

const EMPLOYEES_SQL: &str = r"
CREATE TABLE employees (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    department employee_department NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id),
    account_number VARCHAR(34) NOT NULL UNIQUE,
    account_type account_type NOT NULL,
    currency CHAR(3) NOT NULL,
    current_balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    status account_status NOT NULL DEFAULT 'active',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_currency_format CHECK (currency ~ '^[A-Z]{3}$')
);

CREATE INDEX idx_accounts_user ON accounts(user_id);
CREATE INDEX idx_accounts_status ON accounts(status) WHERE status <> 'closed';
";

-- One open account per user, enforced by a partial unique index rather
-- than a CHECK constraint so closed accounts don't block reopening.
-- Only created when the `one_account_per_user` deployment flag is on;
-- see `one_account_per_user_enabled`.
const ONE_ACCOUNT_PER_USER_INDEX_SQL: &str = r"
CREATE UNIQUE INDEX idx_accounts_one_open_per_user ON accounts(user_id) WHERE status <> 'closed';
";

const TRANSACTION_TYPES_SQL: &str = r"
CREATE TABLE transaction_types (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    type_code transaction_type_code NOT NULL UNIQUE,
    description VARCHAR(255) NOT NULL,
    is_system_generated BOOLEAN NOT NULL DEFAULT false
);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    reference_id UUID NOT NULL UNIQUE,
    type_id UUID NOT NULL REFERENCES transaction_types(id),
    description VARCHAR(500),
    initiated_by_user_id UUID REFERENCES users(id),
    reversed_transaction_id UUID REFERENCES transactions(id),
    status transaction_status NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    completed_at TIMESTAMPTZ
);

CREATE INDEX idx_transactions_initiated_by ON transactions(initiated_by_user_id);
CREATE INDEX idx_transactions_status ON transactions(status) WHERE status = 'pending';
CREATE INDEX idx_transactions_created_at ON transactions(created_at);
";

const TRANSACTION_ENTRIES_SQL: &str = r"
CREATE TABLE transaction_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    transaction_id UUID NOT NULL REFERENCES transactions(id),
    account_id UUID NOT NULL REFERENCES accounts(id),
    amount NUMERIC(19, 4) NOT NULL,
    balance_after NUMERIC(19, 4) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_entry_amount_nonzero CHECK (amount <> 0)
);

CREATE INDEX idx_entries_transaction ON transaction_entries(transaction_id);
CREATE INDEX idx_entries_account_created ON transaction_entries(account_id, created_at);
";

const AUDIT_LOGS_SQL: &str = r"
CREATE TABLE audit_logs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    entity_type audit_entity_type NOT NULL,
    entity_id UUID NOT NULL,
    action VARCHAR(50) NOT NULL,
    old_value JSONB,
    new_value JSONB,
    performed_by_user_id UUID REFERENCES users(id),
    performed_by_employee_id UUID REFERENCES employees(id),
    ip_address VARCHAR(64),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_audit_entity ON audit_logs(entity_type, entity_id);
CREATE INDEX idx_audit_created_at ON audit_logs(created_at);
";

const RISK_SCORES_SQL: &str = r"
CREATE TABLE risk_scores (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    transaction_id UUID NOT NULL UNIQUE REFERENCES transactions(id),
    score NUMERIC(5, 4) NOT NULL,
    verdict risk_verdict NOT NULL,
    features_used JSONB NOT NULL DEFAULT '{}',
    model_version VARCHAR(50) NOT NULL,
    scored_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_score_range CHECK (score >= 0 AND score <= 1)
);

CREATE INDEX idx_risk_scores_verdict ON risk_scores(verdict) WHERE verdict <> 'SAFE';
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: enforce_non_negative_balance
-- Defense-in-depth: rejects a non-loan account balance going negative
-- even if the application layer's validation is bypassed.
-- ============================================================
CREATE OR REPLACE FUNCTION enforce_non_negative_balance()
RETURNS TRIGGER AS $$
DECLARE
    acct_type account_type;
BEGIN
    SELECT account_type INTO acct_type FROM accounts WHERE id = NEW.id;

    IF acct_type <> 'loan' AND NEW.current_balance < 0 THEN
        RAISE EXCEPTION 'account % balance would go negative: %', NEW.id, NEW.current_balance;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_enforce_non_negative_balance
BEFORE UPDATE ON accounts
FOR EACH ROW
EXECUTE FUNCTION enforce_non_negative_balance();

-- ============================================================
-- FUNCTION: prevent_terminal_transaction_mutation
-- Completed/failed/reversed transactions are immutable except for the
-- single completed -> reversed transition performed by a reversal.
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_terminal_transaction_mutation()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.status IN ('failed', 'reversed') THEN
        RAISE EXCEPTION 'transaction % is terminal and cannot be modified', OLD.id;
    END IF;

    IF OLD.status = 'completed' AND NEW.status NOT IN ('completed', 'reversed') THEN
        RAISE EXCEPTION 'completed transaction % can only transition to reversed', OLD.id;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_terminal_transaction_mutation
BEFORE UPDATE ON transactions
FOR EACH ROW
EXECUTE FUNCTION prevent_terminal_transaction_mutation();
";

const SEED_TRANSACTION_TYPES_SQL: &str = r"
INSERT INTO transaction_types (type_code, description, is_system_generated) VALUES
('DEPOSIT', 'Credit with no counterparty leg', false),
('WITHDRAWAL', 'Debit with no counterparty leg', false),
('TRANSFER', 'Paired debit/credit between two accounts', false),
('PAYMENT', 'Outbound payment to a counterparty', false),
('INTEREST', 'System-generated interest credit', true),
('FEE', 'System-generated fee debit', true)
ON CONFLICT (type_code) DO NOTHING;
";

const DROP_ALL_SQL: &str = r"
DROP INDEX IF EXISTS idx_accounts_one_open_per_user;
DROP TRIGGER IF EXISTS trg_prevent_terminal_transaction_mutation ON transactions;
DROP TRIGGER IF EXISTS trg_enforce_non_negative_balance ON accounts;
DROP FUNCTION IF EXISTS prevent_terminal_transaction_mutation();
DROP FUNCTION IF EXISTS enforce_non_negative_balance();

DROP TABLE IF EXISTS risk_scores CASCADE;
DROP TABLE IF EXISTS audit_logs CASCADE;
DROP TABLE IF EXISTS transaction_entries CASCADE;
DROP TABLE IF EXISTS transactions CASCADE;
DROP TABLE IF EXISTS transaction_types CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS employees CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS risk_verdict CASCADE;
DROP TYPE IF EXISTS audit_entity_type CASCADE;
DROP TYPE IF EXISTS transaction_status CASCADE;
DROP TYPE IF EXISTS transaction_type_code CASCADE;
DROP TYPE IF EXISTS account_status CASCADE;
DROP TYPE IF EXISTS account_type CASCADE;
DROP TYPE IF EXISTS employee_department CASCADE;
DROP TYPE IF EXISTS user_role CASCADE;
DROP TYPE IF EXISTS kyc_status CASCADE;
";
