//! Initial ledger schema.
//!
//! Creates the chart of accounts, journal entries and journal lines, plus the
//! triggers that keep posted history balanced and immutable.

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
        // PART 2: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: JOURNAL
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // ============================================================
        // PART 4: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

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
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'cost_of_sales',
    'expense'
);

CREATE TYPE entry_status AS ENUM ('draft', 'posted', 'voided');
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_accounts_type ON accounts(account_type) WHERE is_active = true;
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    sequence BIGSERIAL NOT NULL UNIQUE,
    entry_date DATE NOT NULL,
    reference VARCHAR(100) NOT NULL,
    description TEXT NOT NULL,
    status entry_status NOT NULL DEFAULT 'draft',
    posted_at TIMESTAMPTZ,
    posted_by VARCHAR(255),
    voided_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_je_posted_date ON journal_entries(entry_date, sequence) WHERE status = 'posted';
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    line_number INTEGER NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id),
    debit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    credit NUMERIC(19, 4) NOT NULL DEFAULT 0,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (entry_id, line_number),
    CONSTRAINT chk_debit_or_credit CHECK (
        (debit > 0 AND credit = 0) OR (debit = 0 AND credit > 0)
    )
);

CREATE INDEX idx_jl_entry ON journal_lines(entry_id);
CREATE INDEX idx_jl_account ON journal_lines(account_id);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: assert_entry_balanced
-- Raises when a posted entry's debits and credits differ
-- ============================================================
CREATE OR REPLACE FUNCTION assert_entry_balanced(p_entry_id UUID)
RETURNS VOID AS $$
DECLARE
    total_debit NUMERIC(19, 4);
    total_credit NUMERIC(19, 4);
    line_count INTEGER;
    current_status entry_status;
BEGIN
    SELECT status INTO current_status
    FROM journal_entries
    WHERE id = p_entry_id;

    IF current_status = 'posted' THEN
        SELECT
            COALESCE(SUM(debit), 0),
            COALESCE(SUM(credit), 0),
            COUNT(*)
        INTO total_debit, total_credit, line_count
        FROM journal_lines
        WHERE entry_id = p_entry_id;

        IF line_count < 2 THEN
            RAISE EXCEPTION 'Posted entry % needs at least two lines', p_entry_id;
        END IF;

        IF total_debit <> total_credit THEN
            RAISE EXCEPTION 'Journal entry is not balanced. Debit: %, Credit: %',
                total_debit, total_credit;
        END IF;
    END IF;
END;
$$ LANGUAGE plpgsql;

CREATE OR REPLACE FUNCTION check_line_balance()
RETURNS TRIGGER AS $$
BEGIN
    PERFORM assert_entry_balanced(NEW.entry_id);
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE OR REPLACE FUNCTION check_entry_balance()
RETURNS TRIGGER AS $$
BEGIN
    PERFORM assert_entry_balanced(NEW.id);
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_check_line_balance
AFTER INSERT OR UPDATE ON journal_lines
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_line_balance();

CREATE CONSTRAINT TRIGGER trg_check_entry_balance
AFTER UPDATE OF status ON journal_entries
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
WHEN (NEW.status = 'posted')
EXECUTE FUNCTION check_entry_balance();

-- ============================================================
-- FUNCTION: prevent_posted_modification
-- Posted entries may only be voided; voided entries are final
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_posted_modification()
RETURNS TRIGGER AS $$
BEGIN
    IF TG_OP = 'DELETE' THEN
        IF OLD.status <> 'draft' THEN
            RAISE EXCEPTION 'Cannot delete % journal entry.', OLD.status;
        END IF;
        RETURN OLD;
    END IF;

    IF OLD.status = 'posted' AND NEW.status NOT IN ('voided') THEN
        RAISE EXCEPTION 'Cannot modify posted journal entry. Void it and post a new entry instead.';
    END IF;

    IF OLD.status = 'voided' THEN
        RAISE EXCEPTION 'Cannot modify voided journal entry.';
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_posted_mod
BEFORE UPDATE OR DELETE ON journal_entries
FOR EACH ROW
EXECUTE FUNCTION prevent_posted_modification();

-- ============================================================
-- FUNCTION: prevent_posted_line_modification
-- Lines can only change while their entry is a draft
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_posted_line_modification()
RETURNS TRIGGER AS $$
DECLARE
    parent_status entry_status;
    target_entry UUID;
BEGIN
    IF TG_OP = 'DELETE' THEN
        target_entry := OLD.entry_id;
    ELSE
        target_entry := NEW.entry_id;
    END IF;

    SELECT status INTO parent_status
    FROM journal_entries
    WHERE id = target_entry;

    IF parent_status IS NOT NULL AND parent_status <> 'draft' THEN
        RAISE EXCEPTION 'Cannot change lines of % journal entry.', parent_status;
    END IF;

    IF TG_OP = 'DELETE' THEN
        RETURN OLD;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_posted_line_mod
BEFORE INSERT OR UPDATE OR DELETE ON journal_lines
FOR EACH ROW
EXECUTE FUNCTION prevent_posted_line_modification();

-- ============================================================
-- FUNCTION: lock_account_type
-- An account's type is fixed once any line references it
-- ============================================================
CREATE OR REPLACE FUNCTION lock_account_type()
RETURNS TRIGGER AS $$
BEGIN
    IF EXISTS (SELECT 1 FROM journal_lines WHERE account_id = NEW.id) THEN
        RAISE EXCEPTION 'Cannot change type of account %: it has journal lines', NEW.code;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_lock_account_type
BEFORE UPDATE ON accounts
FOR EACH ROW
WHEN (OLD.account_type IS DISTINCT FROM NEW.account_type)
EXECUTE FUNCTION lock_account_type();
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

DROP TRIGGER IF EXISTS trg_lock_account_type ON accounts;
DROP TRIGGER IF EXISTS trg_prevent_posted_line_mod ON journal_lines;
DROP TRIGGER IF EXISTS trg_prevent_posted_mod ON journal_entries;
DROP TRIGGER IF EXISTS trg_check_entry_balance ON journal_entries;
DROP TRIGGER IF EXISTS trg_check_line_balance ON journal_lines;

DROP FUNCTION IF EXISTS lock_account_type();
DROP FUNCTION IF EXISTS prevent_posted_line_modification();
DROP FUNCTION IF EXISTS prevent_posted_modification();
DROP FUNCTION IF EXISTS check_entry_balance();
DROP FUNCTION IF EXISTS check_line_balance();
DROP FUNCTION IF EXISTS assert_entry_balanced(UUID);

DROP TABLE IF EXISTS journal_lines;
DROP TABLE IF EXISTS journal_entries;
DROP TABLE IF EXISTS accounts;

DROP TYPE IF EXISTS entry_status;
DROP TYPE IF EXISTS account_type;
";
