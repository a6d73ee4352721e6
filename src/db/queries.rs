//! SQL query constants
//!
//! Contains all SQL used by the PostgreSQL record store.

/// Schema, applied on start-up. Every statement is idempotent.
pub const CREATE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS iso_standards (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) UNIQUE NOT NULL,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS iso_clauses (
        id SERIAL PRIMARY KEY,
        standard_id INTEGER NOT NULL REFERENCES iso_standards(id) ON DELETE CASCADE,
        clause_number VARCHAR(50) NOT NULL,
        title VARCHAR(255) NOT NULL,
        description TEXT,
        compliance_steps TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS product_iso_compliance (
        id SERIAL PRIMARY KEY,
        product_id INTEGER NOT NULL,
        clause_id INTEGER NOT NULL REFERENCES iso_clauses(id) ON DELETE CASCADE,
        is_compliant BOOLEAN NOT NULL DEFAULT false,
        notes JSONB NOT NULL DEFAULT '{}'::jsonb,
        last_updated TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,
        UNIQUE(product_id, clause_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS audits (
        id SERIAL PRIMARY KEY,
        product_id INTEGER NOT NULL,
        product_name VARCHAR(255) NOT NULL,
        audit_date DATE NOT NULL,
        audit_time VARCHAR(20) NOT NULL,
        assigned_to VARCHAR(255) NOT NULL,
        status VARCHAR(20) NOT NULL DEFAULT 'scheduled'
            CHECK (status IN ('scheduled', 'completed', 'cancelled')),
        created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS feedback (
        id SERIAL PRIMARY KEY,
        product_id INTEGER NOT NULL,
        user_name VARCHAR(255) NOT NULL,
        comment TEXT NOT NULL,
        rating SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
        date DATE NOT NULL DEFAULT CURRENT_DATE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_iso_clauses_standard_id ON iso_clauses(standard_id)",
    "CREATE INDEX IF NOT EXISTS idx_product_iso_compliance_product_id ON product_iso_compliance(product_id)",
    "CREATE INDEX IF NOT EXISTS idx_audits_audit_date ON audits(audit_date)",
    "CREATE INDEX IF NOT EXISTS idx_feedback_date ON feedback(date)",
];

pub const LIST_STANDARDS: &str = r#"
    SELECT id, name, description, created_at
    FROM iso_standards
    ORDER BY id
"#;

pub const COUNT_STANDARDS: &str = "SELECT COUNT(*) FROM iso_standards";

pub const INSERT_STANDARD: &str = r#"
    INSERT INTO iso_standards (name, description)
    VALUES ($1, $2)
    RETURNING id
"#;

pub const LIST_CLAUSES: &str = r#"
    SELECT id, standard_id, clause_number, title, description, compliance_steps, created_at
    FROM iso_clauses
    WHERE standard_id = $1
    ORDER BY id
"#;

pub const GET_CLAUSE: &str = r#"
    SELECT id, standard_id, clause_number, title, description, compliance_steps, created_at
    FROM iso_clauses
    WHERE id = $1
"#;

pub const INSERT_CLAUSE: &str = r#"
    INSERT INTO iso_clauses (standard_id, clause_number, title, description, compliance_steps)
    VALUES ($1, $2, $3, $4, $5)
"#;

pub const LIST_COMPLIANCE: &str = r#"
    SELECT id, product_id, clause_id, is_compliant, notes, last_updated
    FROM product_iso_compliance
    WHERE product_id = $1
    ORDER BY clause_id
"#;

pub const GET_COMPLIANCE: &str = r#"
    SELECT id, product_id, clause_id, is_compliant, notes, last_updated
    FROM product_iso_compliance
    WHERE product_id = $1 AND clause_id = $2
"#;

/// Last write wins on the (product_id, clause_id) key
pub const UPSERT_COMPLIANCE: &str = r#"
    INSERT INTO product_iso_compliance (product_id, clause_id, is_compliant, notes, last_updated)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (product_id, clause_id) DO UPDATE
        SET is_compliant = EXCLUDED.is_compliant,
            notes = EXCLUDED.notes,
            last_updated = EXCLUDED.last_updated
    RETURNING id, product_id, clause_id, is_compliant, notes, last_updated
"#;

pub const INSERT_AUDIT: &str = r#"
    INSERT INTO audits (product_id, product_name, audit_date, audit_time, assigned_to, status)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id, product_id, product_name, audit_date, audit_time, assigned_to, status, created_at
"#;

pub const LIST_AUDITS: &str = r#"
    SELECT id, product_id, product_name, audit_date, audit_time, assigned_to, status, created_at
    FROM audits
    ORDER BY audit_date DESC, id ASC
"#;

pub const INSERT_FEEDBACK: &str = r#"
    INSERT INTO feedback (product_id, user_name, comment, rating, date)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, product_id, user_name, comment, rating, date
"#;

pub const LIST_FEEDBACK: &str = r#"
    SELECT id, product_id, user_name, comment, rating, date
    FROM feedback
    ORDER BY date DESC, id ASC
"#;
