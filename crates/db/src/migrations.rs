/// Inline SQL migrations for the taskmarket database schema.
///
/// We use simple inline migrations rather than sqlx migration files
/// because the schema is small and self-contained.

pub const MIGRATIONS: &[&str] = &[
    // Migration 1: users table
    r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL,
    rating REAL,
    created_at INTEGER NOT NULL
);
"#,
    // Migration 2: categories table
    r#"
CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);
"#,
    // Migration 3: jobs table
    r#"
CREATE TABLE IF NOT EXISTS jobs (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    category_id TEXT NOT NULL,
    booking_mode TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'OPEN',
    price REAL NOT NULL,
    accept_price REAL,
    scheduled_at INTEGER NOT NULL,
    accept_until INTEGER,
    customer_id TEXT NOT NULL,
    provider_id TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
"#,
    // Migration 4: jobs indexes
    r#"
CREATE INDEX IF NOT EXISTS idx_jobs_customer ON jobs(customer_id);
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_jobs_provider ON jobs(provider_id);
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status);
"#,
    // Migration 5: bids table. rowid is the submission order used for
    // listing and rank tie-breaks.
    r#"
CREATE TABLE IF NOT EXISTS bids (
    id TEXT PRIMARY KEY,
    job_id TEXT NOT NULL,
    provider_id TEXT NOT NULL,
    price REAL NOT NULL,
    note TEXT,
    eta INTEGER,
    created_at INTEGER NOT NULL
);
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_bids_job ON bids(job_id);
"#,
    // Migration 6: ratings table, one row per (job, provider)
    r#"
CREATE TABLE IF NOT EXISTS ratings (
    id TEXT PRIMARY KEY,
    job_id TEXT NOT NULL,
    provider_id TEXT NOT NULL,
    score INTEGER NOT NULL,
    comment TEXT,
    created_at INTEGER NOT NULL,
    UNIQUE(job_id, provider_id)
);
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_ratings_provider ON ratings(provider_id);
"#,
];
