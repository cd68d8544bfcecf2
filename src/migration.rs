//! Database bootstrap: create the target database if missing, then the five college tables.
//! Every statement is idempotent so startup can run it unconditionally.

use crate::error::{AppError, ConfigError};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Tables in dependency order: departments first, enrollments last.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS departments (
        dept_id TEXT PRIMARY KEY,
        dept_name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS students (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        roll_no TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        dept_id TEXT NOT NULL REFERENCES departments (dept_id),
        dob DATE NOT NULL,
        phone TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS faculty (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        department TEXT NOT NULL REFERENCES departments (dept_id),
        email TEXT NOT NULL UNIQUE,
        phone TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS courses (
        id BIGSERIAL PRIMARY KEY,
        course_name TEXT NOT NULL,
        credits INTEGER NOT NULL,
        faculty_id BIGINT REFERENCES faculty (id) ON DELETE SET NULL
    )
    "#,
    // No UNIQUE (student_id, course_id): duplicates are rejected by the pre-insert check only.
    r#"
    CREATE TABLE IF NOT EXISTS enrollments (
        id BIGSERIAL PRIMARY KEY,
        student_id BIGINT NOT NULL REFERENCES students (id) ON DELETE CASCADE,
        course_id BIGINT NOT NULL REFERENCES courses (id) ON DELETE CASCADE,
        enrollment_date DATE NOT NULL DEFAULT CURRENT_DATE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_students_dept_id ON students (dept_id)",
    "CREATE INDEX IF NOT EXISTS idx_faculty_department ON faculty (department)",
    "CREATE INDEX IF NOT EXISTS idx_courses_faculty_id ON courses (faculty_id)",
    "CREATE INDEX IF NOT EXISTS idx_enrollments_student_course ON enrollments (student_id, course_id)",
    "CREATE INDEX IF NOT EXISTS idx_enrollments_course_id ON enrollments (course_id)",
];

/// Create the college tables and indexes if they do not exist.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for ddl in SCHEMA {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(statements = SCHEMA.len(), "schema ensured");
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| invalid_url(format!("{}: {}", admin_url, e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| invalid_url(url.to_string()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((name, query)) => (name.trim(), Some(query)),
        None => (path_and_query.trim(), None),
    };
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = match query {
        Some(q) => format!("{}postgres?{}", base, q),
        None => format!("{}postgres", base),
    };
    Ok((admin_url, db_name.to_string()))
}

fn invalid_url(value: String) -> AppError {
    AppError::Config(ConfigError::InvalidValue {
        key: "DATABASE_URL",
        value,
    })
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
