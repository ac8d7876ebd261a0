//! Repository for the `issues` table.
//!
//! Every read joins `categories` so rows carry `category_name`.

use bugtracker_core::issue::{IssuePriority, UNKNOWN_PRIORITY_RANK};
use bugtracker_core::listing::{IssueListQuery, IssueSort, SortField};
use bugtracker_core::types::DbId;
use bugtracker_core::validation::CheckedIssue;
use sqlx::PgPool;

use crate::models::issue::Issue;

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for issue reads; expects `issues i JOIN categories c`.
const COLUMNS: &str = "\
    i.id, i.title, i.description, i.status, i.priority, i.category_id, \
    c.name AS category_name, i.author_id, i.created_at, i.updated_at";

const FROM_JOINED: &str = "issues i JOIN categories c ON c.id = i.category_id";

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// `CASE` expression mapping a priority to its severity rank.
fn priority_rank_sql() -> String {
    let arms: String = IssuePriority::ALL
        .into_iter()
        .map(|p| format!(" WHEN '{}' THEN {}", p.as_str(), p.rank()))
        .collect();
    format!("CASE i.priority{arms} ELSE {UNKNOWN_PRIORITY_RANK} END")
}

/// Build the `ORDER BY` body for a listing.
///
/// Only enum-derived text is interpolated; the final `i.id ASC` makes pages
/// deterministic. Text columns sort under the `C` collation so the order is
/// by code point, the same as [`IssueSort::compare`].
fn order_by(sort: &IssueSort) -> String {
    let direction = sort.direction.as_sql();
    let primary = match sort.field {
        SortField::Title => format!("i.title COLLATE \"C\" {direction}"),
        SortField::Status => format!("i.status COLLATE \"C\" {direction}"),
        SortField::CreatedAt => format!("i.created_at {direction}"),
        SortField::Category => format!("c.name COLLATE \"C\" {direction}"),
        SortField::Priority => format!(
            "{} {}",
            priority_rank_sql(),
            sort.priority_rank_direction().as_sql()
        ),
    };
    format!("{primary}, i.id ASC")
}

// ---------------------------------------------------------------------------
// IssueRepo
// ---------------------------------------------------------------------------

/// Provides CRUD and listing operations for issues.
pub struct IssueRepo;

impl IssueRepo {
    /// One page of issues, optionally restricted to a category.
    pub async fn list(pool: &PgPool, params: &IssueListQuery) -> Result<Vec<Issue>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM_JOINED}
             WHERE ($1::BIGINT IS NULL OR i.category_id = $1)
             ORDER BY {}
             LIMIT $2 OFFSET $3",
            order_by(&params.sort)
        );
        sqlx::query_as::<_, Issue>(&query)
            .bind(params.category_id)
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(pool)
            .await
    }

    /// Count issues, optionally restricted to a category.
    pub async fn count(pool: &PgPool, category_id: Option<DbId>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT AS count FROM issues
             WHERE ($1::BIGINT IS NULL OR category_id = $1)",
        )
        .bind(category_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Issue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM_JOINED} WHERE i.id = $1");
        sqlx::query_as::<_, Issue>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a validated issue, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CheckedIssue,
        author_id: Option<DbId>,
    ) -> Result<Issue, sqlx::Error> {
        let query = format!(
            "WITH i AS (
                INSERT INTO issues (title, description, status, priority, category_id, author_id)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
             )
             SELECT {COLUMNS} FROM i JOIN categories c ON c.id = i.category_id"
        );
        sqlx::query_as::<_, Issue>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(input.priority.as_str())
            .bind(input.category_id)
            .bind(author_id)
            .fetch_one(pool)
            .await
    }

    /// Replace an issue's editable fields. `created_at` and `author_id` are
    /// never touched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CheckedIssue,
    ) -> Result<Option<Issue>, sqlx::Error> {
        let query = format!(
            "WITH i AS (
                UPDATE issues SET
                    title = $2,
                    description = $3,
                    status = $4,
                    priority = $5,
                    category_id = $6
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM i JOIN categories c ON c.id = i.category_id"
        );
        sqlx::query_as::<_, Issue>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(input.priority.as_str())
            .bind(input.category_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an issue by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM issues WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
