//! Repository for the `categories` table.

use bugtracker_core::types::DbId;
use bugtracker_core::validation::CheckedCategory;
use sqlx::PgPool;

use crate::models::category::{Category, CategoryChoice};

/// Column list for categories queries.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List all categories, ordered by name ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query =
            format!(r#"SELECT {COLUMNS} FROM categories ORDER BY name COLLATE "C" ASC, id ASC"#);
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// `(id, name)` pairs for issue forms, ordered by name.
    pub async fn list_choices(pool: &PgPool) -> Result<Vec<CategoryChoice>, sqlx::Error> {
        sqlx::query_as::<_, CategoryChoice>(
            "SELECT id, name FROM categories ORDER BY name COLLATE \"C\" ASC, id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Find a category by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the first category with exactly this name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Category>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM categories WHERE name = $1 ORDER BY id ASC LIMIT 1");
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Create a new category, returning the created row.
    pub async fn create(pool: &PgPool, input: &CheckedCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Replace a category's editable fields, returning the updated row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CheckedCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = $2,
                description = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Number of issues owned by a category.
    pub async fn count_issues(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT AS count FROM issues WHERE category_id = $1",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Delete a category that owns no issues.
    ///
    /// The emptiness check and the delete are one statement. Returns `false`
    /// if the row is missing or still has issues.
    pub async fn delete_if_empty(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM categories
             WHERE id = $1
               AND NOT EXISTS (SELECT 1 FROM issues WHERE category_id = $1)",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
