//! Category model.

use bugtracker_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// `(id, name)` pair offered when picking an issue's category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CategoryChoice {
    pub id: DbId,
    pub name: String,
}

impl From<&Category> for CategoryChoice {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
        }
    }
}

/// DTO for creating a new category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCategory {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating a category. Omitted fields keep their stored value; an
/// empty `description` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}
