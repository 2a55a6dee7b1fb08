//! Course entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Course;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the courses table.
#[derive(Debug, Clone, FromRow)]
pub struct CourseEntity {
    pub id: Uuid,
    pub name: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub cost: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CourseEntity> for Course {
    fn from(entity: CourseEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            street: entity.street,
            city: entity.city,
            state: entity.state,
            zip: entity.zip,
            phone: entity.phone,
            cost: entity.cost,
            created_at: entity.created_at,
        }
    }
}
