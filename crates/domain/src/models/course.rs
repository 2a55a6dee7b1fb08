//! Course domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A golf course that events are scheduled at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Course {
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

/// Response for a single course.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CourseResponse {
    pub id: Uuid,
    pub name: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub phone: Option<String>,
    pub cost: Option<String>,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
            street: course.street,
            city: course.city,
            state: course.state,
            zip: course.zip,
            phone: course.phone,
            cost: course.cost,
        }
    }
}
