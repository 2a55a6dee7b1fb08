//! Event entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::Event;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub course_id: Uuid,
    pub date: NaiveDate,
    pub tee_time: String,
    pub open_spots: i32,
    pub number_of_holes: String,
    pub private: bool,
    pub host_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<EventEntity> for Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            course_id: entity.course_id,
            date: entity.date,
            tee_time: entity.tee_time,
            open_spots: entity.open_spots,
            number_of_holes: entity.number_of_holes,
            private: entity.private,
            host_id: entity.host_id,
            created_at: entity.created_at,
        }
    }
}

/// Event row joined with course and host names, for read views.
#[derive(Debug, Clone, FromRow)]
pub struct EventDetailEntity {
    pub id: Uuid,
    pub course_id: Uuid,
    pub date: NaiveDate,
    pub tee_time: String,
    pub open_spots: i32,
    pub number_of_holes: String,
    pub private: bool,
    pub host_id: Uuid,
    pub course_name: String,
    pub host_name: String,
}
