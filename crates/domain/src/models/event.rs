//! Event domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A scheduled tee time with a fixed number of open spots.
///
/// `open_spots` is set at creation and never mutated; remaining capacity is
/// always derived from the current accepted count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
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

/// Validated input for event creation, after request-level checks.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub course_id: Uuid,
    pub date: NaiveDate,
    pub tee_time: String,
    pub open_spots: i32,
    pub number_of_holes: String,
    pub private: bool,
    pub host_id: Uuid,
}

/// Request to create a new event with its invitee fan-out.
///
/// Every field except `private` and `invitees` is required; each missing
/// field produces its own validation message.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[validate(required(message = "Course can't be blank"))]
    pub course_id: Option<Uuid>,

    #[validate(required(message = "Date can't be blank"))]
    pub date: Option<NaiveDate>,

    #[validate(required(message = "Tee time can't be blank"))]
    #[validate(length(min = 1, message = "Tee time can't be blank"))]
    pub tee_time: Option<String>,

    #[validate(required(message = "Open spots can't be blank"))]
    #[validate(range(min = 1, message = "Open spots must be at least 1"))]
    pub open_spots: Option<i32>,

    #[validate(required(message = "Number of holes can't be blank"))]
    #[validate(length(min = 1, message = "Number of holes can't be blank"))]
    pub number_of_holes: Option<String>,

    #[serde(default)]
    pub private: bool,

    #[validate(required(message = "Host can't be blank"))]
    pub host_id: Option<Uuid>,

    /// Players to invite. Only meaningful for private events; public events
    /// fan out to every other known player.
    #[serde(default)]
    pub invitees: Vec<Uuid>,
}

impl CreateEventRequest {
    /// Convert a validated request into a `NewEvent` plus its invitee list.
    ///
    /// Returns `None` when a required field is absent; `validate()` reports
    /// the per-field messages for that case.
    pub fn into_parts(self) -> Option<(NewEvent, Vec<Uuid>)> {
        let event = NewEvent {
            course_id: self.course_id?,
            date: self.date?,
            tee_time: self.tee_time?,
            open_spots: self.open_spots?,
            number_of_holes: self.number_of_holes?,
            private: self.private,
            host_id: self.host_id?,
        };
        Some((event, self.invitees))
    }
}

/// Full read view of an event, including per-status participant lists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventResponse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub course_name: String,
    pub date: NaiveDate,
    pub tee_time: String,
    pub open_spots: i32,
    pub number_of_holes: String,
    pub private: bool,
    pub host_id: Uuid,
    pub host_name: String,
    pub accepted: Vec<Uuid>,
    pub declined: Vec<Uuid>,
    pub pending: Vec<Uuid>,
    pub closed: Vec<Uuid>,
    pub remaining_spots: i64,
}
