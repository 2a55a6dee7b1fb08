//! Course repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CourseEntity;
use crate::metrics::QueryTimer;

/// Repository for course-related database operations.
#[derive(Clone)]
pub struct CourseRepository {
    pool: PgPool,
}

impl CourseRepository {
    /// Creates a new CourseRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a course by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CourseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_course_by_id");
        let result = sqlx::query_as::<_, CourseEntity>(
            r#"
            SELECT id, name, street, city, state, zip, phone, cost, created_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List all courses.
    pub async fn list_courses(&self) -> Result<Vec<CourseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_courses");
        let result = sqlx::query_as::<_, CourseEntity>(
            r#"
            SELECT id, name, street, city, state, zip, phone, cost, created_at
            FROM courses
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
