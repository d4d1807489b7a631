use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::adapters::database::{ConnectionManager, DatabaseError};

pub const GET_STUDENTS: &str = "
SELECT student_uuid::text AS student_uuid, student_id::bigint AS student_id,
       first_name, last_name, status, program_id::text AS program_id
FROM students
WHERE active = true
";

pub const GET_STUDENT_BY_STUDENT_ID: &str = "
SELECT student_uuid::text AS student_uuid, student_id::bigint AS student_id,
       first_name, last_name, status, program_id::text AS program_id
FROM students
WHERE active = true
AND student_id = $1
";

/// One active student, with the column names of the `students` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudentRow {
    pub student_uuid: String,
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub status: String,
    pub program_id: Option<String>,
}

/// Row-returning query interface the student handlers read through.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Makes sure the backing connection is usable before dispatch.
    async fn ensure_ready(&self) -> Result<(), DatabaseError>;

    async fn list_students(&self) -> Result<Vec<StudentRow>, DatabaseError>;

    async fn get_student(&self, student_id: i64) -> Result<Option<StudentRow>, DatabaseError>;
}

pub struct PgStudentRepository {
    connections: ConnectionManager,
}

impl PgStudentRepository {
    pub fn new(connections: ConnectionManager) -> Self {
        Self { connections }
    }
}

#[async_trait]
impl StudentRepository for PgStudentRepository {
    async fn ensure_ready(&self) -> Result<(), DatabaseError> {
        self.connections.pool().await.map(|_| ())
    }

    async fn list_students(&self) -> Result<Vec<StudentRow>, DatabaseError> {
        let pool = self.connections.pool().await?;
        sqlx::query_as::<_, StudentRow>(GET_STUDENTS)
            .fetch_all(&pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn get_student(&self, student_id: i64) -> Result<Option<StudentRow>, DatabaseError> {
        let pool = self.connections.pool().await?;
        sqlx::query_as::<_, StudentRow>(GET_STUDENT_BY_STUDENT_ID)
            .bind(student_id)
            .fetch_optional(&pool)
            .await
            .map_err(DatabaseError::Query)
    }
}
