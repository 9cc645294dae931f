use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,          // BIGSERIAL, registration order
    pub username: String, // unique, case-sensitive
}
