use sqlx::FromRow;
use time::Date;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Exercise {
    pub id: i64, // insertion order
    pub user_id: i64,
    pub description: String,
    pub duration: i32,
    pub date: Date,
}

/// Row to insert; the date has already been defaulted.
#[derive(Debug, Clone)]
pub struct NewExercise {
    pub user_id: i64,
    pub description: String,
    pub duration: i32,
    pub date: Date,
}

/// Bounds applied when reading a user's log. Both dates are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub limit: Option<i64>,
}
