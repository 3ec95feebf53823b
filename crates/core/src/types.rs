/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Calendar dates carry no time zone.
pub type Date = chrono::NaiveDate;
