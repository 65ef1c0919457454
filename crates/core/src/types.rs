/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All row timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Booking dates are whole calendar days, inclusive on both ends.
pub type CalendarDate = chrono::NaiveDate;
