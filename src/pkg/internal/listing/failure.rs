/// How a database failure should be treated by callers that can degrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// A table or column the query expects does not exist (pending migration).
    SchemaDrift,
    /// The database could not be reached or the connection broke.
    Connectivity,
    /// A unique constraint rejected the write.
    UniqueViolation,
    Other,
}

// postgres: undefined_column, undefined_table; mysql sqlstates for the same
const DRIFT_CODES: [&str; 4] = ["42703", "42P01", "42S22", "42S02"];
const DRIFT_MESSAGES: [&str; 4] = [
    "no such column",
    "no such table",
    "unknown column",
    "doesn't exist",
];

pub fn classify(err: &sqlx::Error) -> Failure {
    match err {
        sqlx::Error::Database(db) => {
            if db.is_unique_violation() {
                return Failure::UniqueViolation;
            }
            if let Some(code) = db.code() {
                if DRIFT_CODES.contains(&code.as_ref()) {
                    return Failure::SchemaDrift;
                }
            }
            let message = db.message().to_ascii_lowercase();
            if DRIFT_MESSAGES.iter().any(|m| message.contains(m)) {
                Failure::SchemaDrift
            } else {
                Failure::Other
            }
        }
        sqlx::Error::ColumnNotFound(_) => Failure::SchemaDrift,
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => Failure::Connectivity,
        _ => Failure::Other,
    }
}
