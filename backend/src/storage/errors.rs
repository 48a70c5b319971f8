use thiserror::Error;

/// A write collided with a unique constraint
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DuplicateEntry(pub String);

/// Turn a unique-constraint failure into [`DuplicateEntry`]; anything else
/// stays a plain storage error
pub(crate) fn duplicate_or_storage(err: sqlx::Error, message: &str) -> anyhow::Error {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            DuplicateEntry(message.to_string()).into()
        }
        _ => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_errors_stay_generic() {
        let err = duplicate_or_storage(sqlx::Error::RowNotFound, "Email already registered");
        assert!(err.downcast_ref::<DuplicateEntry>().is_none());
    }
}
