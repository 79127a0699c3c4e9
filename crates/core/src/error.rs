/// Failure reported by an [`EventStore`](crate::store::EventStore) backend.
///
/// Store failures always abort the operation that hit them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or the connection was lost.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected or failed the query.
    #[error("Store query failed: {0}")]
    Query(String),

    /// A stored row could not be turned into a domain value.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Malformed {entity} id: {raw:?}")]
    InvalidId { entity: &'static str, raw: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    /// Shorthand for a missing event.
    pub fn event_not_found(id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: "Event",
            id: id.to_string(),
        }
    }

    /// `true` for errors caused by the caller's input rather than a dependency.
    pub fn is_input_error(&self) -> bool {
        matches!(self, CoreError::InvalidId { .. } | CoreError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_entity_and_id() {
        let err = CoreError::event_not_found("abc");
        assert_eq!(err.to_string(), "Entity not found: Event with id abc");
    }

    #[test]
    fn store_error_is_transparent() {
        let err = CoreError::from(StoreError::Unavailable("connection refused".into()));
        assert_eq!(err.to_string(), "Store unavailable: connection refused");
        assert!(!err.is_input_error());
    }

    #[test]
    fn input_errors_are_classified() {
        assert!(CoreError::Validation("bad".into()).is_input_error());
        assert!(CoreError::InvalidId {
            entity: "Event",
            raw: "x".into()
        }
        .is_input_error());
    }
}
