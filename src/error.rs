//! Error types for graph operations

use thiserror::Error;

/// Errors reported by [`Graph`](crate::Graph) operations.
///
/// Every variant except [`DuplicateNode`](GraphError::DuplicateNode) is a
/// "not found" error; the variants differ only in which role the missing
/// entity was expected to fill, so messages stay specific. Failed
/// operations validate before they mutate, so an error always leaves the
/// graph unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("already have node with identifier `{0}`")]
    DuplicateNode(String),

    #[error("node `{0}` not found")]
    NodeNotFound(String),

    #[error("source `{0}` not found")]
    SourceNotFound(String),

    #[error("destination `{0}` not found")]
    DestinationNotFound(String),

    #[error("`{0}` is not a root of the graph")]
    RootNotFound(String),

    #[error("there is no edge between `{source}` and `{destination}`")]
    // `r#source` is the same identifier as `source` to callers, but keeps
    // thiserror from treating the field as an implicit `Error::source`.
    EdgeNotFound {
        r#source: String,
        destination: String,
    },
}

impl GraphError {
    /// True for every "not found" variant, regardless of role.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GraphError::NodeNotFound(_)
                | GraphError::SourceNotFound(_)
                | GraphError::DestinationNotFound(_)
                | GraphError::RootNotFound(_)
                | GraphError::EdgeNotFound { .. }
        )
    }
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_covers_every_missing_role() {
        assert!(!GraphError::DuplicateNode("n1".into()).is_not_found());
        assert!(GraphError::NodeNotFound("n1".into()).is_not_found());
        assert!(GraphError::SourceNotFound("n1".into()).is_not_found());
        assert!(GraphError::DestinationNotFound("n1".into()).is_not_found());
        assert!(GraphError::RootNotFound("n1".into()).is_not_found());
        assert!(GraphError::EdgeNotFound {
            source: "n1".into(),
            destination: "n2".into(),
        }
        .is_not_found());
    }

    #[test]
    fn messages_name_the_missing_role() {
        let err = GraphError::SourceNotFound("n4".into());
        assert_eq!(err.to_string(), "source `n4` not found");

        let err = GraphError::EdgeNotFound {
            source: "n1".into(),
            destination: "n2".into(),
        };
        assert_eq!(err.to_string(), "there is no edge between `n1` and `n2`");
    }
}
