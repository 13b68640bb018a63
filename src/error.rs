use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A constructed statement contained a write/DDL keyword or did not
    /// start with an allowed read keyword. This is a logic bug in query
    /// construction, never a data condition, so it aborts the request.
    #[error("read-only violation: {0}")]
    ReadOnlyViolation(String),

    #[error("database connection failed: {0}")]
    Connection(String),

    #[error("query execution failed: {0}")]
    Execution(String),

    #[error("row decode failed: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the dashboard surface may degrade this failure to an empty
    /// result set instead of surfacing it. Connectivity, execution, and
    /// decode failures degrade; read-only violations and config errors
    /// never do.
    pub fn is_degradable(&self) -> bool {
        matches!(
            self,
            Error::Connection(_) | Error::Execution(_) | Error::Decode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readonly_violation_is_not_degradable() {
        assert!(!Error::ReadOnlyViolation("DELETE".into()).is_degradable());
        assert!(!Error::Config("DB_HOST must be set".into()).is_degradable());
    }

    #[test]
    fn infra_failures_are_degradable() {
        assert!(Error::Connection("refused".into()).is_degradable());
        assert!(Error::Execution("syntax".into()).is_degradable());
        assert!(Error::Decode("bad column".into()).is_degradable());
    }
}
