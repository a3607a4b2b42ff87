use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    UnknownQuery(String),
    UnknownCollection(String),
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::UnknownQuery(key) => write!(f, "unknown query: {key}"),
            DashboardError::UnknownCollection(name) => write!(f, "unknown collection: {name}"),
            DashboardError::InvalidTransition { from, action } => {
                write!(f, "cannot {action} while {from}")
            }
        }
    }
}

impl std::error::Error for DashboardError {}
