use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Transport failure: DNS, TLS, connect, timeout, truncated body.
    Http(String),
    /// The endpoint rejected the application token.
    Auth(String),
    /// The endpoint answered with an error payload or a non-2xx status.
    Server {
        code: Option<String>,
        message: String,
    },
    Serialization(String),
    Unavailable(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Http(msg) => write!(f, "http error: {msg}"),
            ClientError::Auth(msg) => write!(f, "authentication failed: {msg}"),
            ClientError::Server {
                code: Some(code),
                message,
            } => write!(f, "server error [{code}]: {message}"),
            ClientError::Server {
                code: None,
                message,
            } => write!(f, "server error: {message}"),
            ClientError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            ClientError::Unavailable(msg) => write!(f, "database unavailable: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl ClientError {
    pub fn server(code: impl Into<String>, message: impl Into<String>) -> Self {
        ClientError::Server {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}

impl From<ureq::Error> for ClientError {
    fn from(e: ureq::Error) -> Self {
        ClientError::Http(e.to_string())
    }
}
