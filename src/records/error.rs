use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    /// Request never got a response (DNS, connect, timeout)
    Network(String),
    /// Backend refused our credentials
    Auth(String),
    /// Backend answered with a non-success status
    Backend { status: u16, body: String },
    Io(String),
    /// Stored data could not be decoded
    Corrupt(String),
    /// Record refused before writing (e.g. a figure overflowed)
    InvalidRecord(String),
}

impl StoreError {
    /// Used to pick the auth exit code
    pub fn is_auth(&self) -> bool {
        matches!(self, StoreError::Auth(_))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Network(msg) => write!(f, "Network error: {}", msg),
            StoreError::Auth(msg) => write!(f, "Authentication failed: {}", msg),
            StoreError::Backend { status, body } => {
                if body.is_empty() {
                    write!(f, "Record store returned HTTP {}", status)
                } else {
                    write!(f, "Record store returned HTTP {}: {}", status, body)
                }
            }
            StoreError::Io(msg) => write!(f, "Record file error: {}", msg),
            StoreError::Corrupt(msg) => write!(f, "Corrupt record data: {}", msg),
            StoreError::InvalidRecord(msg) => write!(f, "Record not saved: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
