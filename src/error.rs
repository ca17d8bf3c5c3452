use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Failed to connect to broker at {host}: {reason}")]
    Connection { host: String, reason: String },

    #[error("Failed to publish to exchange '{exchange}': {reason}")]
    Publish { exchange: String, reason: String },
}

impl NotifierError {
    pub fn connection(host: &str, err: anyhow::Error) -> Self {
        Self::Connection {
            host: host.to_string(),
            reason: format!("{:#}", err),
        }
    }

    pub fn publish(exchange: &str, err: anyhow::Error) -> Self {
        Self::Publish {
            exchange: exchange.to_string(),
            reason: format!("{:#}", err),
        }
    }

    /// Argument errors never get here; clap exits them with code 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            NotifierError::Connection { .. } => 1,
            NotifierError::Publish { .. } => 3,
        }
    }
}
