use anyhow::{Error, Result};
use async_trait::async_trait;

use crate::models::message::{BrokerEndpoint, MessageMetadata};

/// Opens sessions against a message broker.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Connects, authenticates and opens one channel.
    async fn connect(&self, endpoint: &BrokerEndpoint) -> Result<Box<dyn BrokerSession>, Error>;
}

/// One connection with one open channel.
#[async_trait]
pub trait BrokerSession: Send + Sync {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        body: &[u8],
        metadata: &MessageMetadata,
    ) -> Result<(), Error>;

    async fn close(self: Box<Self>) -> Result<(), Error>;
}
