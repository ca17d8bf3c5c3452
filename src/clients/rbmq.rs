use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use lapin::{Channel, Connection, ConnectionProperties, options::BasicPublishOptions};
use tracing::{debug, info, warn};

use crate::{
    clients::broker::{Broker, BrokerSession},
    config::Settings,
    models::message::{BrokerEndpoint, MessageMetadata},
};

const REPLY_SUCCESS: u16 = 200;

pub struct RabbitMqBroker {
    connection_name: String,
}

impl RabbitMqBroker {
    pub fn new(settings: &Settings) -> Self {
        Self {
            connection_name: settings.connection_name.clone(),
        }
    }
}

#[async_trait]
impl Broker for RabbitMqBroker {
    async fn connect(&self, endpoint: &BrokerEndpoint) -> Result<Box<dyn BrokerSession>, Error> {
        let client = RabbitMqClient::connect(endpoint, &self.connection_name).await?;
        Ok(Box::new(client))
    }
}

pub struct RabbitMqClient {
    connection: Connection,
    channel: Channel,
}

impl RabbitMqClient {
    pub async fn connect(endpoint: &BrokerEndpoint, connection_name: &str) -> Result<Self, Error> {
        info!(endpoint = %endpoint, "Connecting to RabbitMQ");

        if endpoint.secure {
            // No-op when a provider is already installed.
            let _ = rustls::crypto::ring::default_provider().install_default();
        }

        let properties =
            ConnectionProperties::default().with_connection_name(connection_name.to_string().into());

        let connection = Connection::connect_uri(endpoint.to_uri(), properties)
            .await
            .map_err(|e| anyhow!("Failed to connect to RabbitMQ: {}", e))?;

        debug!("RabbitMQ connection established");

        let channel = match connection.create_channel().await {
            Ok(channel) => channel,
            Err(e) => {
                if let Err(close_err) = connection
                    .close(REPLY_SUCCESS, "Channel creation failed".into())
                    .await
                {
                    warn!(error = %close_err, "Failed to close RabbitMQ connection after channel error");
                }
                return Err(anyhow!("RabbitMQ channel creation failed: {}", e));
            }
        };

        debug!(channel_id = channel.id(), "RabbitMQ channel created");

        Ok(Self {
            connection,
            channel,
        })
    }
}

#[async_trait]
impl BrokerSession for RabbitMqClient {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        body: &[u8],
        metadata: &MessageMetadata,
    ) -> Result<(), Error> {
        debug!(
            exchange,
            routing_key,
            message_id = %metadata.message_id,
            correlation_id = %metadata.correlation_id,
            "Publishing message"
        );

        self.channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions::default(),
                body,
                metadata.to_properties(),
            )
            .await
            .map_err(|e| anyhow!("Failed to publish message: {}", e))?;

        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), Error> {
        self.connection
            .close(REPLY_SUCCESS, "Normal shutdown".into())
            .await
            .map_err(|e| anyhow!("Failed to close RabbitMQ connection: {}", e))?;

        debug!("RabbitMQ connection closed");

        Ok(())
    }
}
