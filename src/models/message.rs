use std::fmt;

use lapin::{
    BasicProperties,
    uri::{AMQPAuthority, AMQPScheme, AMQPUri, AMQPUserInfo},
};
use uuid::Uuid;

pub const CONTENT_TYPE: &str = "application/json";
pub const APP_ID: &str = "Task Manager Callback";
pub const PERSISTENT_DELIVERY_MODE: u8 = 2;

const AMQP_PORT: u16 = 5672;
const AMQPS_PORT: u16 = 5671;

/// Everything one invocation needs to publish its notification.
#[derive(Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    pub vhost: String,
    pub exchange: String,
    pub topic: String,
    pub correlation_id: String,
    pub message: String,
    pub secure: bool,
    pub timed: bool,
}

impl fmt::Debug for NotificationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationRequest")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("vhost", &self.vhost)
            .field("exchange", &self.exchange)
            .field("topic", &self.topic)
            .field("correlation_id", &self.correlation_id)
            .field("message", &self.message)
            .field("secure", &self.secure)
            .field("timed", &self.timed)
            .finish()
    }
}

impl NotificationRequest {
    pub fn endpoint(&self) -> BrokerEndpoint {
        let default_port = if self.secure { AMQPS_PORT } else { AMQP_PORT };

        BrokerEndpoint {
            secure: self.secure,
            port: self.port.unwrap_or(default_port),
            host: self.host.clone(),
            vhost: self.vhost.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    pub fn metadata(&self) -> MessageMetadata {
        MessageMetadata::new(&self.correlation_id, &self.topic)
    }
}

/// Where and as whom to connect.
#[derive(Clone, PartialEq, Eq)]
pub struct BrokerEndpoint {
    pub secure: bool,
    pub host: String,
    pub port: u16,
    pub vhost: String,
    pub username: String,
    pub password: String,
}

impl BrokerEndpoint {
    pub fn to_uri(&self) -> AMQPUri {
        AMQPUri {
            scheme: if self.secure {
                AMQPScheme::AMQPS
            } else {
                AMQPScheme::AMQP
            },
            authority: AMQPAuthority {
                userinfo: AMQPUserInfo {
                    username: self.username.clone(),
                    password: self.password.clone(),
                },
                host: self.host.clone(),
                port: self.port,
            },
            vhost: self.vhost.clone(),
            ..Default::default()
        }
    }
}

impl fmt::Display for BrokerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = if self.secure { "amqps" } else { "amqp" };
        write!(f, "{}://{}:{} (vhost {})", scheme, self.host, self.port, self.vhost)
    }
}

impl fmt::Debug for BrokerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerEndpoint")
            .field("secure", &self.secure)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("vhost", &self.vhost)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Properties attached to every published notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageMetadata {
    pub content_type: String,
    pub message_id: String,
    pub app_id: String,
    pub correlation_id: String,
    pub delivery_mode: u8,
    pub kind: String,
}

impl MessageMetadata {
    pub fn new(correlation_id: &str, topic: &str) -> Self {
        Self {
            content_type: CONTENT_TYPE.to_string(),
            message_id: Uuid::new_v4().to_string(),
            app_id: APP_ID.to_string(),
            correlation_id: correlation_id.to_string(),
            delivery_mode: PERSISTENT_DELIVERY_MODE,
            kind: topic.to_string(),
        }
    }

    pub fn to_properties(&self) -> BasicProperties {
        BasicProperties::default()
            .with_content_type(self.content_type.clone().into())
            .with_message_id(self.message_id.clone().into())
            .with_app_id(self.app_id.clone().into())
            .with_correlation_id(self.correlation_id.clone().into())
            .with_delivery_mode(self.delivery_mode)
            .with_type(self.kind.clone().into())
    }
}
