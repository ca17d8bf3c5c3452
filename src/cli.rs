use std::ffi::OsString;

use clap::{
    ArgAction, Parser,
    builder::{BoolishValueParser, NonEmptyStringValueParser},
};

use crate::models::message::NotificationRequest;

#[derive(Parser, Debug)]
#[command(
    name = "callback_notifier",
    version,
    about = "Publishes a single task callback message to a RabbitMQ exchange and exits"
)]
pub struct NotifierArgs {
    /// Broker host name or address
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub host: String,

    /// Broker port, defaults to 5672 (or 5671 with --secure)
    #[arg(long)]
    pub port: Option<u16>,

    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub username: String,

    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub password: String,

    /// Virtual host, e.g. "/"
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub vhost: String,

    /// Exchange the message is published to
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub exchange: String,

    /// Routing key, also sent as the message type
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub topic: String,

    /// Correlation ID echoed into the message properties
    #[arg(
        long = "correlationId",
        value_name = "CORRELATION_ID",
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub correlation_id: String,

    /// Message body, sent as-is
    #[arg(
        long,
        allow_hyphen_values = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub message: String,

    /// Connect over TLS (amqps)
    #[arg(
        long,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub secure: bool,

    /// Print the elapsed time before exiting
    #[arg(long)]
    pub timed: bool,
}

impl From<NotifierArgs> for NotificationRequest {
    fn from(args: NotifierArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            username: args.username,
            password: args.password,
            vhost: args.vhost,
            exchange: args.exchange,
            topic: args.topic,
            correlation_id: args.correlation_id,
            message: args.message,
            secure: args.secure,
            timed: args.timed,
        }
    }
}

pub fn parse_request<I, T>(args: I) -> Result<NotificationRequest, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    NotifierArgs::try_parse_from(args).map(NotificationRequest::from)
}
