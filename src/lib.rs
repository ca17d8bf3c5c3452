pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod notifier;
pub mod telemetry;

use std::{
    ffi::OsString,
    io::{self, Write},
    process::ExitCode,
};

use tracing::warn;

use crate::{
    clients::{broker::Broker, rbmq::RabbitMqBroker},
    config::Settings,
};

/// Loads settings, starts logging and publishes against RabbitMQ.
pub async fn run<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let (settings, settings_error) = match Settings::load() {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    telemetry::init(&settings);

    if let Some(e) = settings_error {
        warn!(error = %e, "Falling back to default settings");
    }

    let broker = RabbitMqBroker::new(&settings);

    ExitCode::from(run_with(args, &broker, &mut io::stdout()).await)
}

/// Parses `args`, publishes one notification through `broker` and returns the
/// process exit code. Nothing touches `broker` unless parsing succeeds.
pub async fn run_with<I, T, W>(args: I, broker: &dyn Broker, out: &mut W) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
{
    let request = match cli::parse_request(args) {
        Ok(request) => request,
        Err(err) => {
            if let Err(e) = err.print() {
                warn!(error = %e, "Failed to print usage error");
            }
            return err.exit_code() as u8;
        }
    };

    match notifier::execute(&request, broker, out).await {
        Ok(_) => 0,
        Err(e) => e.exit_code(),
    }
}
