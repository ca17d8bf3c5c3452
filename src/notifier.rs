use std::{io::Write, time::Instant};

use tracing::{error, info, warn};

use crate::{
    clients::broker::Broker,
    error::NotifierError,
    models::message::{MessageMetadata, NotificationRequest},
};

/// Connects, publishes the request's message once and closes the connection.
///
/// The session is closed on every path once it has been opened. A failed close
/// after a successful publish is reported as a publish failure, since the frame
/// may never have left the client.
pub async fn notify(
    request: &NotificationRequest,
    broker: &dyn Broker,
) -> Result<MessageMetadata, NotifierError> {
    let endpoint = request.endpoint();

    let session = broker
        .connect(&endpoint)
        .await
        .map_err(|e| NotifierError::connection(&request.host, e))?;

    info!(endpoint = %endpoint, "Broker session opened");

    let metadata = request.metadata();

    let published = session
        .publish(
            &request.exchange,
            &request.topic,
            request.message.as_bytes(),
            &metadata,
        )
        .await;

    let closed = session.close().await;

    match (published, closed) {
        (Err(e), closed) => {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "Failed to close broker connection after publish error");
            }
            Err(NotifierError::publish(&request.exchange, e))
        }
        (Ok(()), Err(e)) => Err(NotifierError::publish(
            &request.exchange,
            e.context("Connection close failed after publish"),
        )),
        (Ok(()), Ok(())) => {
            info!(
                correlation_id = %metadata.correlation_id,
                message_id = %metadata.message_id,
                exchange = %request.exchange,
                topic = %request.topic,
                "Notification published"
            );
            Ok(metadata)
        }
    }
}

/// Runs one notification and reports progress and the outcome on `out`.
///
/// Never fails outward: the error is written to `out` and handed back so the
/// caller can pick an exit code.
pub async fn execute<W: Write>(
    request: &NotificationRequest,
    broker: &dyn Broker,
    out: &mut W,
) -> Result<MessageMetadata, NotifierError> {
    let started = Instant::now();

    let outcome = deliver(request, broker, out).await;

    if let Err(e) = &outcome {
        error!(
            correlation_id = %request.correlation_id,
            exit_code = e.exit_code(),
            error = %e,
            "Notification failed"
        );
        report(out, format_args!("{}", e));
    }

    if request.timed {
        report(
            out,
            format_args!("Duration: {}", started.elapsed().as_secs_f64()),
        );
    }

    outcome
}

async fn deliver<W: Write>(
    request: &NotificationRequest,
    broker: &dyn Broker,
    out: &mut W,
) -> Result<MessageMetadata, NotifierError> {
    report(
        out,
        format_args!(
            "[Correlation ID={}] Sending message to {} at exchange={}, topic={}...",
            request.correlation_id, request.host, request.exchange, request.topic
        ),
    );
    report(
        out,
        format_args!(
            "[Correlation ID={}] Message={}...",
            request.correlation_id, request.message
        ),
    );

    let metadata = notify(request, broker).await?;

    report(out, format_args!("Message sent."));

    Ok(metadata)
}

/// Progress output is observational; a closed stdout must not change the outcome.
fn report<W: Write>(out: &mut W, line: std::fmt::Arguments<'_>) {
    if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
        warn!(error = %e, "Failed to write progress line");
    }
}
