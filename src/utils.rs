use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    clients::{mailer::Mailer, pdf::DocumentRenderer},
    config::Config,
    error::SubmissionError,
    models::{
        form::FormLayout,
        message::OutboundMessage,
        payload::SubmissionPayload,
        response::{MessageResponse, SUBMISSION_SUCCESS_MESSAGE, TEST_EMAIL_SUCCESS_MESSAGE},
        validation::validate_field_values,
    },
};

const RECIPIENT_NOT_CONFIGURED: &str = "Recipient email not configured";

/// Parses a form submission, renders it to PDF and emails it to the
/// configured recipient. Nothing is sent unless every earlier step succeeds.
pub async fn process_submission(
    body: &[u8],
    config: &Config,
    form: &FormLayout,
    renderer: &DocumentRenderer,
    mailer: &dyn Mailer,
) -> Result<MessageResponse, SubmissionError> {
    let submission_id = Uuid::new_v4();

    match submit(submission_id, body, config, form, renderer, mailer).await {
        Ok(response) => {
            info!(%submission_id, "Email sent successfully");
            Ok(response)
        }
        Err(e) => {
            warn!(
                %submission_id,
                kind = e.kind(),
                error = %e,
                "Form submission failed"
            );
            Err(e)
        }
    }
}

async fn submit(
    submission_id: Uuid,
    body: &[u8],
    config: &Config,
    form: &FormLayout,
    renderer: &DocumentRenderer,
    mailer: &dyn Mailer,
) -> Result<MessageResponse, SubmissionError> {
    let payload = SubmissionPayload::parse(body)?;

    debug!(
        %submission_id,
        fields = payload.len(),
        "Submission payload parsed"
    );

    let field_spec = form.field_spec(&payload);
    validate_field_values(&payload, &field_spec)
        .map_err(|e| SubmissionError::MalformedPayload(e.to_string()))?;

    let document = renderer
        .render(form.title(), &field_spec, &payload)
        .map_err(|e| SubmissionError::Render(e.to_string()))?;

    debug!(
        %submission_id,
        bytes = document.len(),
        pages = document.page_count(),
        "Submission rendered"
    );

    let recipient = config
        .recipient()
        .ok_or_else(|| SubmissionError::Configuration(RECIPIENT_NOT_CONFIGURED.to_string()))?;

    let message = OutboundMessage::submission(recipient, document);

    deliver(mailer, &message, config.mail_send_timeout()).await?;

    Ok(MessageResponse::new(SUBMISSION_SUCCESS_MESSAGE))
}

/// Sends the fixed diagnostic message to the test recipient.
pub async fn send_test_email(
    config: &Config,
    mailer: &dyn Mailer,
) -> Result<MessageResponse, SubmissionError> {
    let recipient = config
        .test_recipient()
        .ok_or_else(|| SubmissionError::Configuration(RECIPIENT_NOT_CONFIGURED.to_string()))?;

    let message = OutboundMessage::test_email(recipient);

    match deliver(mailer, &message, config.mail_send_timeout()).await {
        Ok(()) => {
            info!(recipient, "Test email sent successfully");
            Ok(MessageResponse::new(TEST_EMAIL_SUCCESS_MESSAGE))
        }
        Err(e) => {
            warn!(recipient, error = %e, "Test email failed");
            Err(e)
        }
    }
}

/// Awaits one send, giving up after `limit`.
pub async fn deliver(
    mailer: &dyn Mailer,
    message: &OutboundMessage,
    limit: Duration,
) -> Result<(), SubmissionError> {
    match timeout(limit, mailer.send(message)).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(SubmissionError::Delivery(e.to_string())),
        Err(_) => Err(SubmissionError::DeliveryTimeout(limit.as_millis() as u64)),
    }
}
