use crate::models::document::RenderedDocument;

pub const SUBMISSION_SUBJECT: &str = "Form Submission PDF";
pub const SUBMISSION_BODY: &str = "Attached is the submitted form in PDF format.";
pub const SUBMISSION_FILENAME: &str = "submission.pdf";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

pub const TEST_EMAIL_SUBJECT: &str = "Test Email";
pub const TEST_EMAIL_BODY: &str = "This is a test email from the form submission service.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<Attachment>,
}

impl OutboundMessage {
    pub fn new(recipient: String, subject: String, body: String) -> Self {
        Self {
            recipient,
            subject,
            body,
            attachment: None,
        }
    }

    /// The email carrying a rendered submission as `submission.pdf`.
    pub fn submission(recipient: &str, document: RenderedDocument) -> Self {
        Self::new(
            recipient.to_string(),
            SUBMISSION_SUBJECT.to_string(),
            SUBMISSION_BODY.to_string(),
        )
        .with_attachment(Attachment {
            filename: SUBMISSION_FILENAME.to_string(),
            content_type: PDF_CONTENT_TYPE.to_string(),
            data: document.into_bytes(),
        })
    }

    pub fn test_email(recipient: &str) -> Self {
        Self::new(
            recipient.to_string(),
            TEST_EMAIL_SUBJECT.to_string(),
            TEST_EMAIL_BODY.to_string(),
        )
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}
