use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use form_mailer::{
    clients::{mailer::Mailer, pdf::DocumentRenderer},
    config::Config,
    models::{
        document::RenderedDocument, form::FormLayout, message::OutboundMessage,
        payload::SubmissionPayload,
    },
};
use lopdf::{Document, content::Content};

#[derive(Debug, Clone)]
pub enum MailerBehavior {
    Succeed,
    Fail(String),
    Hang,
}

/// In-memory mailer that records every send attempt.
pub struct RecordingMailer {
    behavior: MailerBehavior,
    attempts: AtomicUsize,
    sent: Mutex<Vec<OutboundMessage>>,
}

impl RecordingMailer {
    pub fn new(behavior: MailerBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            attempts: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn succeeding() -> Arc<Self> {
        Self::new(MailerBehavior::Succeed)
    }

    pub fn failing(error: &str) -> Arc<Self> {
        Self::new(MailerBehavior::Fail(error.to_string()))
    }

    pub fn hanging() -> Arc<Self> {
        Self::new(MailerBehavior::Hang)
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &OutboundMessage) -> Result<(), Error> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MailerBehavior::Succeed => {
                if let Ok(mut sent) = self.sent.lock() {
                    sent.push(message.clone());
                }
                Ok(())
            }
            MailerBehavior::Fail(error) => Err(anyhow!("{}", error)),
            MailerBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> Result<(), Error> {
        match &self.behavior {
            MailerBehavior::Fail(error) => Err(anyhow!("{}", error)),
            _ => Ok(()),
        }
    }
}

pub const TEST_RECIPIENT: &str = "hr@example.com";
pub const TEST_ORIGIN: &str = "https://forms.example.com";

/// A complete config, with `overrides` applied on top.
pub fn test_config(overrides: &[(&str, &str)]) -> Result<Config> {
    let mut vars = vec![
        ("RECIPIENT_EMAIL".to_string(), TEST_RECIPIENT.to_string()),
        (
            "MAIL_DEFAULT_SENDER".to_string(),
            "forms@example.com".to_string(),
        ),
        ("MAIL_SEND_TIMEOUT_MS".to_string(), "1000".to_string()),
        ("CORS_ALLOWED_ORIGIN".to_string(), TEST_ORIGIN.to_string()),
    ];

    for (key, value) in overrides {
        vars.retain(|(k, _)| k != key);
        vars.push((key.to_string(), value.to_string()));
    }

    Config::from_vars(vars)
}

/// Config without a recipient address.
pub fn config_without_recipient() -> Result<Config> {
    Config::from_vars(vec![
        ("MAIL_DEFAULT_SENDER", "forms@example.com"),
        ("MAIL_SEND_TIMEOUT_MS", "1000"),
    ])
}

/// Renders `payload` with the fields `form` selects for it.
pub fn render_form(
    renderer: &DocumentRenderer,
    form: &FormLayout,
    payload: &SubmissionPayload,
) -> Result<RenderedDocument> {
    renderer.render(form.title(), &form.field_spec(payload), payload)
}

/// A shown line: its `Td` x offset and the raw string bytes.
#[derive(Debug, Clone)]
pub struct TextRun {
    pub x: i64,
    pub bytes: Vec<u8>,
}

/// Every text run in the document, in content order.
pub fn text_runs(bytes: &[u8]) -> Result<Vec<TextRun>> {
    let doc = Document::load_mem(bytes)?;
    let mut runs = Vec::new();

    for (_, page_id) in doc.get_pages() {
        let content = Content::decode(&doc.get_page_content(page_id)?)?;
        let mut x = 0;

        for op in &content.operations {
            match op.operator.as_str() {
                "Td" => {
                    if let Some(offset) = op.operands.first() {
                        x = offset.as_i64()?;
                    }
                }
                "Tj" => {
                    if let Some(text) = op.operands.first() {
                        runs.push(TextRun {
                            x,
                            bytes: text.as_str()?.to_vec(),
                        });
                    }
                }
                _ => {}
            }
        }
    }

    Ok(runs)
}

/// Text shown by every `Tj` operator, grouped by page.
pub fn page_lines(bytes: &[u8]) -> Result<Vec<Vec<String>>> {
    let doc = Document::load_mem(bytes)?;
    let mut pages = Vec::new();

    for (_, page_id) in doc.get_pages() {
        let content = Content::decode(&doc.get_page_content(page_id)?)?;

        let lines = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| op.operands.first())
            .filter_map(|operand| operand.as_str().ok())
            .map(|text| String::from_utf8_lossy(text).into_owned())
            .collect();

        pages.push(lines);
    }

    Ok(pages)
}

pub fn all_lines(bytes: &[u8]) -> Result<Vec<String>> {
    Ok(page_lines(bytes)?.into_iter().flatten().collect())
}
