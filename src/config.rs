use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

use crate::models::form::FormKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_mail_server")]
    pub mail_server: String,
    #[serde(default = "default_mail_port")]
    pub mail_port: u16,
    #[serde(default = "default_true")]
    pub mail_use_tls: bool,
    #[serde(default)]
    pub mail_use_ssl: bool,
    pub mail_username: Option<String>,
    pub mail_password: Option<String>,
    pub mail_default_sender: Option<String>,
    #[serde(default = "default_mail_send_timeout_ms")]
    pub mail_send_timeout_ms: u64,

    pub recipient_email: Option<String>,
    pub test_email_recipient: Option<String>,

    #[serde(default)]
    pub form_kind: FormKind,

    #[serde(default = "default_cors_allowed_origin")]
    pub cors_allowed_origin: String,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_mail_server() -> String {
    "smtp.gmail.com".to_string()
}

fn default_mail_port() -> u16 {
    587
}

fn default_true() -> bool {
    true
}

fn default_mail_send_timeout_ms() -> u64 {
    30_000
}

fn default_cors_allowed_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|e| anyhow!("Invalid or missing environmental variable: {}", e))?;
        Ok(config)
    }

    /// Builds a config from an explicit set of variables instead of the
    /// process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        envy::from_iter(vars.into_iter().map(|(k, v)| (k.into(), v.into())))
            .map_err(|e| anyhow!("Invalid configuration variable: {}", e))
    }

    pub fn recipient(&self) -> Option<&str> {
        non_blank(self.recipient_email.as_deref())
    }

    pub fn test_recipient(&self) -> Option<&str> {
        non_blank(self.test_email_recipient.as_deref()).or_else(|| self.recipient())
    }

    /// The From address: the configured default sender, else the SMTP username.
    pub fn sender(&self) -> Option<&str> {
        non_blank(self.mail_default_sender.as_deref())
            .or_else(|| non_blank(self.mail_username.as_deref()))
    }

    pub fn mail_send_timeout(&self) -> Duration {
        Duration::from_millis(self.mail_send_timeout_ms)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
