pub mod font_metrics;
pub mod health;
pub mod mailer;
pub mod pdf;
