use std::{collections::HashMap, sync::Arc, time::Instant};

use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    clients::mailer::Mailer,
    config::Config,
    models::health::{HealthCheckResponse, HealthStatus, ServiceHealth},
};

pub struct HealthChecker {
    config: Arc<Config>,
    mailer: Arc<dyn Mailer>,
}

impl HealthChecker {
    pub fn new(config: Arc<Config>, mailer: Arc<dyn Mailer>) -> Self {
        Self { config, mailer }
    }

    pub async fn check_all(&self) -> HealthCheckResponse {
        let mut checks = HashMap::new();

        checks.insert("smtp".to_string(), self.check_smtp().await);
        checks.insert("recipient".to_string(), self.check_recipient());

        let overall_status = determine_overall_status(&checks);

        HealthCheckResponse {
            status: overall_status,
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            checks,
        }
    }

    async fn check_smtp(&self) -> ServiceHealth {
        let start = Instant::now();

        match self.mailer.health_check().await {
            Ok(()) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(response_time_ms = elapsed, "SMTP health check passed");
                ServiceHealth::healthy(elapsed)
            }
            Err(e) => {
                warn!(error = %e, "SMTP health check failed");
                ServiceHealth::unhealthy(format!("Connection failed: {}", e))
            }
        }
    }

    fn check_recipient(&self) -> ServiceHealth {
        match self.config.recipient() {
            Some(_) => ServiceHealth::healthy(0),
            None => ServiceHealth::degraded("Recipient email not configured".to_string()),
        }
    }
}

pub fn determine_overall_status(checks: &HashMap<String, ServiceHealth>) -> HealthStatus {
    let has_unhealthy = checks
        .values()
        .any(|health| health.status == HealthStatus::Unhealthy);

    let has_degraded = checks
        .values()
        .any(|health| health.status == HealthStatus::Degraded);

    if has_unhealthy {
        HealthStatus::Unhealthy
    } else if has_degraded {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}
