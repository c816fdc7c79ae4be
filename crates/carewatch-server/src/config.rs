use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use eyre::{WrapErr, bail};
use secrecy::SecretString;

use carewatch_dispatch::smtp::SmtpSettings;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_BUCKET: &str = "carewatch";
pub const DEFAULT_NOTIFICATION_URL: &str = "http://localhost:5002/api/postNotifications";
pub const DEFAULT_ALERT_URL: &str = "http://localhost:5002/api/postAlerts";
pub const DEFAULT_REPORT_URL: &str = "http://localhost:5500/report.html";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    S3,
}

/// Everything the service reads from its environment at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub listen_addr: SocketAddr,
    pub store: StoreKind,
    pub bucket: String,
    /// Base URL of a separately deployed scoring service. Scores in-process
    /// when unset.
    pub scoring_url: Option<String>,
    pub scoring_policy: Option<PathBuf>,
    pub notification_url: String,
    pub alert_url: String,
    pub report_url: String,
    pub http_timeout: Duration,
    /// `None` when any mail setting is missing; email then fails per task.
    pub smtp: Option<SmtpSettings>,
}

impl ServiceConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let or = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        let listen_addr = or("CAREWATCH_LISTEN_ADDR", DEFAULT_LISTEN_ADDR)
            .parse()
            .wrap_err("CAREWATCH_LISTEN_ADDR is not a socket address")?;

        let store = match var("CAREWATCH_STORE").as_deref() {
            None | Some("memory") => StoreKind::Memory,
            Some("s3") => StoreKind::S3,
            Some(other) => bail!("CAREWATCH_STORE must be \"memory\" or \"s3\", got {other:?}"),
        };

        let http_timeout = match var("CAREWATCH_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .wrap_err("CAREWATCH_HTTP_TIMEOUT_SECS is not a whole number")?;
                if secs == 0 {
                    bail!("CAREWATCH_HTTP_TIMEOUT_SECS must be positive");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let smtp_port = match var("SMTP_PORT") {
            Some(raw) => raw.parse().wrap_err("SMTP_PORT is not a valid port")?,
            None => DEFAULT_SMTP_PORT,
        };
        let smtp = match (
            var("SMTP_USERNAME"),
            var("SMTP_PASSWORD"),
            var("SMTP_FROM"),
            var("CAREWATCH_REVIEWER_EMAIL"),
        ) {
            (Some(username), Some(password), Some(from), Some(reviewer)) => Some(SmtpSettings {
                host: or("SMTP_HOST", DEFAULT_SMTP_HOST),
                port: smtp_port,
                username,
                password: SecretString::from(password),
                from,
                reviewer,
            }),
            _ => None,
        };

        Ok(Self {
            listen_addr,
            store,
            bucket: or("CAREWATCH_BUCKET", DEFAULT_BUCKET),
            scoring_url: var("CAREWATCH_SCORING_URL"),
            scoring_policy: var("CAREWATCH_SCORING_POLICY").map(PathBuf::from),
            notification_url: or("CAREWATCH_NOTIFICATION_URL", DEFAULT_NOTIFICATION_URL),
            alert_url: or("CAREWATCH_ALERT_URL", DEFAULT_ALERT_URL),
            report_url: or("CAREWATCH_REPORT_URL", DEFAULT_REPORT_URL),
            http_timeout,
            smtp,
        })
    }
}
