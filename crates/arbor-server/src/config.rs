use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

use arbor_api::reporter::MailRelay;

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub refcodes_path: PathBuf,
    /// Argon2 iteration count used when hashing passwords.
    pub hash_cost: u32,
    /// How long in-flight connections get to drain before the process is
    /// forced down.
    pub shutdown_grace: Duration,
    pub mail_relay: Option<MailRelay>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            host: var_or("ARBOR_HOST", "0.0.0.0"),
            port: parsed("ARBOR_PORT", "3000")?,
            db_path: var_or("ARBOR_DB_PATH", "arbor.db").into(),
            refcodes_path: var_or("ARBOR_REFCODES_PATH", "refcodes.txt").into(),
            hash_cost: parsed("ARBOR_HASH_COST", "2")?,
            shutdown_grace: Duration::from_secs(parsed("ARBOR_SHUTDOWN_GRACE_SECS", "10")?),
            mail_relay: mail_relay(),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed<T: std::str::FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var_or(key, default)
        .parse()
        .with_context(|| format!("invalid value for {key}"))
}

/// Error-report mail is optional; it switches on only when a relay URL is
/// configured alongside both addresses.
fn mail_relay() -> Option<MailRelay> {
    let url = env::var("ARBOR_MAIL_RELAY_URL").ok()?;
    let from = env::var("ARBOR_MAIL_FROM").ok();
    let to = env::var("ARBOR_MAIL_TO").ok();
    match (from, to) {
        (Some(from), Some(to)) => Some(MailRelay {
            url,
            from,
            to: to.split(',').map(|s| s.trim().to_string()).collect(),
        }),
        _ => {
            warn!("ARBOR_MAIL_RELAY_URL is set but ARBOR_MAIL_FROM/ARBOR_MAIL_TO are not; error mail disabled");
            None
        }
    }
}
