use tracing::error;

use arbor_types::ErrorReporter;

/// Where operator mail gets delivered: an HTTP mail-relay endpoint plus the
/// envelope addresses.
#[derive(Debug, Clone)]
pub struct MailRelay {
    pub url: String,
    pub from: String,
    pub to: Vec<String>,
}

/// Production error reporter: always logs, and when a relay is configured
/// also mails the operator with the tag, message, and error chain.
///
/// Delivery is fire-and-forget — a mail failure is itself logged and never
/// propagates into the request that triggered the report.
pub struct MailReporter {
    client: reqwest::Client,
    relay: Option<MailRelay>,
}

impl MailReporter {
    pub fn new(relay: Option<MailRelay>) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay,
        }
    }
}

impl ErrorReporter for MailReporter {
    fn report(&self, tag: &'static str, err: &anyhow::Error) {
        error!("{tag}: {err:#}");

        let Some(relay) = &self.relay else {
            return;
        };

        let timestamp = chrono::Local::now().format("%B %e, %Y, %I:%M:%S %p");
        let body = serde_json::json!({
            "from": relay.from,
            "to": relay.to,
            "subject": format!("{tag}: {err} at {timestamp}"),
            "text": format!("```{err:?}```"),
            "html": format!("<pre>{err:?}</pre>"),
        });

        let client = self.client.clone();
        let url = relay.url.clone();
        tokio::spawn(async move {
            if let Err(e) = client.post(&url).json(&body).send().await {
                error!("error report mail failed: {e}");
            }
        });
    }
}
