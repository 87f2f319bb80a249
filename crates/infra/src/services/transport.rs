use coursebell_domain::RenderedMessage;
use std::collections::HashSet;
use std::sync::Mutex;
use tracing::warn;

/// The message transport boundary. `Ok(true)` means the message was
/// accepted, `Ok(false)` and `Err` both count as a failed send for that one
/// recipient; the dispatcher never aborts a batch because of either.
#[async_trait::async_trait]
pub trait ITransport: Send + Sync {
    async fn send(&self, message: &RenderedMessage) -> anyhow::Result<bool>;
}

/// Delivers rendered messages to a webhook endpoint, authenticated by a
/// shared key header. The receiving side is responsible for fan-out to
/// mail/push providers.
pub struct WebhookTransport {
    client: reqwest::Client,
    url: String,
    key: String,
}

impl WebhookTransport {
    pub fn new(url: String, key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            key,
        }
    }
}

#[async_trait::async_trait]
impl ITransport for WebhookTransport {
    async fn send(&self, message: &RenderedMessage) -> anyhow::Result<bool> {
        let res = self
            .client
            .post(&self.url)
            .header("coursebell-webhook-key", &self.key)
            .json(message)
            .send()
            .await?;

        if !res.status().is_success() {
            warn!(
                "Webhook endpoint returned status {} for event {}",
                res.status(),
                message.event_id
            );
            return Ok(false);
        }
        Ok(true)
    }
}

/// Records every accepted message and fails on demand, for tests.
pub struct InMemoryTransport {
    sent: Mutex<Vec<RenderedMessage>>,
    failing_recipients: Mutex<HashSet<String>>,
    fail_all: Mutex<bool>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_recipients: Mutex::new(HashSet::new()),
            fail_all: Mutex::new(false),
        }
    }

    pub fn sent_messages(&self) -> Vec<RenderedMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Makes every send to this address report a failure.
    pub fn fail_for(&self, email: &str) {
        self.failing_recipients
            .lock()
            .unwrap()
            .insert(email.to_string());
    }

    pub fn fail_all(&self, fail: bool) {
        *self.fail_all.lock().unwrap() = fail;
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ITransport for InMemoryTransport {
    async fn send(&self, message: &RenderedMessage) -> anyhow::Result<bool> {
        if *self.fail_all.lock().unwrap() {
            return Ok(false);
        }
        if self
            .failing_recipients
            .lock()
            .unwrap()
            .contains(&message.recipient_email)
        {
            return Ok(false);
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(true)
    }
}
