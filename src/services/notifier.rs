use serde::Serialize;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: Variant,
}

/// Fan-out of user-facing messages. Sending with nobody subscribed is fine.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Notifier { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn success(&self, title: &str, description: &str) {
        self.emit(title, description, Variant::Default);
    }

    pub fn failure(&self, title: &str, description: &str) {
        self.emit(title, description, Variant::Destructive);
    }

    fn emit(&self, title: &str, description: &str, variant: Variant) {
        let _ = self.tx.send(Notification {
            title: title.to_string(),
            description: description.to_string(),
            variant,
        });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
