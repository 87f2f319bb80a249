mod transport;

pub use transport::{ITransport, InMemoryTransport, WebhookTransport};
