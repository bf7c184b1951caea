//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use jummix_notify::application::notifications::DispatcherSettings;
use jummix_notify::domain::entities::{ChatMessage, Conversation, MessageCreated, UserProfile};
use jummix_notify::infrastructure::memory::{MemoryGateway, MemoryStore};
use jummix_notify::NotificationDispatcher;

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub gateway: Arc<MemoryGateway>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_gateway(MemoryGateway::new())
    }

    pub fn with_gateway(gateway: MemoryGateway) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            gateway: Arc::new(gateway),
        }
    }

    pub fn dispatcher(&self) -> NotificationDispatcher {
        self.dispatcher_with(DispatcherSettings::default())
    }

    pub fn dispatcher_with(&self, settings: DispatcherSettings) -> NotificationDispatcher {
        NotificationDispatcher::new(self.store.clone(), self.gateway.clone(), settings)
    }

    pub async fn conversation(&self, id: &str, participants: &[&str]) {
        self.store
            .insert_conversation(Conversation::new(id, participants.iter().copied()))
            .await;
    }

    pub async fn user(&self, uid: &str, name: &str, tokens: &[&str]) {
        self.store
            .insert_profile(
                UserProfile::new(uid)
                    .with_display_name(name)
                    .with_push_tokens(tokens.iter().copied()),
            )
            .await;
    }
}

pub fn message(conversation_id: &str, sender: &str, text: &str) -> MessageCreated {
    MessageCreated::new(conversation_id, ChatMessage::new(sender, text))
}

/// Log sink for asserting on emitted events
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Install as the thread's subscriber; keep the guard alive for the test
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || sink.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
