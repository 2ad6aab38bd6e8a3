use crate::error::RelayError;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast::{self, error::RecvError};

/// A subscribed pub/sub channel that client events can be triggered on
/// and bound to.
#[async_trait]
pub trait RollChannel: Send + Sync {
    fn name(&self) -> &str;

    fn is_subscribed(&self) -> bool;

    /// Publish an event to every listener bound to it.
    async fn trigger(&self, event: &str, payload: Value) -> Result<(), RelayError>;

    /// Listen to an event. The stream ends when the channel goes away.
    fn bind(&self, event: &str) -> BoxStream<'static, Value>;
}

/// In-process channel backed by tokio broadcast channels, one per event
/// name. Clones share the same events.
#[derive(Clone)]
pub struct LocalChannel {
    name: String,
    capacity: usize,
    events: Arc<Mutex<HashMap<String, broadcast::Sender<Value>>>>,
    subscribed: Arc<AtomicBool>,
}

impl LocalChannel {
    pub fn subscribe(name: &str, capacity: usize) -> LocalChannel {
        debug!("Subscribing to channel {}", name);
        LocalChannel {
            name: name.to_owned(),
            capacity: capacity.max(1),
            events: Arc::new(Mutex::new(HashMap::new())),
            subscribed: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn unsubscribe(&self) {
        debug!("Unsubscribing from channel {}", self.name);
        self.subscribed.store(false, Ordering::SeqCst);
        // Dropping the senders ends every bound stream.
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    fn sender(&self, event: &str) -> broadcast::Sender<Value> {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events
            .entry(event.to_owned())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

#[async_trait]
impl RollChannel for LocalChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }

    async fn trigger(&self, event: &str, payload: Value) -> Result<(), RelayError> {
        if !self.is_subscribed() {
            return Err(RelayError::NotSubscribed(self.name.clone()));
        }

        match self.sender(event).send(payload) {
            Ok(listeners) => debug!("Triggered {} on {} for {} listeners", event, self.name, listeners),
            Err(_) => debug!("Triggered {} on {} with nobody listening", event, self.name),
        }

        Ok(())
    }

    fn bind(&self, event: &str) -> BoxStream<'static, Value> {
        if !self.is_subscribed() {
            return stream::empty().boxed();
        }

        let receiver = self.sender(event).subscribe();
        let event = event.to_owned();

        stream::unfold((receiver, event), |(mut receiver, event)| async move {
            loop {
                match receiver.recv().await {
                    Ok(payload) => return Some((payload, (receiver, event))),
                    Err(RecvError::Lagged(missed)) => {
                        warn!("Listener for {} fell behind, {} events missed", event, missed)
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn bound_listener_receives_events_test() {
        let channel = LocalChannel::subscribe("private-test", 8);
        let mut events = channel.bind("client-ping");

        channel.trigger("client-ping", json!({"n": 1})).await.unwrap();
        channel.trigger("client-other", json!({"n": 2})).await.unwrap();
        channel.trigger("client-ping", json!({"n": 3})).await.unwrap();

        assert_eq!(Some(json!({"n": 1})), events.next().await);
        assert_eq!(Some(json!({"n": 3})), events.next().await);
    }

    #[tokio::test]
    async fn clones_share_events_test() {
        let channel = LocalChannel::subscribe("private-test", 8);
        let other = channel.clone();
        let mut events = other.bind("client-ping");

        channel.trigger("client-ping", json!("hello")).await.unwrap();
        assert_eq!(Some(json!("hello")), events.next().await);
    }

    #[tokio::test]
    async fn trigger_without_listeners_is_ok_test() {
        let channel = LocalChannel::subscribe("private-test", 8);
        assert!(channel.trigger("client-ping", json!(null)).await.is_ok());
    }

    #[tokio::test]
    async fn unsubscribe_ends_streams_test() {
        let channel = LocalChannel::subscribe("private-test", 8);
        let mut events = channel.bind("client-ping");
        channel.unsubscribe();

        assert!(!channel.is_subscribed());
        assert_eq!(None, events.next().await);
        assert!(matches!(
            channel.trigger("client-ping", json!(null)).await,
            Err(RelayError::NotSubscribed(name)) if name == "private-test"
        ));

        let mut late = channel.bind("client-ping");
        assert_eq!(None, late.next().await);
    }

    #[tokio::test]
    async fn lagging_listener_keeps_going_test() {
        let channel = LocalChannel::subscribe("private-test", 1);
        let mut events = channel.bind("client-ping");

        channel.trigger("client-ping", json!(1)).await.unwrap();
        channel.trigger("client-ping", json!(2)).await.unwrap();
        assert_eq!(Some(json!(2)), events.next().await);
    }
}
