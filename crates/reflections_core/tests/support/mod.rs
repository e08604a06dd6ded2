//! Shared in-memory `Store` implementation backing the service tests.

use std::sync::Mutex;

use async_trait::async_trait;
use reflections_core::domain::{ReflectionEntry, Subscriber};
use reflections_core::ports::{PortError, PortResult, Store};

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    reflections: Vec<ReflectionEntry>,
    subscribers: Vec<Subscriber>,
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_reflection(&self, entry: ReflectionEntry) -> PortResult<ReflectionEntry> {
        let mut state = self.state.lock().unwrap();
        state.reflections.push(entry.clone());
        Ok(entry)
    }

    async fn find_reflection(&self, id: &str) -> PortResult<Option<ReflectionEntry>> {
        let state = self.state.lock().unwrap();
        Ok(state.reflections.iter().find(|e| e.id == id).cloned())
    }

    async fn list_reflections(&self) -> PortResult<Vec<ReflectionEntry>> {
        let state = self.state.lock().unwrap();
        Ok(state.reflections.clone())
    }

    async fn replace_reflection(
        &self,
        id: &str,
        entry: ReflectionEntry,
    ) -> PortResult<ReflectionEntry> {
        let mut state = self.state.lock().unwrap();
        match state.reflections.iter_mut().find(|e| e.id == id) {
            Some(slot) => {
                *slot = entry.clone();
                Ok(entry)
            }
            None => Err(PortError::NotFound(format!("Reflection {id} not found"))),
        }
    }

    async fn delete_reflection(&self, id: &str) -> PortResult<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.reflections.len();
        state.reflections.retain(|e| e.id != id);
        Ok(state.reflections.len() < before)
    }

    async fn insert_subscriber(&self, subscriber: Subscriber) -> PortResult<Subscriber> {
        let mut state = self.state.lock().unwrap();
        if state.subscribers.iter().any(|s| s.email == subscriber.email) {
            return Err(PortError::Duplicate(subscriber.email));
        }
        state.subscribers.push(subscriber.clone());
        Ok(subscriber)
    }

    async fn find_subscriber(&self, email: &str) -> PortResult<Option<Subscriber>> {
        let state = self.state.lock().unwrap();
        Ok(state.subscribers.iter().find(|s| s.email == email).cloned())
    }

    async fn list_subscribers(&self) -> PortResult<Vec<Subscriber>> {
        let state = self.state.lock().unwrap();
        Ok(state.subscribers.clone())
    }

    async fn set_subscriber_selection(
        &self,
        emails: &[String],
        selected: bool,
    ) -> PortResult<u64> {
        let mut state = self.state.lock().unwrap();
        let mut updated = 0;
        for subscriber in state.subscribers.iter_mut() {
            if emails.contains(&subscriber.email) {
                subscriber.selected = selected;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete_subscriber(&self, email: &str) -> PortResult<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.subscribers.len();
        state.subscribers.retain(|s| s.email != email);
        Ok(state.subscribers.len() < before)
    }
}
