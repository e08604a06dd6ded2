//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use reflections_core::{
    AdminSessionManager, NewsletterDispatcher, ReflectionService, SubscriberService,
};

use crate::config::Config;

/// The shared application state, created once at startup and passed to all handlers.
///
/// The admin session set lives inside `sessions`; it is owned here and
/// injected wherever authorization checks run, never reached through
/// global state.
#[derive(Clone)]
pub struct AppState {
    pub reflections: ReflectionService,
    pub subscribers: SubscriberService,
    pub sessions: Arc<AdminSessionManager>,
    pub dispatcher: Arc<NewsletterDispatcher>,
    pub config: Arc<Config>,
}
