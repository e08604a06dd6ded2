pub mod dispatch;
pub mod domain;
pub mod ports;
pub mod service;
pub mod session;

pub use dispatch::{DispatchError, NewsletterDispatcher};
pub use domain::{
    AdminSession, DispatchOutcome, DispatchSummary, NewReflection, ReflectionEntry, Subscriber,
};
pub use ports::{MailTransport, PortError, PortResult, Store};
pub use service::{normalize_email, ReflectionService, SubscriberService};
pub use session::AdminSessionManager;
