//! Multisig Events - delivery and persistence of engine events
//!
//! The engine emits into an `EventBus`; subscribers drain it on their
//! own tasks so emission never waits on delivery.
//!
//! - `EventBus`: tokio broadcast channel implementing `EventSink`
//! - `EventSubscriber`: async handler trait, driven by `run_subscriber`
//! - `EventStore` / `EventReader`: append-only JSONL journal
//! - `JournalSubscriber`: writes every event to the journal

pub mod bus;
pub mod error;
pub mod reader;
pub mod record;
pub mod store;
pub mod subscriber;

pub use bus::EventBus;
pub use error::EventError;
pub use reader::EventReader;
pub use record::EventRecord;
pub use store::EventStore;
pub use subscriber::{run_subscriber, EventSubscriber, JournalSubscriber};
