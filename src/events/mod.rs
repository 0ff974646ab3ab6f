//! # Events Module
//!
//! Structured decision log and progress reporting.
//!
//! ## Design
//! The pipeline never writes decisions to a global logger. It records them
//! into an [`EventSink`] handed to it by the caller, so the CLI, a GUI or a
//! test can each consume the same stream.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::File(f) = event {
//!             println!("{} {}", f.outcome, f.source.display());
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{EventChannel, EventReceiver, EventSender, null_sender};
pub use types::*;

/// Anything that can receive pipeline events.
pub trait EventSink: Send + Sync {
    /// Record one event. Must not fail; sinks drop what they cannot deliver.
    fn record(&self, event: Event);
}
