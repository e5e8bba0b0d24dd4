//! # Events Module
//!
//! Progress reporting for whatever drives the engine.
//!
//! ## Design
//! The core emits events through a channel; the CLI listens on another
//! thread and renders a progress bar. Library users that don't care pass
//! [`null_sender`].
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Resolve(ResolveEvent::Duplicate { discarded, .. }) = event {
//!             println!("discarded {}", discarded.display());
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
