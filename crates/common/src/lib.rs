//! Shared types for the harbor scene.
//!
//! Everything here is plain data: ids, transforms, and the single-writer
//! [`Slot`] used to hand asynchronously loaded objects to the frame loop.

mod slot;
mod types;

pub use slot::{Slot, SlotError};
pub use types::{EntityId, Transform};
