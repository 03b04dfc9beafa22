//! Room design state
//!
//! The command resolver only ever sees an opaque JSON snapshot of the room;
//! this module owns the typed form that descriptors are applied to.

pub mod state;

pub use state::{summarize, DesignState, Placement};
