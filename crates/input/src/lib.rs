//! Input collaborator: discrete key-state queries.
//!
//! # Invariants
//! - Logic polls key state once per tick; there is no event queue.
//! - The renderer itself never reads input.

pub mod key;

pub use key::{Key, KeyInput, KeyState, NoInput};
