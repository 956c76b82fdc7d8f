//! Text buffer and snapshot history.
//!
//! Provides a rope-backed buffer with selection management and a bounded
//! undo/redo history of whole-text snapshots.

mod buffer;
mod history;

pub use buffer::{Buffer, Direction, Selection};
pub use history::{DEFAULT_HISTORY_LIMIT, History};
