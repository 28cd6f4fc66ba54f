//! Passes built on the scanning engine.
//!
//! - `outline`: structural outline of a unit, with a compact style that falls back via rollback
//! - `writer`: indented line writer used by the outline

mod outline;
mod writer;

pub use outline::{OutlinePass, OutlineStyle};
pub use writer::OutlineWriter;
