//! # Inline Formatting
//!
//! Turns the text of one block into non-overlapping formatted runs.
//!
//! ## Passes
//!
//! Each pass claims the leftmost non-overlapping matches of its pattern
//! inside text that no earlier pass claimed:
//!
//! 1. links `[text](url)` and strikethrough `~~text~~`
//! 2. code spans
//! 3. bold (`**` / `__`)
//! 4. italic (`*` / `_`)
//! 5. search-term highlight
//!
//! Claimed text is never split again, so a search term inside a code span
//! or link is not highlighted.
//!
//! ## Modules
//!
//! - **`types`**: `Run` and `RunStyle`
//! - **`kinds`**: delimiter and pattern knowledge per construct
//! - **`parser`**: `InlineFormatter` and the pass driver

pub mod kinds;
pub mod parser;
pub mod types;

pub use parser::{InlineFormatter, format};
pub use types::{Run, RunStyle, visible_text};
