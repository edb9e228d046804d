//! # Block Parsing
//!
//! A resumable single-pass line scanner. The caller feeds one line at a
//! time and threads a [`ParserState`] value between calls, so a parse can
//! be suspended between any two lines and cancelled by dropping the state.
//!
//! ## Modules
//!
//! - **`types`**: `Block`, `BlockKind` and their payloads
//! - **`kinds`**: block-specific delimiters and patterns (fence, quote, heading,
//!   list, media, table, thematic break, paragraph merging)
//! - **`classify`**: the ordered dispatch table of single-line block triggers
//! - **`state`**: `ParserState` and its modes
//! - **`builder`**: `BlockParser`, the state machine
//!
//! ## Key Invariants
//!
//! - Fenced code is a raw zone: no block or inline parsing inside
//! - At most one line is held back, for table header detection
//! - Every table row has one cell per declared column
//! - Malformed input never errors; it degrades to paragraphs, verbatim code
//!   or literal text

pub mod builder;
pub mod classify;
pub mod kinds;
pub mod state;
pub mod types;

pub use builder::BlockParser;
pub use classify::{Trigger, classify};
pub use state::{Mode, ParserState};
pub use types::{Alignment, Block, BlockKind, ListMarker};
