//! # Inline Kinds
//!
//! Inline-specific types that own the compiled pattern for their syntax.
//! The formatter only decides pass order and calls these patterns.
//!
//! ## Types
//!
//! - **`Link`**: `[text](target)` links and `~~strikethrough~~` (first pass)
//! - **`CodeSpan`**: `` `code` `` spans (second pass)
//! - **`Emphasis`**: bold then italic (third and fourth passes)

pub mod code_span;
pub mod emphasis;
pub mod link;

pub use code_span::CodeSpan;
pub use emphasis::Emphasis;
pub use link::Link;
