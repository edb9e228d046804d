//! Block kinds and the syntax each one owns.
//!
//! Every delimiter, marker and pattern for a block lives with its kind;
//! the classifier and builder only ask the kinds.

pub mod block_quote;
pub mod code_fence;
pub mod heading;
pub mod list;
pub mod media;
pub mod paragraph;
pub mod table;
pub mod thematic_break;

pub use block_quote::BlockQuote;
pub use code_fence::CodeFence;
pub use heading::Heading;
pub use list::{ListItem, ListMarker};
pub use media::{Media, MediaKind};
pub use paragraph::{ParagraphBuffer, is_cjk};
pub use table::{Alignment, Table, TableBuffer};
pub use thematic_break::ThematicBreak;
