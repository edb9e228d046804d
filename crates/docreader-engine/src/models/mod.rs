pub mod corpus;
pub mod corpus_entry;

pub use corpus::Corpus;
pub use corpus_entry::{CorpusEntry, DocumentId};
