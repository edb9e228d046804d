pub mod blocks;
pub mod inline;

#[cfg(test)]
pub(crate) mod tests;

use blocks::{Block, BlockParser, ParserState};

use crate::document::split_lines;

#[derive(Debug)]
pub struct ParsedDoc {
    pub blocks: Vec<Block>,
}

/// Parses a whole document in one go.
///
/// Equivalent to a render pass with an unbounded tick budget.
pub fn parse_document(text: &str, search_term: Option<&str>) -> ParsedDoc {
    let parser = BlockParser::new(search_term);
    let mut state = ParserState::new();
    let mut blocks = Vec::new();

    for (index, line) in split_lines(text).enumerate() {
        let (next, emitted) = parser.feed(state, line, index);
        state = next;
        blocks.extend(emitted);
    }
    blocks.extend(parser.finish(state));

    ParsedDoc { blocks }
}
