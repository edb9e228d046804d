use crate::{
    document::LineSpan,
    parsing::inline::{InlineFormatter, Run},
};

use super::{
    classify::{Trigger, classify},
    kinds::{CodeFence, ListItem, MediaKind, ParagraphBuffer, Table, TableBuffer},
    state::{Mode, ParserState},
    types::{Block, BlockKind},
};

/// Resumable line-at-a-time block parser.
///
/// The parser itself holds only the inline formatter; all progress lives in
/// the [`ParserState`] the caller threads through [`feed`](Self::feed) and
/// [`finish`](Self::finish).
///
/// Each line is tested in priority order, first match wins:
///
/// 1. code fence toggle; inside a fence every line is verbatim
/// 2. table row while a table is open, otherwise the table is emitted
/// 3. separator row under a held pipe row opens a table, otherwise the held
///    row is released as paragraph text
/// 4. a pipe row is held as a possible table header
/// 5. block-level triggers (media, thematic break, quote, heading, task,
///    list item, blank)
/// 6. indented list continuation
/// 7. paragraph text
#[derive(Debug, Clone, Default)]
pub struct BlockParser {
    inline: InlineFormatter,
}

impl BlockParser {
    pub fn new(search_term: Option<&str>) -> Self {
        Self::with_formatter(InlineFormatter::new(search_term))
    }

    pub fn with_formatter(inline: InlineFormatter) -> Self {
        Self { inline }
    }

    /// Consumes one line and returns the next state plus any completed blocks.
    pub fn feed(&self, state: ParserState, line: &str, index: usize) -> (ParserState, Vec<Block>) {
        let mut out = Vec::new();
        let state = self.step(state, line, index, &mut out);
        (state, out)
    }

    /// Flushes whatever is still buffered at end of input.
    ///
    /// An unterminated fence becomes a code block holding everything after
    /// the opening fence; a held pipe row becomes a paragraph.
    pub fn finish(&self, state: ParserState) -> Vec<Block> {
        let mut out = Vec::new();
        self.flush(state.mode, &mut out);
        out
    }

    fn step(&self, state: ParserState, line: &str, index: usize, out: &mut Vec<Block>) -> ParserState {
        let ParserState { mode, in_list } = state;

        if let Some(info) = CodeFence::info(line) {
            let mode = match mode {
                Mode::InCodeBlock {
                    language,
                    body,
                    start_line,
                } => {
                    out.push(code_block(language, &body, LineSpan::new(start_line, index)));
                    Mode::Normal
                }
                other => {
                    self.flush(other, out);
                    Mode::InCodeBlock {
                        language: info.to_string(),
                        body: Vec::new(),
                        start_line: index,
                    }
                }
            };
            return ParserState::with_mode(mode, in_list);
        }

        let mode = match mode {
            Mode::InCodeBlock {
                language,
                mut body,
                start_line,
            } => {
                body.push(line.to_string());
                let mode = Mode::InCodeBlock {
                    language,
                    body,
                    start_line,
                };
                return ParserState::with_mode(mode, in_list);
            }
            Mode::InTable(mut table) if Table::is_row(line) => {
                table.push_row(line, index);
                return ParserState::with_mode(Mode::InTable(table), in_list);
            }
            Mode::InTable(table) => {
                out.extend(self.table_block(table));
                Mode::Normal
            }
            Mode::PendingTableHeader {
                line: header,
                line_index,
            } => match Table::parse_separator(line) {
                Some(alignments) => {
                    let mut table = TableBuffer::new(alignments);
                    table.push_row(&header, line_index);
                    return ParserState::with_mode(Mode::InTable(table), in_list);
                }
                None => ParagraphBuffer::start(&header, line_index)
                    .map_or(Mode::Normal, Mode::PendingParagraph),
            },
            other => other,
        };

        if Table::is_row(line) {
            self.flush(mode, out);
            let held = Mode::PendingTableHeader {
                line: line.to_string(),
                line_index: index,
            };
            return ParserState::with_mode(held, in_list);
        }

        if let Some(trigger) = classify(line) {
            self.flush(mode, out);
            let in_list = match trigger {
                Trigger::ListItem { .. } => true,
                Trigger::Media { .. } | Trigger::ThematicBreak => in_list,
                _ => false,
            };
            out.push(self.trigger_block(trigger, index));
            return ParserState::with_mode(Mode::Normal, in_list);
        }

        if in_list && ListItem::is_continuation(line) {
            let mode = match mode {
                Mode::PendingParagraph(mut paragraph) => {
                    paragraph.push_continuation(line, index);
                    Mode::PendingParagraph(paragraph)
                }
                other => {
                    self.flush(other, out);
                    Mode::PendingParagraph(ParagraphBuffer::continuation(line, index))
                }
            };
            return ParserState::with_mode(mode, true);
        }

        let mode = match mode {
            Mode::PendingParagraph(mut paragraph) => {
                paragraph.push_line(line, index);
                Mode::PendingParagraph(paragraph)
            }
            other => {
                self.flush(other, out);
                ParagraphBuffer::start(line, index).map_or(Mode::Normal, Mode::PendingParagraph)
            }
        };
        ParserState::with_mode(mode, false)
    }

    /// Emits whatever `mode` has buffered.
    fn flush(&self, mode: Mode, out: &mut Vec<Block>) {
        match mode {
            Mode::Normal => {}
            Mode::InCodeBlock {
                language,
                body,
                start_line,
            } => {
                let span = LineSpan::new(start_line, start_line + body.len());
                out.push(code_block(language, &body, span));
            }
            Mode::InTable(table) => out.extend(self.table_block(table)),
            Mode::PendingTableHeader { line, line_index } => {
                if let Some(paragraph) = ParagraphBuffer::start(&line, line_index) {
                    out.push(self.paragraph_block(paragraph));
                }
            }
            Mode::PendingParagraph(paragraph) => out.push(self.paragraph_block(paragraph)),
        }
    }

    fn runs(&self, text: &str) -> Vec<Run> {
        self.inline.format(text)
    }

    fn paragraph_block(&self, paragraph: ParagraphBuffer) -> Block {
        let kind = BlockKind::Paragraph {
            runs: self.runs(paragraph.text()),
            list_continuation: paragraph.is_list_continuation(),
        };
        Block::new(kind, paragraph.span())
    }

    fn table_block(&self, table: TableBuffer) -> Option<Block> {
        let span = LineSpan::new(table.first_line()?, table.last_line()?);
        let rows = table
            .rows
            .iter()
            .map(|row| row.iter().map(|cell| self.runs(cell)).collect())
            .collect();
        let kind = BlockKind::Table {
            alignments: table.alignments,
            rows,
            row_lines: table.row_lines,
        };
        Some(Block::new(kind, span))
    }

    fn trigger_block(&self, trigger: Trigger<'_>, index: usize) -> Block {
        let kind = match trigger {
            Trigger::Media {
                kind: MediaKind::Image,
                alt,
                src,
            } => BlockKind::Image {
                src: src.to_string(),
                alt: alt.to_string(),
            },
            Trigger::Media {
                kind: MediaKind::Video,
                alt,
                src,
            } => BlockKind::Video {
                src: src.to_string(),
                alt: alt.to_string(),
            },
            Trigger::ThematicBreak => BlockKind::Separator,
            Trigger::Quote { depth, text } => BlockKind::Blockquote {
                depth,
                runs: self.runs(text),
            },
            Trigger::Heading { level, text } => BlockKind::Header {
                level,
                text: text.to_string(),
            },
            Trigger::Task { checked, text } => BlockKind::TaskItem {
                checked,
                runs: self.runs(text),
            },
            Trigger::ListItem { marker, text } => BlockKind::ListItem {
                marker,
                runs: self.runs(text),
            },
            Trigger::Blank => BlockKind::Spacer,
        };
        Block::new(kind, LineSpan::single(index))
    }
}

fn code_block(language: String, body: &[String], span: LineSpan) -> Block {
    let kind = BlockKind::CodeBlock {
        language,
        content: CodeFence::content(body),
    };
    Block::new(kind, span)
}
