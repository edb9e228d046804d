use docreader_engine::{Alignment, Block, BlockKind, ListMarker, Run, RunStyle};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block as Panel, Borders, List, ListItem, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, Focus};

/// Rendered height of one terminal row in the units the navigator measures
/// heading positions and its lead margin in.
pub const ROW_HEIGHT: f32 = 16.0;

const GUTTER: usize = 2;

/// Blocks laid out as terminal lines for a given panel width.
#[derive(Debug, Default)]
pub struct DocLayout {
    pub lines: Vec<Line<'static>>,
    /// First line of each block.
    pub block_starts: Vec<usize>,
    pub width: usize,
}

impl DocLayout {
    pub fn build(blocks: &[Block], width: usize, marked_block: Option<usize>) -> Self {
        let text_width = width.saturating_sub(GUTTER).max(1);
        let mut layout = Self {
            width,
            ..Self::default()
        };
        for (index, block) in blocks.iter().enumerate() {
            layout.block_starts.push(layout.lines.len());
            let gutter = if Some(index) == marked_block { "» " } else { "  " };
            for (i, line) in block_lines(block, text_width).into_iter().enumerate() {
                let mut spans = vec![Span::styled(
                    if i == 0 { gutter } else { "  " },
                    Style::default().fg(Color::Yellow),
                )];
                spans.extend(line.spans);
                layout.lines.push(Line::from(spans));
            }
        }
        layout
    }

    /// First line of `block`, clamped to the end of the layout.
    pub fn line_of_block(&self, block: usize) -> usize {
        self.block_starts
            .get(block)
            .copied()
            .unwrap_or(self.lines.len())
    }

    /// The block shown on line `line`.
    pub fn block_at_line(&self, line: usize) -> Option<usize> {
        let after = self.block_starts.partition_point(|&start| start <= line);
        after.checked_sub(1)
    }
}

fn run_style(style: &RunStyle) -> Style {
    match style {
        RunStyle::Plain => Style::default(),
        RunStyle::Bold => Style::default().add_modifier(Modifier::BOLD),
        RunStyle::Italic => Style::default().add_modifier(Modifier::ITALIC),
        RunStyle::Code => Style::default().fg(Color::Yellow),
        RunStyle::Strikethrough => Style::default().add_modifier(Modifier::CROSSED_OUT),
        RunStyle::Link { .. } => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::UNDERLINED),
        RunStyle::Video { .. } => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::UNDERLINED),
        RunStyle::Highlight => Style::default().bg(Color::Yellow).fg(Color::Black),
    }
}

/// Lays out runs after `prefix`, breaking at embedded newlines and wrapping
/// at `width` terminal columns.
fn runs_lines(prefix: &str, runs: &[Run], base: Style, width: usize) -> Vec<Line<'static>> {
    let indent_width = prefix.width();
    let indent = " ".repeat(indent_width);
    let mut lines = Vec::new();
    let mut current = vec![Span::styled(prefix.to_string(), base)];
    let mut used = indent_width;

    for run in runs {
        let style = base.patch(run_style(&run.style));
        for (i, part) in run.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Line::from(std::mem::take(&mut current)));
                current.push(Span::raw(indent.clone()));
                used = indent_width;
            }
            let mut chunk = String::new();
            for ch in part.chars() {
                let ch_width = ch.width().unwrap_or(0);
                // A wide char that does not fit moves to the next line whole.
                if used + ch_width > width && used > indent_width {
                    current.push(Span::styled(std::mem::take(&mut chunk), style));
                    lines.push(Line::from(std::mem::take(&mut current)));
                    current.push(Span::raw(indent.clone()));
                    used = indent_width;
                }
                chunk.push(ch);
                used += ch_width;
            }
            if !chunk.is_empty() {
                current.push(Span::styled(chunk, style));
            }
        }
    }
    lines.push(Line::from(current));
    lines
}

fn plain_line(text: String, style: Style) -> Line<'static> {
    Line::from(Span::styled(text, style))
}

fn block_lines(block: &Block, width: usize) -> Vec<Line<'static>> {
    match &block.kind {
        BlockKind::Header { level, text } => {
            let style = Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
            let heading = [Run::plain(text.clone())];
            runs_lines(&format!("{} ", "#".repeat(usize::from(*level))), &heading, style, width)
        }
        BlockKind::Paragraph {
            runs,
            list_continuation,
        } => {
            let prefix = if *list_continuation { "  " } else { "" };
            runs_lines(prefix, runs, Style::default(), width)
        }
        BlockKind::ListItem { marker, runs } => {
            let prefix = match marker {
                ListMarker::Bullet => "• ".to_string(),
                ListMarker::Ordered(n) => format!("{n} "),
            };
            runs_lines(&prefix, runs, Style::default(), width)
        }
        BlockKind::TaskItem { checked, runs } => {
            let prefix = if *checked { "[x] " } else { "[ ] " };
            let style = if *checked {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            runs_lines(prefix, runs, style, width)
        }
        BlockKind::Blockquote { depth, runs } => runs_lines(
            &"│ ".repeat(usize::from(*depth)),
            runs,
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            width,
        ),
        BlockKind::CodeBlock { language, content } => {
            let fence = Style::default().fg(Color::DarkGray);
            let body = Style::default().fg(Color::Yellow);
            let mut lines = vec![plain_line(format!("```{language}"), fence)];
            lines.extend(content.split('\n').map(|l| plain_line(l.to_string(), body)));
            lines.push(plain_line("```".to_string(), fence));
            lines
        }
        BlockKind::Table {
            alignments, rows, ..
        } => table_lines(alignments, rows),
        BlockKind::Image { src, alt } => vec![plain_line(
            format!("[image: {alt}] {src}"),
            Style::default().fg(Color::Green),
        )],
        BlockKind::Video { src, alt } => vec![plain_line(
            format!("[video: {alt}] {src}"),
            Style::default().fg(Color::Magenta),
        )],
        BlockKind::Separator => vec![plain_line(
            "─".repeat(width),
            Style::default().fg(Color::DarkGray),
        )],
        BlockKind::Spacer => vec![Line::default()],
    }
}

fn cell_text(cell: &[Run]) -> String {
    cell.iter().map(|r| r.text.as_str()).collect()
}

/// Pads `text` to `width` display columns.
fn align(text: &str, width: usize, alignment: Alignment) -> String {
    let gap = width.saturating_sub(text.width());
    let (left, right) = match alignment {
        Alignment::Left => (0, gap),
        Alignment::Center => (gap / 2, gap - gap / 2),
        Alignment::Right => (gap, 0),
    };
    format!("{}{text}{}", " ".repeat(left), " ".repeat(right))
}

fn table_lines(alignments: &[Alignment], rows: &[Vec<Vec<Run>>]) -> Vec<Line<'static>> {
    let texts: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| cell_text(cell)).collect())
        .collect();
    let widths: Vec<usize> = (0..alignments.len())
        .map(|col| {
            texts
                .iter()
                .filter_map(|row| row.get(col))
                .map(|t| t.width())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(texts.len() + 1);
    for (i, row) in texts.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .zip(alignments.iter().zip(&widths))
            .map(|(text, (&alignment, &width))| align(text, width, alignment))
            .collect();
        let style = if i == 0 {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(plain_line(cells.join(" │ "), style));
        if i == 0 {
            let rule: Vec<String> = widths.iter().map(|&w| "─".repeat(w)).collect();
            lines.push(plain_line(
                rule.join("─┼─"),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    lines
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[1]);

    draw_search(f, app, rows[0]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[0]);
    draw_results(f, app, sidebar[0]);
    draw_outline(f, app, sidebar[1]);
    draw_document(f, app, chunks[1]);
    draw_help(f, app, rows[2]);
}

fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn draw_search(f: &mut Frame, app: &App, area: Rect) {
    let title = format!("Search ({})", app.mode_label());
    let input = Paragraph::new(app.query()).block(
        Panel::default()
            .borders(Borders::ALL)
            .border_style(border_style(app.focus() == Focus::Search))
            .title(title),
    );
    f.render_widget(input, area);
}

fn draw_results(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .result_labels()
        .into_iter()
        .map(|label| ListItem::new(Line::from(label)))
        .collect();
    let title = format!("Results ({})", items.len());
    let list = List::new(items)
        .block(
            Panel::default()
                .borders(Borders::ALL)
                .border_style(border_style(app.focus() == Focus::Results))
                .title(title),
        )
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(list, area, app.results_state());
}

fn draw_outline(f: &mut Frame, app: &App, area: Rect) {
    let active = app.active_heading_block();
    let items: Vec<ListItem> = app
        .viewer()
        .navigator()
        .headings()
        .iter()
        .map(|h| {
            let indent = "  ".repeat(usize::from(h.level.saturating_sub(1)));
            let style = if Some(h.block_index) == active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(format!("{indent}{}", h.text), style)))
        })
        .collect();
    let outline = List::new(items).block(Panel::default().borders(Borders::ALL).title("Outline"));
    f.render_widget(outline, area);
}

fn draw_document(f: &mut Frame, app: &mut App, area: Rect) {
    let inner_width = usize::from(area.width.saturating_sub(2));
    let inner_height = usize::from(area.height.saturating_sub(2));
    app.relayout(inner_width, inner_height);

    let title = app.document_title();
    let border = border_style(app.focus() == Focus::Document);
    let layout = app.layout();
    let text: Vec<Line> = if layout.lines.is_empty() {
        vec![Line::from("Select a document to view it")]
    } else {
        layout
            .lines
            .iter()
            .skip(app.scroll())
            .take(inner_height)
            .cloned()
            .collect()
    };

    let content = Paragraph::new(text).block(
        Panel::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title),
    );
    f.render_widget(content, area);
}

fn draw_help(f: &mut Frame, app: &App, area: Rect) {
    let line = match app.status() {
        Some(status) => Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(vec![
            Span::raw("q: Quit | /: Search | Tab: Mode | "),
            Span::raw("↑/↓: Move | Enter: Open | ←/→: Focus | "),
            Span::raw("n/N: Match | f: Follow link"),
        ]),
    };
    f.render_widget(Paragraph::new(line), area);
}
