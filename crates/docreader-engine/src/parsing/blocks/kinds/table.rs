use serde::Serialize;

/// Column alignment declared by a table separator row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// `:--` left, `--:` right, `:-:` center, `---` left.
    fn from_cell(cell: &str) -> Self {
        match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) if cell.len() > 1 => Self::Center,
            (_, true) => Self::Right,
            _ => Self::Left,
        }
    }
}

/// Pipe table syntax: header row, separator row, body rows.
pub struct Table;

impl Table {
    pub const PIPE: char = '|';

    /// A row line: trimmed text starts with a pipe.
    pub fn is_row(line: &str) -> bool {
        line.trim_start().starts_with(Self::PIPE)
    }

    /// Splits a row into trimmed cells, dropping the empty outer cells of a
    /// pipe-bounded line.
    pub fn split_cells(line: &str) -> Vec<&str> {
        let trimmed = line.trim();
        let parts: Vec<&str> = trimmed.split(Self::PIPE).collect();
        let start = usize::from(trimmed.starts_with(Self::PIPE));
        let end = if trimmed.ends_with(Self::PIPE) {
            parts.len() - 1
        } else {
            parts.len()
        };
        parts[start..end.max(start)].iter().map(|c| c.trim()).collect()
    }

    /// Parses a separator row such as `|:---|--:|` into column alignments.
    ///
    /// Every non-empty cell must be made of `-` and `:` (whitespace ignored)
    /// with at least one `-`. Returns `None` when the line is not a
    /// separator or declares no columns.
    pub fn parse_separator(line: &str) -> Option<Vec<Alignment>> {
        if !line.contains(Self::PIPE) {
            return None;
        }
        let mut alignments = Vec::new();
        for cell in Self::split_cells(line) {
            let compact: String = cell.chars().filter(|c| !c.is_whitespace()).collect();
            if compact.is_empty() {
                continue;
            }
            if !compact.contains('-') || !compact.chars().all(|c| c == '-' || c == ':') {
                return None;
            }
            alignments.push(Alignment::from_cell(&compact));
        }
        (!alignments.is_empty()).then_some(alignments)
    }
}

/// Rows collected while a table is open, with their source lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBuffer {
    pub alignments: Vec<Alignment>,
    pub rows: Vec<Vec<String>>,
    pub row_lines: Vec<usize>,
}

impl TableBuffer {
    pub fn new(alignments: Vec<Alignment>) -> Self {
        Self {
            alignments,
            rows: Vec::new(),
            row_lines: Vec::new(),
        }
    }

    /// Adds a row, padding or truncating it to the column count.
    pub fn push_row(&mut self, line: &str, index: usize) {
        let width = self.alignments.len();
        let mut cells: Vec<String> = Table::split_cells(line)
            .into_iter()
            .take(width)
            .map(str::to_string)
            .collect();
        cells.resize(width, String::new());
        self.rows.push(cells);
        self.row_lines.push(index);
    }

    pub fn first_line(&self) -> Option<usize> {
        self.row_lines.first().copied()
    }

    pub fn last_line(&self) -> Option<usize> {
        self.row_lines.last().copied()
    }
}
