/// Fenced code block delimiter knowledge.
///
/// A fence line opens a code block when none is open and closes the open one
/// otherwise; the text after an opening fence is the language tag.
pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";

    /// If `line` is a fence, returns the trimmed text after the backticks.
    pub fn info(line: &str) -> Option<&str> {
        line.trim_start()
            .strip_prefix(Self::BACKTICKS)
            .map(str::trim)
    }

    /// Joins accumulated body lines, dropping the single trailing newline.
    pub fn content(body: &[String]) -> String {
        body.join("\n")
    }
}
