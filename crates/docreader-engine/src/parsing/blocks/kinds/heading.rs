/// ATX heading (`# Title`).
pub struct Heading;

impl Heading {
    pub const MARKER: char = '#';
    pub const MAX_LEVEL: usize = 6;

    /// Returns `(level, text)` for a heading line.
    ///
    /// Leading whitespace is ignored and no space is required after the
    /// markers. More than six markers is not a heading.
    pub fn detect(line: &str) -> Option<(u8, &str)> {
        let t = line.trim_start();
        let level = t.chars().take_while(|&c| c == Self::MARKER).count();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        // '#' is one byte, so `level` is also the byte offset.
        Some((level as u8, t[level..].trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("# Title", 1, "Title")]
    #[case("### Deep  ", 3, "Deep")]
    #[case("  ## Indented", 2, "Indented")]
    #[case("###### Six", 6, "Six")]
    #[case("#tight", 1, "tight")]
    #[case("#", 1, "")]
    fn headings(#[case] line: &str, #[case] level: u8, #[case] text: &str) {
        assert_eq!(Heading::detect(line), Some((level, text)));
    }

    #[test]
    fn seven_markers_is_not_a_heading() {
        assert_eq!(Heading::detect("####### too deep"), None);
    }

    #[test]
    fn plain_text_is_not_a_heading() {
        assert_eq!(Heading::detect("C# rocks"), None);
    }
}
