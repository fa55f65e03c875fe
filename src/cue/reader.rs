/// Reads lines terminated by CRLF, LF or CR, keeping track of the 1-based
/// number of the line last returned.
#[derive(Debug, Clone)]
pub struct LineReader<'a> {
    rest: &'a str,
    line_number: usize,
}

impl<'a> LineReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            rest: text,
            line_number: 0,
        }
    }

    /// Number of the line most recently returned by [`Self::next_line`], 0
    /// before the first read.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn is_at_end(&self) -> bool {
        self.rest.is_empty()
    }

    pub fn next_line(&mut self) -> Option<&'a str> {
        if self.is_at_end() {
            return None;
        }

        self.line_number += 1;

        let (line, rest) = match self.rest.find(['\r', '\n']) {
            Some(end) => {
                let terminator = if self.rest[end..].starts_with("\r\n") {
                    2
                } else {
                    1
                };
                (&self.rest[..end], &self.rest[end + terminator..])
            }
            None => (self.rest, ""),
        };

        self.rest = rest;
        Some(line)
    }
}

impl<'a> Iterator for LineReader<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_every_kind_of_line_ending() {
        let lines: Vec<&str> = LineReader::new("a\r\nb\nc\rd").collect();
        assert_eq!(lines, ["a", "b", "c", "d"]);
    }

    #[test]
    fn keeps_blank_lines_but_not_a_trailing_terminator() {
        let lines: Vec<&str> = LineReader::new("a\n\nb\n").collect();
        assert_eq!(lines, ["a", "", "b"]);
    }

    #[test]
    fn counts_lines_from_one() {
        let mut reader = LineReader::new("first\nsecond");
        assert_eq!(reader.line_number(), 0);
        assert_eq!(reader.next_line(), Some("first"));
        assert_eq!(reader.line_number(), 1);
        assert!(!reader.is_at_end());
        assert_eq!(reader.next_line(), Some("second"));
        assert_eq!(reader.line_number(), 2);
        assert!(reader.is_at_end());
        assert_eq!(reader.next_line(), None);
        assert_eq!(reader.line_number(), 2);
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert_eq!(LineReader::new("").next_line(), None);
    }
}
