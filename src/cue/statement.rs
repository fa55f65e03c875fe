use crate::cd::{pad_two_digits, to_time_code};
use crate::cue::models::{CueSheet, Index, Keyword, LineEnding, Session, Track};
use std::fmt::Display;

const TRACK_INDENT: &str = "  ";
const TRACK_FIELD_INDENT: &str = "    ";

/// One physical line of a cuesheet as a list of space separated tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statement {
    tokens: Vec<String>,
}

impl Statement {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    fn command(indent: &str, keyword: Keyword) -> Self {
        Self::new([format!("{indent}{keyword}")])
    }

    pub fn push(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    fn with(mut self, token: impl Into<String>) -> Self {
        self.push(token);
        self
    }

    fn with_optional(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.with(token),
            None => self,
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

pub trait ToStatements {
    fn to_statements(&self) -> Vec<Statement>;
}

/// Joins statements into text, terminating every line with `line_ending`.
pub fn render(statements: &[Statement], line_ending: LineEnding) -> String {
    let mut out = String::new();
    for statement in statements {
        out.push_str(&statement.to_string());
        out.push_str(line_ending.as_str());
    }
    out
}

fn file_statement(index: &Index) -> Option<Statement> {
    let path = index.file_path.as_deref()?;
    Some(
        Statement::command("", Keyword::File)
            .with(path)
            .with_optional(index.file_type.as_deref()),
    )
}

fn remark_statements(indent: &str, remarks: &[String], out: &mut Vec<Statement>) {
    out.extend(
        remarks
            .iter()
            .map(|remark| Statement::command(indent, Keyword::Rem).with(remark.as_str())),
    );
}

impl ToStatements for Session {
    fn to_statements(&self) -> Vec<Statement> {
        let mut out = Vec::new();

        remark_statements("", &self.remarks, &mut out);

        for (keyword, value) in [
            (Keyword::Catalog, &self.catalog),
            (Keyword::CdTextFile, &self.cd_text_file),
            (Keyword::Performer, &self.performer),
            (Keyword::Songwriter, &self.songwriter),
            (Keyword::Title, &self.title),
        ] {
            if let Some(value) = value {
                out.push(Statement::command("", keyword).with(value.as_str()));
            }
        }

        for track in &self.tracks {
            out.extend(track.to_statements());
        }

        out
    }
}

impl ToStatements for Track {
    fn to_statements(&self) -> Vec<Statement> {
        let mut out = Vec::new();

        if let Some(file) = self.first_index().and_then(file_statement) {
            out.push(file);
        }

        out.push(
            Statement::command(TRACK_INDENT, Keyword::Track)
                .with(pad_two_digits(self.number as i64))
                .with_optional(self.track_type.as_deref()),
        );

        if let Some(flags) = &self.flags {
            out.push(Statement::command(TRACK_FIELD_INDENT, Keyword::Flags).with(flags.as_str()));
        }

        remark_statements(TRACK_FIELD_INDENT, &self.remarks, &mut out);

        for (keyword, value) in [
            (Keyword::Isrc, &self.isrc),
            (Keyword::Title, &self.title),
            (Keyword::Performer, &self.performer),
            (Keyword::Songwriter, &self.songwriter),
        ] {
            if let Some(value) = value {
                out.push(Statement::command(TRACK_FIELD_INDENT, keyword).with(value.as_str()));
            }
        }

        if let Some(pregap) = self.pregap {
            out.push(Statement::command(TRACK_FIELD_INDENT, Keyword::Pregap).with(to_time_code(pregap)));
        }

        let last = self.indexes.len().saturating_sub(1);
        for (position, index) in self.indexes.iter().enumerate() {
            if let Some(file) = file_statement(index).filter(|_| position > 0) {
                out.push(file);
            }

            out.extend(index.to_statements());

            if position < last {
                remark_statements(TRACK_FIELD_INDENT, &index.remarks, &mut out);
            }
        }

        if let Some(postgap) = self.postgap {
            out.push(
                Statement::command(TRACK_FIELD_INDENT, Keyword::Postgap).with(to_time_code(postgap)),
            );
        }

        if let Some(index) = self.last_index() {
            remark_statements(TRACK_FIELD_INDENT, &index.remarks, &mut out);
        }

        out
    }
}

impl ToStatements for Index {
    /// Only the `INDEX` line itself; the owning track decides where the
    /// index's `FILE` and `REM` lines go.
    fn to_statements(&self) -> Vec<Statement> {
        vec![
            Statement::command(TRACK_FIELD_INDENT, Keyword::Index)
                .with(pad_two_digits(self.number as i64))
                .with(to_time_code(self.frame)),
        ]
    }
}

impl Session {
    pub fn render(&self, line_ending: LineEnding) -> String {
        render(&self.to_statements(), line_ending)
    }
}

impl CueSheet {
    pub fn render(&self) -> String {
        self.session.render(self.effective_line_ending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::models::Remarks;

    fn sample_session() -> Session {
        let mut first = Track::new(1, "AUDIO");
        first.flags = Some("DCP".to_string());
        first.isrc = Some("USRC17607839".to_string());
        first.title = Some("\"First Song\"".to_string());
        first.performer = Some("Someone".to_string());
        first.pregap = Some(150);
        first.add_remark("track remark");
        let mut index_zero = Index::new(0, 0).with_file("\"Disc One.wav\"", Some("WAVE".to_string()));
        index_zero.add_remark("between indexes");
        first.add_index(index_zero);
        let mut index_one = Index::new(1, 225);
        index_one.add_remark("after postgap");
        first.add_index(index_one);
        first.postgap = Some(75);

        let mut second = Track::new(2, "AUDIO");
        second.add_index(Index::new(1, 0).with_file("two.wav", Some("WAVE".to_string())));
        second.add_index(Index::new(2, 4500));

        Session {
            tracks: vec![first, second],
            catalog: Some("1234567890123".to_string()),
            cd_text_file: Some("cdtext.cdt".to_string()),
            performer: Some("\"Various Artists\"".to_string()),
            songwriter: None,
            title: Some("Compilation".to_string()),
            remarks: vec!["GENRE Rock".to_string(), "DATE 1999".to_string()],
        }
    }

    #[test]
    fn joins_tokens_with_single_spaces() {
        let statement = Statement::new(["  TRACK", "01", "AUDIO"]);
        assert_eq!(statement.to_string(), "  TRACK 01 AUDIO");
        assert_eq!(Statement::default().to_string(), "");
    }

    #[test]
    fn pushes_tokens_onto_the_end() {
        let mut statement = Statement::new(["FILE"]);
        statement.push("a.wav");
        statement.push("WAVE");
        assert_eq!(statement.to_string(), "FILE a.wav WAVE");
    }

    #[test]
    fn renders_session_in_canonical_order() {
        let expected = "\
REM GENRE Rock
REM DATE 1999
CATALOG 1234567890123
CDTEXTFILE cdtext.cdt
PERFORMER \"Various Artists\"
TITLE Compilation
FILE \"Disc One.wav\" WAVE
  TRACK 01 AUDIO
    FLAGS DCP
    REM track remark
    ISRC USRC17607839
    TITLE \"First Song\"
    PERFORMER Someone
    PREGAP 00:02:00
    INDEX 00 00:00:00
    REM between indexes
    INDEX 01 00:03:00
    POSTGAP 00:01:00
    REM after postgap
FILE two.wav WAVE
  TRACK 02 AUDIO
    INDEX 01 00:00:00
    INDEX 02 01:00:00
";
        assert_eq!(sample_session().render(LineEnding::Lf), expected);
    }

    #[test]
    fn postgap_renders_its_own_value() {
        let mut track = Track::new(1, "AUDIO");
        track.add_index(Index::new(1, 0));
        track.pregap = Some(75);
        track.postgap = Some(150);

        let lines: Vec<String> = track.to_statements().iter().map(ToString::to_string).collect();
        assert!(lines.contains(&"    PREGAP 00:01:00".to_string()));
        assert!(lines.contains(&"    POSTGAP 00:02:00".to_string()));
    }

    #[test]
    fn emits_file_before_later_index_with_its_own_file() {
        let mut track = Track::new(3, "AUDIO");
        track.add_index(Index::new(0, 0).with_file("a.wav", Some("WAVE".to_string())));
        track.add_index(Index::new(1, 0).with_file("b.wav", Some("WAVE".to_string())));

        assert_eq!(
            render(&track.to_statements(), LineEnding::Lf),
            "FILE a.wav WAVE\n  TRACK 03 AUDIO\n    INDEX 00 00:00:00\nFILE b.wav WAVE\n    INDEX 01 00:00:00\n"
        );
    }

    #[test]
    fn uses_requested_line_ending() {
        let mut session = Session::default();
        session.title = Some("X".to_string());
        session.add_remark("a");

        assert_eq!(session.render(LineEnding::Crlf), "REM a\r\nTITLE X\r\n");
        assert_eq!(session.render(LineEnding::Cr), "REM a\rTITLE X\r");
    }

    #[test]
    fn track_without_type_omits_the_token() {
        let track = Track {
            number: 7,
            ..Default::default()
        };
        assert_eq!(track.to_statements()[0].to_string(), "  TRACK 07");
    }
}
