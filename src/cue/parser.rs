use crate::cd::parse_time_code;
use crate::cue::error::{
    CueError, CueResult, Diagnostic, ProblemKind, SESSION_SUBJECT, index_subject, track_subject,
};
use crate::cue::models::{CueSheet, Index, Keyword, LineEnding, Remarks, Session, Track};
use crate::cue::reader::LineReader;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use std::mem;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

lazy_static! {
    static ref TRACK_LINE: Regex = Regex::new(r"^TRACK ([0-9]{2})(?: (.+))?$").unwrap();
    static ref INDEX_LINE: Regex = Regex::new(r"^INDEX ([0-9]{2}) (\S+)$").unwrap();
    static ref GAP_LINE: Regex = Regex::new(r"^(?:PREGAP|POSTGAP) (\S+)$").unwrap();
}

type ParseResult<T> = Result<T, Diagnostic>;

/// State shared by the session, track and index scopes. `line` is the
/// current trimmed line; a scope that stops on a line it does not own leaves
/// it here for the enclosing scope.
struct ParseContext<'a> {
    reader: LineReader<'a>,
    line: Option<&'a str>,
    session: Session,
    pending_file: Option<&'a str>,
}

impl<'a> ParseContext<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            reader: LineReader::new(text),
            line: None,
            session: Session::default(),
            pending_file: None,
        }
    }

    fn advance(&mut self) -> Option<&'a str> {
        self.line = self.reader.next_line().map(str::trim);
        self.line
    }

    fn new_track(&self, line: &str) -> ParseResult<Track> {
        let captures = TRACK_LINE.captures(line).ok_or_else(|| {
            malformed(
                SESSION_SUBJECT,
                format!("TRACK must be followed by a two-digit number and a type: {line}"),
            )
        })?;

        Ok(Track {
            number: parse_number(&captures[1]),
            track_type: captures.get(2).map(|m| m.as_str().to_string()),
            ..Default::default()
        })
    }

    /// Builds an index from the current INDEX line, consuming the pending
    /// FILE reference if there is one.
    fn new_index(&mut self, track: u32, line: &str) -> ParseResult<Index> {
        let captures = INDEX_LINE.captures(line).ok_or_else(|| {
            malformed(
                track_subject(track),
                format!("INDEX must be followed by a two-digit number and a time code: {line}"),
            )
        })?;

        let number = parse_number(&captures[1]);
        let frame = parse_time_code(&captures[2]).map_err(|err| {
            Diagnostic::new(ProblemKind::InvalidTimeCode, index_subject(track, number), err)
        })?;

        let mut index = Index::new(number, frame);
        if let Some(reference) = self.pending_file.take() {
            let (path, file_type) = split_file_reference(reference);
            index.set_file(Some(path), file_type);
        }

        Ok(index)
    }
}

/// Splits a FILE argument on its last space into path and type. Paths may
/// contain spaces themselves, so only the last one separates the type.
fn split_file_reference(reference: &str) -> (String, Option<String>) {
    match reference.rfind(' ') {
        Some(position) => (
            reference[..position].to_string(),
            Some(reference[position + 1..].to_string()),
        ),
        None => (reference.to_string(), None),
    }
}

fn parse_number(digits: &str) -> u32 {
    // at most two ASCII digits by construction of the line patterns
    digits.bytes().fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

fn malformed(subject: impl Into<String>, problem: impl std::fmt::Display) -> Diagnostic {
    Diagnostic::new(ProblemKind::MalformedStatement, subject, problem)
}

fn keyword(subject: &str, line: &str) -> ParseResult<Keyword> {
    Keyword::of_line(line).ok_or_else(|| malformed(subject, format!("Unknown command: {line}")))
}

fn argument<'a>(subject: &str, keyword: Keyword, line: &'a str) -> ParseResult<&'a str> {
    line.strip_prefix(keyword.as_str())
        .and_then(|rest| rest.strip_prefix(' '))
        .filter(|argument| !argument.is_empty())
        .ok_or_else(|| malformed(subject, format!("{keyword} is missing its argument")))
}

fn remark(line: &str) -> &str {
    line.get(Keyword::Rem.as_str().len() + 1..).unwrap_or("")
}

fn time_argument(subject: &str, line: &str) -> ParseResult<u32> {
    let captures = GAP_LINE.captures(line).ok_or_else(|| {
        malformed(subject, format!("Expected a single time code argument: {line}"))
    })?;

    parse_time_code(&captures[1])
        .map_err(|err| Diagnostic::new(ProblemKind::InvalidTimeCode, subject, err))
}

/// Parses cuesheet text. The first line terminator found decides the sheet's
/// line ending; a leading byte-order mark is ignored.
pub fn parse_str(text: &str) -> CueResult<CueSheet> {
    let line_ending = LineEnding::detect(text);
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    let mut context = ParseContext::new(text);
    parse_session(&mut context).map_err(|diagnostic| CueError::Syntax {
        line: context.reader.line_number(),
        diagnostic,
    })?;

    if let Some(reference) = context.pending_file {
        warn!("FILE {reference} is not followed by an INDEX and was dropped");
    }

    debug!(
        "Parsed cuesheet with {} tracks over {} lines",
        context.session.tracks.len(),
        context.reader.line_number()
    );

    Ok(CueSheet {
        session: context.session,
        line_ending,
        ..Default::default()
    })
}

fn parse_session(c: &mut ParseContext) -> ParseResult<()> {
    while let Some(line) = c.advance() {
        if line.is_empty() {
            continue;
        }

        match keyword(SESSION_SUBJECT, line)? {
            Keyword::Track => return parse_tracks(c, line),
            Keyword::File => c.pending_file = Some(argument(SESSION_SUBJECT, Keyword::File, line)?),
            Keyword::Rem => c.session.add_remark(remark(line)),
            keyword @ (Keyword::Catalog
            | Keyword::CdTextFile
            | Keyword::Performer
            | Keyword::Songwriter
            | Keyword::Title) => {
                let value = Some(argument(SESSION_SUBJECT, keyword, line)?.to_string());
                match keyword {
                    Keyword::Catalog => c.session.catalog = value,
                    Keyword::CdTextFile => c.session.cd_text_file = value,
                    Keyword::Performer => c.session.performer = value,
                    Keyword::Songwriter => c.session.songwriter = value,
                    _ => c.session.title = value,
                }
            }
            keyword => {
                return Err(malformed(
                    SESSION_SUBJECT,
                    format!("{keyword} is not allowed before the first TRACK"),
                ));
            }
        }
    }

    Ok(())
}

/// Runs from the first TRACK line to the end of input.
fn parse_tracks(c: &mut ParseContext, first_line: &str) -> ParseResult<()> {
    let mut track = c.new_track(first_line)?;

    loop {
        let Some(line) = c.advance() else {
            break;
        };
        if line.is_empty() {
            continue;
        }

        let subject = track_subject(track.number);
        match keyword(&subject, line)? {
            Keyword::File => c.pending_file = Some(argument(&subject, Keyword::File, line)?),
            Keyword::Index => {
                parse_indexes(c, &mut track, line)?;
                let Some(line) = c.line else {
                    break;
                };
                let next = c.new_track(line)?;
                c.session.add_track(mem::replace(&mut track, next));
            }
            Keyword::Track => {
                let next = c.new_track(line)?;
                c.session.add_track(mem::replace(&mut track, next));
            }
            Keyword::Rem => track.add_remark(remark(line)),
            keyword => parse_track_field(c, &mut track, keyword, line)?,
        }
    }

    c.session.add_track(track);
    Ok(())
}

/// Runs from an INDEX line until the next TRACK line or the end of input,
/// leaving a TRACK line current for [`parse_tracks`].
fn parse_indexes(c: &mut ParseContext, track: &mut Track, first_line: &str) -> ParseResult<()> {
    let mut index = c.new_index(track.number, first_line)?;

    loop {
        let Some(line) = c.advance() else {
            break;
        };
        if line.is_empty() {
            continue;
        }

        let subject = index_subject(track.number, index.number);
        match keyword(&subject, line)? {
            Keyword::File => c.pending_file = Some(argument(&subject, Keyword::File, line)?),
            Keyword::Index => {
                let next = c.new_index(track.number, line)?;
                track.add_index(mem::replace(&mut index, next));
            }
            Keyword::Track => break,
            Keyword::Rem => index.add_remark(remark(line)),
            keyword => parse_track_field(c, track, keyword, line)?,
        }
    }

    track.add_index(index);
    Ok(())
}

/// Commands that belong to the current track wherever they appear in it.
fn parse_track_field(
    c: &mut ParseContext,
    track: &mut Track,
    keyword: Keyword,
    line: &str,
) -> ParseResult<()> {
    let subject = track_subject(track.number);

    match keyword {
        Keyword::Pregap => track.pregap = Some(time_argument(&subject, line)?),
        Keyword::Postgap => track.postgap = Some(time_argument(&subject, line)?),
        Keyword::Flags => track.flags = Some(argument(&subject, keyword, line)?.to_string()),
        Keyword::Isrc => track.isrc = Some(argument(&subject, keyword, line)?.to_string()),
        Keyword::Performer => {
            track.performer = Some(argument(&subject, keyword, line)?.to_string())
        }
        Keyword::Songwriter => {
            track.songwriter = Some(argument(&subject, keyword, line)?.to_string())
        }
        Keyword::Title => track.title = Some(argument(&subject, keyword, line)?.to_string()),
        Keyword::Catalog => {
            c.session.catalog = Some(argument(&subject, keyword, line)?.to_string())
        }
        Keyword::CdTextFile => {
            c.session.cd_text_file = Some(argument(&subject, keyword, line)?.to_string())
        }
        Keyword::File | Keyword::Index | Keyword::Rem | Keyword::Track => {
            return Err(malformed(subject, format!("Unexpected {keyword} line: {line}")));
        }
    }

    Ok(())
}
