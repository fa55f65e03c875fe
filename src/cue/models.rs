use crate::cue::error::{CueError, CueResult};
use std::fmt::Display;
use std::path::{Path, PathBuf};

pub const MIN_TRACK_NUMBER: u32 = 1;
pub const MAX_TRACK_NUMBER: u32 = 99;
pub const MIN_INDEX_NUMBER: u32 = 0;
pub const MAX_INDEX_NUMBER: u32 = 99;
pub const MAX_TRACKS: usize = (MAX_TRACK_NUMBER - MIN_TRACK_NUMBER + 1) as usize;
pub const MAX_INDEXES: usize = (MAX_INDEX_NUMBER - MIN_INDEX_NUMBER + 1) as usize;

const UTF8_BYTE_ORDER_MARK: [u8; 3] = [0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Catalog,
    CdTextFile,
    File,
    Flags,
    Index,
    Isrc,
    Performer,
    Postgap,
    Pregap,
    Rem,
    Songwriter,
    Title,
    Track,
}

impl Keyword {
    pub const ALL: [Keyword; 13] = [
        Keyword::Catalog,
        Keyword::CdTextFile,
        Keyword::File,
        Keyword::Flags,
        Keyword::Index,
        Keyword::Isrc,
        Keyword::Performer,
        Keyword::Postgap,
        Keyword::Pregap,
        Keyword::Rem,
        Keyword::Songwriter,
        Keyword::Title,
        Keyword::Track,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Keyword::Catalog => "CATALOG",
            Keyword::CdTextFile => "CDTEXTFILE",
            Keyword::File => "FILE",
            Keyword::Flags => "FLAGS",
            Keyword::Index => "INDEX",
            Keyword::Isrc => "ISRC",
            Keyword::Performer => "PERFORMER",
            Keyword::Postgap => "POSTGAP",
            Keyword::Pregap => "PREGAP",
            Keyword::Rem => "REM",
            Keyword::Songwriter => "SONGWRITER",
            Keyword::Title => "TITLE",
            Keyword::Track => "TRACK",
        }
    }

    /// Looks up the command a line starts with. Commands are case-sensitive.
    pub fn of_line(line: &str) -> Option<Keyword> {
        let command = line.split(' ').next()?;
        Keyword::ALL
            .into_iter()
            .find(|keyword| keyword.as_str() == command)
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnding {
    Crlf,
    Lf,
    Cr,
}

impl LineEnding {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "CRLF",
            LineEnding::Lf => "LF",
            LineEnding::Cr => "CR",
        }
    }

    pub const fn long_name(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "Carriage Return Line Feed",
            LineEnding::Lf => "Line Feed",
            LineEnding::Cr => "Carriage Return",
        }
    }

    pub const fn system_name(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "Windows",
            LineEnding::Lf => "Unix",
            LineEnding::Cr => "Macintosh",
        }
    }

    pub const fn native() -> Self {
        if cfg!(windows) {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        }
    }

    /// Returns the terminator of the first line in `text`, if any line is
    /// terminated at all.
    pub fn detect(text: &str) -> Option<Self> {
        let position = text.find(['\r', '\n'])?;
        match &text[position..] {
            rest if rest.starts_with("\r\n") => Some(LineEnding::Crlf),
            rest if rest.starts_with('\r') => Some(LineEnding::Cr),
            _ => Some(LineEnding::Lf),
        }
    }

    /// Matches the short, long or system name, ignoring case.
    pub fn parse_name(name: &str) -> Option<Self> {
        [LineEnding::Crlf, LineEnding::Lf, LineEnding::Cr]
            .into_iter()
            .find(|ending| {
                name.eq_ignore_ascii_case(ending.name())
                    || name.eq_ignore_ascii_case(ending.long_name())
                    || name.eq_ignore_ascii_case(ending.system_name())
            })
    }
}

impl Display for LineEnding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Charset {
    #[default]
    Utf8,
    Latin1,
}

impl Charset {
    /// Decodes `bytes` as UTF-8, falling back to Latin-1 which every byte
    /// sequence is valid in. A leading UTF-8 byte-order mark is dropped either
    /// way.
    pub fn decode(mut bytes: Vec<u8>) -> (String, Charset) {
        if bytes.starts_with(&UTF8_BYTE_ORDER_MARK) {
            bytes.drain(..UTF8_BYTE_ORDER_MARK.len());
        }

        match String::from_utf8(bytes) {
            Ok(text) => (text, Charset::Utf8),
            Err(err) => {
                let text = err.into_bytes().into_iter().map(char::from).collect();
                (text, Charset::Latin1)
            }
        }
    }

    pub fn encode(&self, text: &str) -> CueResult<Vec<u8>> {
        match self {
            Charset::Utf8 => Ok(text.as_bytes().to_vec()),
            Charset::Latin1 => text
                .chars()
                .map(|character| {
                    u8::try_from(character).map_err(|_| CueError::Unencodable {
                        character,
                        charset: *self,
                    })
                })
                .collect(),
        }
    }
}

impl Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Charset::Utf8 => f.write_str("UTF-8"),
            Charset::Latin1 => f.write_str("ISO-8859-1"),
        }
    }
}

/// Free-text remarks (`REM` lines) attached to a session, track or index.
pub trait Remarks {
    fn remarks(&self) -> &Vec<String>;

    fn remarks_mut(&mut self) -> &mut Vec<String>;

    fn add_remark(&mut self, remark: impl Into<String>) {
        self.remarks_mut().push(remark.into());
    }

    fn remove_last_remark(&mut self) -> Option<String> {
        self.remarks_mut().pop()
    }

    fn last_remark(&self) -> Option<&str> {
        self.remarks().last().map(String::as_str)
    }

    fn has_remarks(&self) -> bool {
        !self.remarks().is_empty()
    }

    fn clear_remarks(&mut self) {
        self.remarks_mut().clear();
    }
}

macro_rules! impl_remarks {
    ($($ty:ty),*) => {
        $(
            impl Remarks for $ty {
                fn remarks(&self) -> &Vec<String> {
                    &self.remarks
                }

                fn remarks_mut(&mut self) -> &mut Vec<String> {
                    &mut self.remarks
                }
            }
        )*
    };
}

impl_remarks!(Session, Track, Index);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueSheet {
    pub session: Session,
    pub path: Option<PathBuf>,
    pub charset: Charset,
    pub line_ending: Option<LineEnding>,
}

impl CueSheet {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            ..Default::default()
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.session.tracks
    }

    pub fn tracks_mut(&mut self) -> &mut Vec<Track> {
        &mut self.session.tracks
    }

    /// Directory that relative FILE and CDTEXTFILE references resolve against.
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Line ending used when writing, falling back to the platform default.
    pub fn effective_line_ending(&self) -> LineEnding {
        self.line_ending.unwrap_or_else(LineEnding::native)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub tracks: Vec<Track>,
    pub catalog: Option<String>,
    pub cd_text_file: Option<String>,
    pub performer: Option<String>,
    pub songwriter: Option<String>,
    pub title: Option<String>,
    pub remarks: Vec<String>,
}

impl Session {
    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn remove_last_track(&mut self) -> Option<Track> {
        self.tracks.pop()
    }

    pub fn track(&self, position: usize) -> Option<&Track> {
        self.tracks.get(position)
    }

    pub fn last_track(&self) -> Option<&Track> {
        self.tracks.last()
    }

    /// Last index of the last track, i.e. the latest cue point on the disc.
    pub fn last_index(&self) -> Option<&Index> {
        self.last_track().and_then(Track::last_index)
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn clear_cd_text(&mut self) {
        self.performer = None;
        self.songwriter = None;
        self.title = None;
    }

    pub fn for_each_text_field(&self, mut f: impl FnMut(Keyword, &str)) {
        for (keyword, value) in [
            (Keyword::Catalog, &self.catalog),
            (Keyword::CdTextFile, &self.cd_text_file),
            (Keyword::Performer, &self.performer),
            (Keyword::Songwriter, &self.songwriter),
            (Keyword::Title, &self.title),
        ] {
            if let Some(value) = value {
                f(keyword, value);
            }
        }
    }

    pub fn for_each_text_field_mut(&mut self, mut f: impl FnMut(Keyword, &mut Option<String>)) {
        f(Keyword::Catalog, &mut self.catalog);
        f(Keyword::CdTextFile, &mut self.cd_text_file);
        f(Keyword::Performer, &mut self.performer);
        f(Keyword::Songwriter, &mut self.songwriter);
        f(Keyword::Title, &mut self.title);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub number: u32,
    pub track_type: Option<String>,
    pub indexes: Vec<Index>,
    pub flags: Option<String>,
    pub isrc: Option<String>,
    pub performer: Option<String>,
    pub songwriter: Option<String>,
    pub title: Option<String>,
    pub pregap: Option<u32>,
    pub postgap: Option<u32>,
    pub remarks: Vec<String>,
}

impl Track {
    pub fn new(number: u32, track_type: impl Into<String>) -> Self {
        Self {
            number,
            track_type: Some(track_type.into()),
            ..Default::default()
        }
    }

    pub fn add_index(&mut self, index: Index) {
        self.indexes.push(index);
    }

    pub fn remove_last_index(&mut self) -> Option<Index> {
        self.indexes.pop()
    }

    pub fn index(&self, position: usize) -> Option<&Index> {
        self.indexes.get(position)
    }

    pub fn first_index(&self) -> Option<&Index> {
        self.indexes.first()
    }

    pub fn last_index(&self) -> Option<&Index> {
        self.indexes.last()
    }

    pub fn has_indexes(&self) -> bool {
        !self.indexes.is_empty()
    }

    pub fn unset_pregap(&mut self) {
        self.pregap = None;
    }

    pub fn unset_postgap(&mut self) {
        self.postgap = None;
    }

    pub fn clear_cd_text(&mut self) {
        self.isrc = None;
        self.performer = None;
        self.songwriter = None;
        self.title = None;
    }

    pub fn for_each_text_field(&self, mut f: impl FnMut(Keyword, &str)) {
        for (keyword, value) in [
            (Keyword::Performer, &self.performer),
            (Keyword::Songwriter, &self.songwriter),
            (Keyword::Title, &self.title),
        ] {
            if let Some(value) = value {
                f(keyword, value);
            }
        }
    }

    pub fn for_each_text_field_mut(&mut self, mut f: impl FnMut(Keyword, &mut Option<String>)) {
        f(Keyword::Performer, &mut self.performer);
        f(Keyword::Songwriter, &mut self.songwriter);
        f(Keyword::Title, &mut self.title);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    pub number: u32,
    pub frame: u32,
    pub file_path: Option<String>,
    pub file_type: Option<String>,
    pub remarks: Vec<String>,
}

impl Index {
    pub fn new(number: u32, frame: u32) -> Self {
        Self {
            number,
            frame,
            ..Default::default()
        }
    }

    pub fn with_file(mut self, file_path: impl Into<String>, file_type: Option<String>) -> Self {
        self.set_file(Some(file_path.into()), file_type);
        self
    }

    pub fn set_file(&mut self, file_path: Option<String>, file_type: Option<String>) {
        self.file_path = file_path;
        self.file_type = file_type;
    }

    pub fn has_file(&self) -> bool {
        self.file_path.is_some()
    }
}
