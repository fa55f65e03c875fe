use crate::cd::pad_two_digits;
use crate::commands::EditCommand;
use crate::cue::models::{CueSheet, Index, Keyword, LineEnding, Remarks, Session, Track};
use crate::cue::quote::{QuoteMode, quote};
use crate::cue::{CueParser, write_cue_sheet};
use crate::edit::parse::parse_actions;
use crate::error::QEditResult;
use log::{debug, info, warn};
use std::fmt::Display;
use std::mem;

pub mod error;
pub mod parse;

/// Which part of the sheet a CD-Text action touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    Session,
    Track,
}

impl Scope {
    fn includes_session(&self) -> bool {
        *self != Scope::Track
    }

    fn includes_tracks(&self) -> bool {
        *self != Scope::Session
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdTextField {
    Performer,
    Songwriter,
    Title,
}

impl CdTextField {
    pub const fn keyword(&self) -> Keyword {
        match self {
            CdTextField::Performer => Keyword::Performer,
            CdTextField::Songwriter => Keyword::Songwriter,
            CdTextField::Title => Keyword::Title,
        }
    }

    fn of_session<'a>(&self, session: &'a mut Session) -> &'a mut Option<String> {
        match self {
            CdTextField::Performer => &mut session.performer,
            CdTextField::Songwriter => &mut session.songwriter,
            CdTextField::Title => &mut session.title,
        }
    }

    fn of_track<'a>(&self, track: &'a mut Track) -> &'a mut Option<String> {
        match self {
            CdTextField::Performer => &mut track.performer,
            CdTextField::Songwriter => &mut track.songwriter,
            CdTextField::Title => &mut track.title,
        }
    }
}

/// One step of an edit pipeline. Actions never fail once constructed; bad
/// input is rejected while parsing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Check,
    IndexToPregap,
    PregapToIndex,
    NoCatalog,
    NoCdText,
    NoIsrc,
    NoPostgap,
    NoPregap,
    NoRem,
    Unset(CdTextField, Scope),
    Set(CdTextField, Scope, String),
    SetEol(LineEnding),
    SetPregap(u32),
    SetPostgap(u32),
    ShiftTimes(i64),
    SwapAuthors,
    Quote(QuoteMode),
}

impl Action {
    pub fn run(&self, sheet: &mut CueSheet) {
        debug!("Running action {self}");

        match self {
            Action::Check => check(sheet),
            Action::IndexToPregap => sheet.tracks_mut().iter_mut().for_each(index_to_pregap),
            Action::PregapToIndex => sheet.tracks_mut().iter_mut().for_each(pregap_to_index),
            Action::NoCatalog => sheet.session.catalog = None,
            Action::NoCdText => {
                sheet.session.clear_cd_text();
                sheet.tracks_mut().iter_mut().for_each(Track::clear_cd_text);
            }
            Action::NoIsrc => sheet.tracks_mut().iter_mut().for_each(|t| t.isrc = None),
            Action::NoPostgap => sheet.tracks_mut().iter_mut().for_each(Track::unset_postgap),
            Action::NoPregap => sheet.tracks_mut().iter_mut().for_each(Track::unset_pregap),
            Action::NoRem => no_rem(&mut sheet.session),
            Action::Unset(field, scope) => set_cd_text(&mut sheet.session, *field, *scope, None),
            Action::Set(field, scope, value) => {
                set_cd_text(&mut sheet.session, *field, *scope, Some(value))
            }
            Action::SetEol(line_ending) => sheet.line_ending = Some(*line_ending),
            Action::SetPregap(frames) => {
                sheet.tracks_mut().iter_mut().for_each(|t| t.pregap = Some(*frames))
            }
            Action::SetPostgap(frames) => {
                sheet.tracks_mut().iter_mut().for_each(|t| t.postgap = Some(*frames))
            }
            Action::ShiftTimes(offset) => shift_times(&mut sheet.session, *offset),
            Action::SwapAuthors => swap_authors(&mut sheet.session),
            Action::Quote(mode) => quote_all(&mut sheet.session, *mode),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Check => write!(f, "check"),
            Action::IndexToPregap => write!(f, "index-to-pregap"),
            Action::PregapToIndex => write!(f, "pregap-to-index"),
            Action::NoCatalog => write!(f, "no-catalog"),
            Action::NoCdText => write!(f, "no-cdtext"),
            Action::NoIsrc => write!(f, "no-isrc"),
            Action::NoPostgap => write!(f, "no-postgap"),
            Action::NoPregap => write!(f, "no-pregap"),
            Action::NoRem => write!(f, "no-rem"),
            Action::Unset(field, scope) => write_scoped(f, "no", field, scope),
            Action::Set(field, scope, value) => {
                write_scoped(f, "set", field, scope)?;
                write!(f, " {value}")
            }
            Action::SetEol(line_ending) => write!(f, "set-eol {line_ending}"),
            Action::SetPregap(frames) => write!(f, "set-pregap {frames}"),
            Action::SetPostgap(frames) => write!(f, "set-postgap {frames}"),
            Action::ShiftTimes(offset) => write!(f, "shift-times {offset}"),
            Action::SwapAuthors => write!(f, "swap-authors"),
            Action::Quote(QuoteMode::Auto) => write!(f, "quote auto"),
            Action::Quote(QuoteMode::Force) => write!(f, "quote force"),
        }
    }
}

fn write_scoped(
    f: &mut std::fmt::Formatter<'_>,
    verb: &str,
    field: &CdTextField,
    scope: &Scope,
) -> std::fmt::Result {
    let field = field.keyword().as_str().to_ascii_lowercase();
    match scope {
        Scope::All => write!(f, "{verb}-{field}"),
        Scope::Session => write!(f, "{verb}-session-{field}"),
        Scope::Track => write!(f, "{verb}-track-{field}"),
    }
}

/// Runs every action in order against the sheet.
pub fn run_actions(actions: &[Action], sheet: &mut CueSheet) {
    for action in actions {
        action.run(sheet);
    }
}

/// Parses the input, runs the command's actions and writes the result to the
/// chosen destination, or to stdout when there is none.
pub async fn edit_cue_sheet(cmd: EditCommand) -> QEditResult<()> {
    let actions = parse_actions(&cmd.actions)?;
    let mut cue_sheet = CueParser::new(&cmd.input).parse().await?;

    info!("Running {} actions on {:?}", actions.len(), cmd.input);
    run_actions(&actions, &mut cue_sheet);

    let output = if cmd.in_place {
        Some(cmd.input)
    } else {
        cmd.output
    };

    match output {
        Some(path) => {
            write_cue_sheet(&cue_sheet, &path).await?;
            info!("Wrote {:?}", path);
        }
        None => print!("{}", cue_sheet.render()),
    }

    Ok(())
}

fn check(sheet: &CueSheet) {
    let diagnostics = sheet.validate();
    if diagnostics.is_empty() {
        info!("No problems found");
    }

    for diagnostic in diagnostics {
        warn!("{diagnostic}");
        info!("  {}", diagnostic.remedy);
    }
}

/// Folds the span between INDEX 00 and INDEX 01 into the PREGAP when both
/// indexes live in the same file.
fn index_to_pregap(track: &mut Track) {
    let (Some(first), Some(second)) = (track.index(0), track.index(1)) else {
        return;
    };
    if first.number != 0 || second.number != 1 || second.has_file() || second.frame <= first.frame {
        return;
    }

    let frames = second.frame - first.frame;
    // an existing PREGAP grows by the INDEX 00 span instead of blocking the move
    track.pregap = Some(track.pregap.unwrap_or(0).saturating_add(frames));

    let removed = track.indexes.remove(0);
    track.indexes[0].set_file(removed.file_path, removed.file_type);

    debug!(
        "TRACK {}: moved INDEX 00 into a PREGAP of {frames} frames",
        pad_two_digits(track.number as i64)
    );
}

/// Moves the PREGAP into the file as INDEX 00, extending an existing
/// INDEX 00 backwards or creating one before INDEX 01.
fn pregap_to_index(track: &mut Track) {
    let Some(pregap) = track.pregap else {
        return;
    };
    let Some(first) = track.indexes.first_mut() else {
        return;
    };

    let frame = i64::from(first.frame) - i64::from(pregap);
    match first.number {
        0 => {
            if frame < 0 {
                first.frame = 0;
                track.pregap = Some(frame.unsigned_abs() as u32);
            } else {
                first.frame = frame as u32;
                track.unset_pregap();
            }
        }
        1 if frame >= 0 => {
            let mut index_zero = Index::new(0, frame as u32);
            index_zero.set_file(first.file_path.take(), first.file_type.take());
            track.indexes.insert(0, index_zero);
            track.unset_pregap();
        }
        _ => {}
    }
}

fn no_rem(session: &mut Session) {
    session.clear_remarks();
    for track in &mut session.tracks {
        track.clear_remarks();
        track.indexes.iter_mut().for_each(Index::clear_remarks);
    }
}

fn set_cd_text(session: &mut Session, field: CdTextField, scope: Scope, value: Option<&String>) {
    if scope.includes_session() {
        *field.of_session(session) = value.cloned();
    }
    if scope.includes_tracks() {
        for track in &mut session.tracks {
            *field.of_track(track) = value.cloned();
        }
    }
}

/// Shifts every INDEX by `offset` frames, clamping at 00:00:00. An offset of
/// zero moves the first INDEX of the disc to 00:00:00.
fn shift_times(session: &mut Session, offset: i64) {
    let offset = match session.track(0).and_then(Track::first_index) {
        Some(first) if offset == 0 => -i64::from(first.frame),
        _ => offset,
    };

    for index in session.tracks.iter_mut().flat_map(|t| t.indexes.iter_mut()) {
        index.frame = (i64::from(index.frame) + offset).clamp(0, i64::from(u32::MAX)) as u32;
    }
}

fn swap_authors(session: &mut Session) {
    mem::swap(&mut session.performer, &mut session.songwriter);
    for track in &mut session.tracks {
        mem::swap(&mut track.performer, &mut track.songwriter);
    }
}

/// CATALOG is left alone: it never holds spaces and quoting it would make it
/// invalid.
fn quote_all(session: &mut Session, mode: QuoteMode) {
    let requote = |keyword: Keyword, value: &mut Option<String>| {
        if keyword == Keyword::Catalog {
            return;
        }
        if let Some(value) = value {
            *value = quote(value, mode);
        }
    };

    session.for_each_text_field_mut(requote);
    for track in &mut session.tracks {
        track.for_each_text_field_mut(requote);
        for index in &mut track.indexes {
            if let Some(path) = &mut index.file_path {
                *path = quote(path, mode);
            }
        }
    }
}
