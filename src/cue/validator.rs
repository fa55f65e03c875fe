use crate::cd::to_time_code;
use crate::cue::error::{Diagnostic, ProblemKind, SESSION_SUBJECT, index_subject, track_subject};
use crate::cue::models::{
    CueSheet, Index, Keyword, MAX_INDEX_NUMBER, MAX_INDEXES, MAX_TRACK_NUMBER, MAX_TRACKS,
    MIN_TRACK_NUMBER, Session, Track,
};
use crate::cue::quote::{is_properly_quoted, remove_quotes};
use std::path::Path;

const CATALOG_LENGTH: usize = 13;
const ISRC_LENGTH: usize = 12;
const ISRC_PREFIX_LENGTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    Missing,
    Directory,
    File,
}

/// Answers whether a referenced media file exists.
pub trait PathProbe {
    fn probe(&self, path: &Path) -> PathStatus;
}

/// Probes the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

impl PathProbe for FsProbe {
    fn probe(&self, path: &Path) -> PathStatus {
        match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => PathStatus::Directory,
            Ok(_) => PathStatus::File,
            Err(_) => PathStatus::Missing,
        }
    }
}

/// Checks a session and every file it references relative to `base_dir`,
/// returning all findings rather than stopping at the first.
pub fn validate(session: &Session, base_dir: &Path) -> Vec<Diagnostic> {
    validate_with(session, base_dir, &FsProbe)
}

pub fn validate_with(session: &Session, base_dir: &Path, probe: &impl PathProbe) -> Vec<Diagnostic> {
    let mut out = check_session(session);
    out.extend(check_tracks(session));

    let mut previous: Option<(u32, &Index)> = None;
    for track in &session.tracks {
        out.extend(check_indexes(track, previous));
        if let Some(last) = track.last_index() {
            previous = Some((track.number, last));
        }
    }

    out.extend(check_referenced_files(session, base_dir, probe));
    out
}

impl CueSheet {
    /// Validates against the directory the sheet was read from.
    pub fn validate(&self) -> Vec<Diagnostic> {
        validate(&self.session, &self.base_dir())
    }
}

fn quotation_problem(subject: &str, field: impl std::fmt::Display) -> Diagnostic {
    Diagnostic::new(
        ProblemKind::UnbalancedQuotation,
        subject,
        format!("{field} is not properly enclosed in quotation marks (\")"),
    )
}

fn numbering_problem(subject: impl Into<String>, problem: &str) -> Diagnostic {
    Diagnostic::new(ProblemKind::MissingOrInconsistentNumbering, subject, problem)
}

fn is_valid_catalog(catalog: &str) -> bool {
    catalog.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_valid_isrc(isrc: &str) -> bool {
    isrc.chars().enumerate().all(|(position, c)| {
        if position < ISRC_PREFIX_LENGTH {
            c.is_ascii_alphanumeric()
        } else {
            c.is_ascii_digit()
        }
    })
}

pub fn check_session(session: &Session) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    session.for_each_text_field(|keyword, value| {
        if !is_properly_quoted(value) {
            out.push(quotation_problem(SESSION_SUBJECT, keyword));
        }
    });

    if let Some(catalog) = &session.catalog {
        if catalog.chars().count() != CATALOG_LENGTH {
            out.push(Diagnostic::new(
                ProblemKind::InvalidCatalog,
                SESSION_SUBJECT,
                "CATALOG is not 13 characters long",
            ));
        } else if !is_valid_catalog(catalog) {
            out.push(Diagnostic::new(
                ProblemKind::InvalidCatalog,
                SESSION_SUBJECT,
                "CATALOG format is invalid",
            ));
        }
    }

    out
}

pub fn check_tracks(session: &Session) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    if !session.has_tracks() {
        out.push(numbering_problem(SESSION_SUBJECT, "No TRACKs"));
    }
    if session.tracks.len() > MAX_TRACKS {
        out.push(numbering_problem(SESSION_SUBJECT, "Too many TRACKs"));
    }

    let mut expected = MIN_TRACK_NUMBER - 1;
    for track in &session.tracks {
        let subject = track_subject(track.number);

        if !(MIN_TRACK_NUMBER..=MAX_TRACK_NUMBER).contains(&track.number) {
            out.push(numbering_problem(subject.as_str(), "Invalid number"));
        }

        expected += 1;
        if track.number != expected {
            out.push(numbering_problem(track_subject(expected), "Missing or inconsistent"));
        }

        if let Some(isrc) = &track.isrc {
            if isrc.chars().count() != ISRC_LENGTH {
                out.push(Diagnostic::new(
                    ProblemKind::InvalidIsrc,
                    subject.as_str(),
                    "ISRC is not 12 characters long",
                ));
            } else if !is_valid_isrc(isrc) {
                out.push(Diagnostic::new(
                    ProblemKind::InvalidIsrc,
                    subject.as_str(),
                    "ISRC format is invalid",
                ));
            }
        }

        track.for_each_text_field(|keyword, value| {
            if !is_properly_quoted(value) {
                out.push(quotation_problem(&subject, keyword));
            }
        });
    }

    out
}

/// Checks one track's indexes. `previous` is the number of the preceding
/// track together with its last index, so time codes are compared across
/// track boundaries too.
pub fn check_indexes<'a>(
    track: &'a Track,
    mut previous: Option<(u32, &'a Index)>,
) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let track_number = track.number;

    if !track.has_indexes() {
        out.push(numbering_problem(track_subject(track_number), "No INDEXes"));
    }
    if track.indexes.len() > MAX_INDEXES {
        out.push(numbering_problem(track_subject(track_number), "Too many INDEXes"));
    }

    let mut expected: Option<u32> = None;
    for index in &track.indexes {
        let subject = index_subject(track_number, index.number);

        if index.file_path.as_deref().is_some_and(|path| !is_properly_quoted(path)) {
            out.push(quotation_problem(&subject, Keyword::File));
        }

        if index.number > MAX_INDEX_NUMBER {
            out.push(numbering_problem(subject.as_str(), "Invalid number"));
        }

        match expected {
            None => {
                // the first index is 00 or 01, and a lone 00 leaves 01 missing
                if index.number > 1 || (index.number == 0 && track.indexes.len() == 1) {
                    out.push(numbering_problem(subject.as_str(), "Missing or inconsistent"));
                }
                expected = Some(index.number);
            }
            Some(last) => {
                let next = last + 1;
                if index.number != next {
                    out.push(numbering_problem(
                        index_subject(track_number, next),
                        "Missing or inconsistent",
                    ));
                }
                expected = Some(next);
            }
        }

        let went_backwards = previous.filter(|(_, previous_index)| {
            !index.has_file() && index.frame < previous_index.frame
        });
        if let Some((previous_track, previous_index)) = went_backwards {
            out.push(Diagnostic::new(
                ProblemKind::OutOfOrderTimeCode,
                subject.as_str(),
                format!(
                    "Time code {} is less than {} of {}",
                    to_time_code(index.frame),
                    to_time_code(previous_index.frame),
                    index_subject(previous_track, previous_index.number)
                ),
            ));
        }

        previous = Some((track_number, index));
    }

    out
}

fn check_referenced_file(
    subject: &str,
    keyword: Keyword,
    reference: &str,
    base_dir: &Path,
    probe: &impl PathProbe,
) -> Option<Diagnostic> {
    let file = remove_quotes(reference);
    let (kind, description) = match probe.probe(&base_dir.join(&file)) {
        PathStatus::File => return None,
        PathStatus::Missing => (ProblemKind::ReferencedFileMissing, "does not exist"),
        PathStatus::Directory => (ProblemKind::ReferencedPathIsDirectory, "is a directory"),
    };

    Some(Diagnostic::new(
        kind,
        subject,
        format!("{keyword} \"{file}\" {description}"),
    ))
}

pub fn check_referenced_files(
    session: &Session,
    base_dir: &Path,
    probe: &impl PathProbe,
) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    if let Some(file) = &session.cd_text_file {
        out.extend(check_referenced_file(
            SESSION_SUBJECT,
            Keyword::CdTextFile,
            file,
            base_dir,
            probe,
        ));
    }

    for track in &session.tracks {
        for index in &track.indexes {
            if let Some(file) = &index.file_path {
                out.extend(check_referenced_file(
                    &index_subject(track.number, index.number),
                    Keyword::File,
                    file,
                    base_dir,
                    probe,
                ));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::parser::parse_str;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[derive(Default)]
    struct FakeProbe {
        entries: HashMap<PathBuf, PathStatus>,
    }

    impl FakeProbe {
        fn with(mut self, path: &str, status: PathStatus) -> Self {
            self.entries.insert(Path::new("disc").join(path), status);
            self
        }
    }

    impl PathProbe for FakeProbe {
        fn probe(&self, path: &Path) -> PathStatus {
            self.entries
                .get(path)
                .copied()
                .unwrap_or(PathStatus::Missing)
        }
    }

    fn check(session: &Session) -> Vec<Diagnostic> {
        validate_with(session, Path::new("disc"), &FakeProbe::default())
    }

    fn kinds(diagnostics: &[Diagnostic]) -> Vec<ProblemKind> {
        diagnostics.iter().map(|d| d.kind).collect()
    }

    fn track(number: u32, indexes: &[(u32, u32)]) -> Track {
        let mut track = Track::new(number, "AUDIO");
        for &(index, frame) in indexes {
            track.add_index(Index::new(index, frame));
        }
        track
    }

    fn session(tracks: Vec<Track>) -> Session {
        Session {
            tracks,
            ..Default::default()
        }
    }

    #[test]
    fn minimal_sheet_is_clean() {
        let sheet = parse_str("TRACK 01 AUDIO\n  INDEX 01 00:00:00\n").unwrap();
        assert_eq!(check(&sheet.session), vec![]);
    }

    #[test]
    fn reports_exactly_the_missing_track() {
        let diagnostics = check(&session(vec![
            track(1, &[(1, 0)]),
            track(2, &[(1, 100)]),
            track(4, &[(1, 200)]),
        ]));

        assert_eq!(kinds(&diagnostics), vec![ProblemKind::MissingOrInconsistentNumbering]);
        assert_eq!(diagnostics[0].subject, "TRACK 03");
    }

    #[test]
    fn contiguous_tracks_have_no_numbering_findings() {
        let diagnostics = check(&session(vec![
            track(1, &[(1, 0)]),
            track(2, &[(1, 100)]),
            track(3, &[(1, 200)]),
        ]));

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn reports_empty_session_and_out_of_range_track() {
        assert_eq!(
            kinds(&check(&Session::default())),
            vec![ProblemKind::MissingOrInconsistentNumbering]
        );

        let diagnostics = check(&session(vec![track(0, &[(1, 0)])]));
        let subjects: Vec<&str> = diagnostics.iter().map(|d| d.subject.as_str()).collect();
        assert_eq!(subjects, ["TRACK 00", "TRACK 01"]);
    }

    #[test]
    fn reports_short_catalog() {
        let mut session = session(vec![track(1, &[(1, 0)])]);
        session.catalog = Some("12345".to_string());

        let diagnostics = check(&session);
        assert_eq!(kinds(&diagnostics), vec![ProblemKind::InvalidCatalog]);
        assert_eq!(diagnostics[0].subject, "Session");
    }

    #[test]
    fn reports_non_alphanumeric_catalog() {
        let mut session = session(vec![track(1, &[(1, 0)])]);
        session.catalog = Some("123456789012-".to_string());

        assert_eq!(kinds(&check(&session)), vec![ProblemKind::InvalidCatalog]);
    }

    #[test]
    fn reports_malformed_isrc() {
        let mut first = track(1, &[(1, 0)]);
        first.isrc = Some("ABCDE1234XYZ".to_string());

        let diagnostics = check(&session(vec![first]));
        assert_eq!(kinds(&diagnostics), vec![ProblemKind::InvalidIsrc]);
        assert_eq!(diagnostics[0].subject, "TRACK 01");
    }

    #[test]
    fn accepts_well_formed_isrc_and_rejects_wrong_length() {
        let mut first = track(1, &[(1, 0)]);
        first.isrc = Some("USRC17607839".to_string());
        assert!(check(&session(vec![first.clone()])).is_empty());

        first.isrc = Some("USRC1760783".to_string());
        assert_eq!(kinds(&check(&session(vec![first]))), vec![ProblemKind::InvalidIsrc]);
    }

    #[test]
    fn reports_unbalanced_quotation() {
        let mut first = track(1, &[(1, 0)]);
        first.title = Some("\"Open quote".to_string());
        let mut session = session(vec![first]);
        session.performer = Some("Two Words".to_string());

        let diagnostics = check(&session);
        assert_eq!(
            kinds(&diagnostics),
            vec![ProblemKind::UnbalancedQuotation, ProblemKind::UnbalancedQuotation]
        );
        assert_eq!(diagnostics[0].subject, "Session");
        assert!(diagnostics[0].problem.starts_with("PERFORMER"));
        assert_eq!(diagnostics[1].subject, "TRACK 01");
        assert!(diagnostics[1].problem.starts_with("TITLE"));
    }

    #[test]
    fn index_numbering_rules() {
        // first index must be 00 or 01
        let diagnostics = check(&session(vec![track(1, &[(2, 0)])]));
        assert_eq!(kinds(&diagnostics), vec![ProblemKind::MissingOrInconsistentNumbering]);
        assert_eq!(diagnostics[0].subject, "TRACK 01 INDEX 02");

        // a lone index 00
        let diagnostics = check(&session(vec![track(1, &[(0, 0)])]));
        assert_eq!(diagnostics[0].subject, "TRACK 01 INDEX 00");

        // gap between indexes
        let diagnostics = check(&session(vec![track(1, &[(0, 0), (1, 10), (3, 20)])]));
        assert_eq!(kinds(&diagnostics), vec![ProblemKind::MissingOrInconsistentNumbering]);
        assert_eq!(diagnostics[0].subject, "TRACK 01 INDEX 02");

        // no indexes at all
        let diagnostics = check(&session(vec![track(1, &[])]));
        assert_eq!(diagnostics[0].subject, "TRACK 01");
    }

    #[test]
    fn reports_time_going_backwards_across_tracks() {
        let diagnostics = check(&session(vec![
            track(1, &[(1, 0), (2, 500)]),
            track(2, &[(1, 400)]),
        ]));

        assert_eq!(kinds(&diagnostics), vec![ProblemKind::OutOfOrderTimeCode]);
        assert_eq!(diagnostics[0].subject, "TRACK 02 INDEX 01");
        assert!(diagnostics[0].problem.contains("TRACK 01 INDEX 02"));
    }

    #[test]
    fn index_pass_carries_the_previous_index_forward() {
        let first = track(1, &[(1, 0), (2, 500)]);
        let second = track(2, &[(1, 600), (2, 550)]);

        let diagnostics = check_indexes(&second, first.last_index().map(|index| (1, index)));

        assert_eq!(kinds(&diagnostics), vec![ProblemKind::OutOfOrderTimeCode]);
        assert_eq!(diagnostics[0].subject, "TRACK 02 INDEX 02");
        assert!(diagnostics[0].problem.contains("TRACK 02 INDEX 01"));
        assert!(check_indexes(&first, None).is_empty());
    }

    #[test]
    fn new_file_resets_the_time_base() {
        let mut second = track(2, &[]);
        second.add_index(Index::new(1, 0).with_file("b.wav", Some("WAVE".to_string())));
        let mut first = track(1, &[]);
        first.add_index(Index::new(1, 0).with_file("a.wav", Some("WAVE".to_string())));
        first.add_index(Index::new(2, 9000));

        let probe = FakeProbe::default()
            .with("a.wav", PathStatus::File)
            .with("b.wav", PathStatus::File);
        let diagnostics = validate_with(&session(vec![first, second]), Path::new("disc"), &probe);

        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn reports_missing_referenced_file() {
        let sheet = parse_str("FILE \"missing.wav\" WAVE\nTRACK 01 AUDIO\nINDEX 01 00:00:00\n").unwrap();

        let diagnostics = check(&sheet.session);
        assert_eq!(kinds(&diagnostics), vec![ProblemKind::ReferencedFileMissing]);
        assert_eq!(diagnostics[0].subject, "TRACK 01 INDEX 01");
        assert_eq!(diagnostics[0].problem, "FILE \"missing.wav\" does not exist");
    }

    #[test]
    fn reports_referenced_directory() {
        let mut session = session(vec![track(1, &[(1, 0)])]);
        session.cd_text_file = Some("\"cd text\"".to_string());

        let probe = FakeProbe::default().with("cd text", PathStatus::Directory);
        let diagnostics = validate_with(&session, Path::new("disc"), &probe);

        assert_eq!(kinds(&diagnostics), vec![ProblemKind::ReferencedPathIsDirectory]);
        assert_eq!(diagnostics[0].subject, "Session");
    }

    #[test]
    fn accumulates_every_finding() {
        let mut first = track(1, &[(2, 0)]);
        first.isrc = Some("bad".to_string());
        let mut session = session(vec![first, track(3, &[(1, 10)])]);
        session.catalog = Some("x".to_string());

        assert_eq!(
            kinds(&check(&session)),
            vec![
                ProblemKind::InvalidCatalog,
                ProblemKind::InvalidIsrc,
                ProblemKind::MissingOrInconsistentNumbering,
                ProblemKind::MissingOrInconsistentNumbering,
            ]
        );
    }

    #[test]
    fn filesystem_probe_classifies_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.wav"), b"RIFF").unwrap();
        std::fs::create_dir(dir.path().join("folder")).unwrap();

        assert_eq!(FsProbe.probe(&dir.path().join("a.wav")), PathStatus::File);
        assert_eq!(FsProbe.probe(&dir.path().join("folder")), PathStatus::Directory);
        assert_eq!(FsProbe.probe(&dir.path().join("nope.wav")), PathStatus::Missing);
    }

    #[test]
    fn cue_sheet_validates_relative_to_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("disc.wav"), b"RIFF").unwrap();

        let mut sheet = parse_str("FILE disc.wav WAVE\nTRACK 01 AUDIO\nINDEX 01 00:00:00\n").unwrap();
        sheet.path = Some(dir.path().join("disc.cue"));

        assert!(sheet.validate().is_empty());
    }
}
