use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI for checking, editing and rewriting CD cuesheets.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Edit(EditCommand),
    Check(CheckCommand),
    Print(PrintCommand),
}

/// Runs a list of actions against a cuesheet and writes the result.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
#[command(
    long_about = "Runs a list of actions against a cuesheet and writes the result\n\nActions run in the order given. Available actions:\n  check, index-to-pregap, pregap-to-index, no-catalog, no-cdtext, no-isrc,\n  no-postgap, no-pregap, no-rem, swap-authors,\n  no-[session-|track-]performer, no-[session-|track-]songwriter, no-[session-|track-]title,\n  set-[session-|track-]performer <TEXT>, set-[session-|track-]songwriter <TEXT>,\n  set-[session-|track-]title <TEXT>, set-eol <CRLF|LF|CR>,\n  set-pregap <FRAMES|MM:SS:FF>, set-postgap <FRAMES|MM:SS:FF>,\n  shift-times <[-]FRAMES|[-]MM:SS:FF>, quote <AUTO|FORCE>\n\nNote: Without --output or --in-place the result is printed to stdout\nNegative time code offsets must follow a -- separator, e.g. `edit a.cue -- shift-times -00:02:00`"
)]
pub struct EditCommand {
    /// Input cuesheet path
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Actions and their options
    #[arg(value_name = "ACTION", allow_negative_numbers = true)]
    pub actions: Vec<String>,

    /// Output cuesheet path
    #[arg(long, short = 'o', value_name = "OUTPUT", conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        short = 'i',
        help = "overwrites the input cuesheet with the result",
        default_value = "false"
    )]
    pub in_place: bool,
}

/// Checks cuesheets for problems and reports them.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
pub struct CheckCommand {
    /// Cuesheet files or directories containing cuesheets
    #[arg(value_name = "PATH", required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(
        value_name = "RECURSIVE",
        long,
        short = 'R',
        help = "recursively searches directories for .cue files",
        default_value = "false"
    )]
    pub recursive: bool,
}

/// Parses a cuesheet and prints it in canonical form.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
pub struct PrintCommand {
    /// Input cuesheet path
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn edit_takes_trailing_actions() {
        let cli = Cli::parse_from([
            "qedit",
            "edit",
            "album.cue",
            "shift-times",
            "-150",
            "set-title",
            "New Title",
            "-o",
            "out.cue",
        ]);

        match cli.command {
            Commands::Edit(cmd) => {
                assert_eq!(cmd.input, PathBuf::from("album.cue"));
                assert_eq!(cmd.actions, vec!["shift-times", "-150", "set-title", "New Title"]);
                assert_eq!(cmd.output, Some(PathBuf::from("out.cue")));
                assert!(!cmd.in_place);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn check_takes_many_paths() {
        let cli = Cli::parse_from(["qedit", "check", "-R", "a.cue", "music"]);

        match cli.command {
            Commands::Check(cmd) => {
                assert!(cmd.recursive);
                assert_eq!(cmd.inputs, vec![PathBuf::from("a.cue"), PathBuf::from("music")]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn output_and_in_place_conflict() {
        let result = Cli::try_parse_from(["qedit", "edit", "a.cue", "-o", "b.cue", "-i"]);
        assert!(result.is_err());
    }
}
