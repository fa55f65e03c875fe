use crate::cd::parse_time_code;
use crate::cue::models::LineEnding;
use crate::cue::quote::QuoteMode;
use crate::edit::error::{EditError, EditResult};
use crate::edit::{Action, CdTextField, Scope};

/// Reads a list of actions from command line tokens. Keys are matched
/// case-insensitively; each key consumes as many following tokens as it
/// takes options.
pub fn parse_actions<I, S>(tokens: I) -> EditResult<Vec<Action>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tokens: Vec<S> = tokens.into_iter().collect();
    let mut tokens = tokens.iter().map(|token| token.as_ref());
    let mut actions = Vec::new();

    while let Some(key) = tokens.next() {
        let key = key.to_ascii_lowercase();
        let mut option = || {
            tokens
                .next()
                .ok_or_else(|| EditError::MissingArgument(key.clone()))
        };

        let action = match key.as_str() {
            "check" => Action::Check,
            "index-to-pregap" => Action::IndexToPregap,
            "pregap-to-index" => Action::PregapToIndex,
            "no-catalog" => Action::NoCatalog,
            "no-cdtext" => Action::NoCdText,
            "no-isrc" => Action::NoIsrc,
            "no-postgap" => Action::NoPostgap,
            "no-pregap" => Action::NoPregap,
            "no-rem" => Action::NoRem,
            "swap-authors" => Action::SwapAuthors,
            "set-eol" => {
                let value = option()?;
                Action::SetEol(LineEnding::parse_name(value).ok_or_else(|| invalid(&key, value))?)
            }
            "set-pregap" => Action::SetPregap(frames(&key, option()?)?),
            "set-postgap" => Action::SetPostgap(frames(&key, option()?)?),
            "shift-times" => Action::ShiftTimes(offset(&key, option()?)?),
            "quote" => {
                let value = option()?;
                let mode = match value.to_ascii_lowercase().as_str() {
                    "auto" => QuoteMode::Auto,
                    "force" => QuoteMode::Force,
                    _ => return Err(invalid(&key, value)),
                };
                Action::Quote(mode)
            }
            other => {
                let (verb, field, scope) =
                    cd_text_key(other).ok_or_else(|| EditError::UnknownAction(other.to_string()))?;
                if verb == "set" {
                    Action::Set(field, scope, option()?.to_string())
                } else {
                    Action::Unset(field, scope)
                }
            }
        };

        actions.push(action);
    }

    Ok(actions)
}

/// Splits keys like `set-session-title` or `no-performer`.
fn cd_text_key(key: &str) -> Option<(&str, CdTextField, Scope)> {
    let (verb, rest) = key.split_once('-')?;
    if verb != "set" && verb != "no" {
        return None;
    }

    let (scope, field) = match rest.split_once('-') {
        Some(("session", field)) => (Scope::Session, field),
        Some(("track", field)) => (Scope::Track, field),
        Some(_) => return None,
        None => (Scope::All, rest),
    };

    let field = match field {
        "performer" => CdTextField::Performer,
        "songwriter" => CdTextField::Songwriter,
        "title" => CdTextField::Title,
        _ => return None,
    };

    Some((verb, field, scope))
}

fn invalid(action: &str, value: &str) -> EditError {
    EditError::InvalidArgument {
        action: action.to_string(),
        value: value.to_string(),
    }
}

/// A plain frame count or an `mm:ss:ff` time code.
fn frames(action: &str, value: &str) -> EditResult<u32> {
    if value.contains(':') {
        parse_time_code(value).map_err(|_| invalid(action, value))
    } else {
        value.parse().map_err(|_| invalid(action, value))
    }
}

fn offset(action: &str, value: &str) -> EditResult<i64> {
    match value.strip_prefix('-') {
        Some(magnitude) => frames(action, magnitude)
            .map(|f| -i64::from(f))
            .map_err(|_| invalid(action, value)),
        None => frames(action, value).map(i64::from),
    }
}
