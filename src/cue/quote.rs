const DOUBLE_QUOTE: char = '"';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteMode {
    /// Quote only values that contain a space.
    Auto,
    /// Quote every value.
    Force,
}

/// A value with a space must be fully enclosed in double quotes; a value
/// without one may be bare but must not carry a lone leading or trailing
/// quote.
pub fn is_properly_quoted(value: &str) -> bool {
    let starts = value.starts_with(DOUBLE_QUOTE);
    let ends = value.ends_with(DOUBLE_QUOTE);
    let enclosed = starts && ends && value.len() >= 2;

    enclosed || (!value.contains(' ') && !starts && !ends)
}

pub fn remove_quotes(value: &str) -> String {
    value.replace(DOUBLE_QUOTE, "")
}

pub fn quote(value: &str, mode: QuoteMode) -> String {
    let bare = remove_quotes(value);
    if mode == QuoteMode::Force || bare.contains(' ') {
        format!("{DOUBLE_QUOTE}{bare}{DOUBLE_QUOTE}")
    } else {
        bare
    }
}
