use crate::cd::error::{TimeCodeError, TimeCodeResult};
use lazy_static::lazy_static;

pub mod error;

pub const FRAMES_PER_SECOND: u32 = 75;
pub const FRAMES_PER_MINUTE: u32 = FRAMES_PER_SECOND * 60;
/// 99:59:00, the last full second of a 99 minute disc.
pub const MAX_TIME_CODE: u32 = ((60 * 99) + 59) * FRAMES_PER_SECOND;

lazy_static! {
    static ref SECONDS_PER_FRAME: [f32; FRAMES_PER_SECOND as usize] = {
        let mut table = [0f32; FRAMES_PER_SECOND as usize];
        for (frame, seconds) in table.iter_mut().enumerate() {
            *seconds = frame as f32 / FRAMES_PER_SECOND as f32;
        }
        table
    };
}

/// Parses a `MM:SS:FF` time code into a frame count.
///
/// The minute field may be wider than two digits so that discs longer than
/// 99 minutes survive a round trip through [`to_time_code`].
pub fn parse_time_code(time_code: &str) -> TimeCodeResult<u32> {
    if time_code.len() < 8 {
        return Err(TimeCodeError::TooShort(time_code.to_string()));
    }

    let parts: Vec<&str> = time_code.split(':').collect();
    if parts.len() != 3
        || parts[0].len() < 2
        || parts[1].len() != 2
        || parts[2].len() != 2
        || !parts
            .iter()
            .all(|part| part.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(TimeCodeError::NotNumeric(time_code.to_string()));
    }

    let parse_field = |field: &str| {
        field
            .parse::<u32>()
            .map_err(|_| TimeCodeError::OutOfRange(time_code.to_string()))
    };

    let minutes = parse_field(parts[0])?;
    let seconds = parse_field(parts[1])?;
    let frames = parse_field(parts[2])?;

    if seconds >= 60 || frames >= FRAMES_PER_SECOND {
        return Err(TimeCodeError::OutOfRange(time_code.to_string()));
    }

    minutes
        .checked_mul(FRAMES_PER_MINUTE)
        .and_then(|total| total.checked_add(seconds * FRAMES_PER_SECOND + frames))
        .ok_or_else(|| TimeCodeError::OutOfRange(time_code.to_string()))
}

/// Formats a frame count as `MM:SS:FF`, every field at least two digits wide.
pub fn to_time_code(frame: u32) -> String {
    let minutes = frame / FRAMES_PER_MINUTE;
    let seconds = (frame % FRAMES_PER_MINUTE) / FRAMES_PER_SECOND;
    let frames = frame % FRAMES_PER_SECOND;

    format!(
        "{}:{}:{}",
        pad_two_digits(minutes as i64),
        pad_two_digits(seconds as i64),
        pad_two_digits(frames as i64)
    )
}

pub fn to_seconds(frame: u32) -> f32 {
    (frame / FRAMES_PER_SECOND) as f32 + SECONDS_PER_FRAME[(frame % FRAMES_PER_SECOND) as usize]
}

/// Renders a number with at least two digits, padding after the sign for
/// negative values (`-5` becomes `-05`).
pub fn pad_two_digits(number: i64) -> String {
    if number < 0 {
        format!("-{:02}", number.unsigned_abs())
    } else {
        format!("{number:02}")
    }
}
