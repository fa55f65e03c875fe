pub mod cd;
pub mod commands;
pub mod cue;
pub mod edit;
pub mod error;
pub mod util;
