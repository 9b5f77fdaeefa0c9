//! CLI commands for adopr

pub mod run;
pub mod style;
