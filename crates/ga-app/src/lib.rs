/// Front-end of glypha: CLI, one-shot pipeline and watch mode.

pub mod cli;
pub mod pipeline;
pub mod watch;
