//! CLI module

pub mod commands;
pub mod terminal;

pub use terminal::TerminalSink;

pub fn run() -> anyhow::Result<()> {
    commands::run()
}
