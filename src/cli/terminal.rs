//! Plain-text presentation sink

use std::io::{self, Write};

use chrono::Local;

use crate::monitor::PresentationSink;
use crate::session::models::{ActivityRecord, SessionSnapshot};

/// Prints the status panel to stdout and problems to stderr
#[derive(Debug, Default)]
pub struct TerminalSink;

impl TerminalSink {
    pub fn new() -> Self {
        Self
    }
}

/// Lines for one activity entry
pub fn format_activity(record: &ActivityRecord) -> Vec<String> {
    let mut lines = vec![if record.state.is_empty() {
        format!("  - {}", record.name)
    } else {
        format!("  - {} [{}]", record.name, record.state)
    }];

    if let Some(tool) = &record.tool_output {
        lines.push(format!("    {}:", tool.tool_name));
        lines.extend(tool.output.trim_end().lines().map(|l| format!("      {}", l)));
    }

    lines
}

/// One-line summary of a session
pub fn format_status(snapshot: &SessionSnapshot) -> String {
    let title = if snapshot.title.is_empty() {
        "(untitled)"
    } else {
        snapshot.title.as_str()
    };
    let state = if snapshot.state.is_empty() {
        "UNKNOWN"
    } else {
        snapshot.state.as_str()
    };
    format!("{} - {} [{}]", snapshot.name, title, state)
}

impl PresentationSink for TerminalSink {
    fn show_loading(&self, session_id: &str) {
        println!("Fetching status for {}...", session_id);
    }

    fn show_status(&self, snapshot: &SessionSnapshot) {
        println!("[{}] {}", Local::now().format("%H:%M:%S"), format_status(snapshot));
    }

    fn show_activities(&self, records: &[ActivityRecord]) {
        let mut out = io::stdout().lock();
        if records.is_empty() {
            let _ = writeln!(out, "  (no activities)");
            return;
        }
        for line in records.iter().flat_map(format_activity) {
            let _ = writeln!(out, "{}", line);
        }
    }

    fn show_error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }

    fn show_validation_message(&self, message: &str) {
        eprintln!("{}", message);
    }
}
