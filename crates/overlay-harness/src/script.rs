//! JSON-lines script format.
//!
//! One entry per line:
//!
//! ```text
//! {"call": {"method": "create", "args": {...}}}
//! {"touch": {"phase": "down", "x": 10, "y": 10, "source": "touchscreen"}}
//! {"lifecycle": "pause"}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::io::BufRead;

use overlay_webview::{Command, TouchEvent};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptEntry {
    Call(Command),
    Touch(TouchEvent),
    Lifecycle(LifecycleStep),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStep {
    Pause,
    Resume,
    Destroy,
}

/// One script line, parsed or not.
#[derive(Debug)]
pub struct ScriptLine {
    /// 1-based line number in the source.
    pub number: usize,
    pub entry: Result<ScriptEntry, String>,
}

/// Parse a single line. `None` for lines that carry no entry.
pub fn parse_line(line: &str) -> Option<Result<ScriptEntry, String>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(serde_json::from_str(line).map_err(|e| e.to_string()))
}

/// Read every entry from `input`. I/O errors end the read.
pub fn read_script(input: impl BufRead) -> std::io::Result<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if let Some(entry) = parse_line(&line) {
            lines.push(ScriptLine {
                number: index + 1,
                entry,
            });
        }
    }
    Ok(lines)
}
