//! Reader for `.properties` key/value files.
//!
//! Supports the subset of the Java properties format that configuration files
//! actually use: `#`/`!` comments, `=`/`:`/whitespace separators, backslash
//! line continuation and the usual escapes (`\t`, `\n`, `\r`, `\f`, `\uXXXX`).

use crate::error::{Result, ShellError};
use std::collections::HashMap;
use std::path::Path;

/// Parsed key/value pairs of a properties file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: HashMap<String, String>,
}

impl Properties {
    /// Read and parse the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ShellError::Config {
            message: format!("Failed to read config file: {}", e),
            path: path.to_path_buf(),
            source: Some(e),
        })?;
        Ok(Self::parse(&text))
    }

    /// Parse properties text. Later duplicates of a key win.
    pub fn parse(text: &str) -> Self {
        let mut entries = HashMap::new();
        for line in logical_lines(text) {
            let (key, value) = split_entry(&line);
            entries.insert(unescape(key), unescape(value));
        }
        Self { entries }
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

/// Join continued physical lines and drop comments and blank lines.
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<String> = None;

    for raw in text.lines() {
        let trimmed = raw.trim_start();
        let mut line = match current.take() {
            Some(mut pending) => {
                pending.push_str(trimmed);
                pending
            }
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                trimmed.to_string()
            }
        };

        let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            line.pop();
            current = Some(line);
        } else {
            lines.push(line);
        }
    }

    // A continuation on the last line just ends the entry
    if let Some(pending) = current {
        lines.push(pending);
    }

    lines
}

/// Split a logical line into its raw (still escaped) key and value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut key_end = line.len();
    let mut escaped = false;
    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = idx;
                break;
            }
            c if c.is_whitespace() => {
                key_end = idx;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start();
    if let Some(stripped) = rest.strip_prefix(|c: char| c == '=' || c == ':') {
        rest = stripped.trim_start();
    }
    (key, rest)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('u');
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
