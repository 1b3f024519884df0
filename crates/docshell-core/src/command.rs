//! Command grammar for the interactive shell.
//!
//! A line is trimmed and split on single spaces. The number of tokens picks
//! the operation family and a keyword in a fixed position picks the member of
//! that family:
//!
//! | Tokens | Keyword                      | Command           |
//! |--------|------------------------------|-------------------|
//! | 1      | `help` (any case)            | [`Command::Help`] |
//! | 1      | `dbs`                        | [`Command::ListDatabases`] |
//! | 1      | anything else                | [`Command::ListCollections`] |
//! | 2      | 2nd is `size`                | [`Command::Count`] |
//! | 2      | anything else                | [`Command::ScanAll`] |
//! | 3      | 3rd is `write` (any case)    | [`Command::WriteJson`] |
//! | 3      | anything else                | [`Command::FindEq`] |
//! | 4      | 4th is `write` (any case)    | [`Command::WriteKeyValue`] |
//! | 4      | 4th is `delete` (any case)   | [`Command::DeleteOne`] |
//! | 4      | anything else                | [`Command::FindRegex`] |
//! | other  |                              | [`Command::Usage`] |
//!
//! Consecutive spaces produce empty tokens, which count towards the arity.

use std::fmt;

/// Lines that end the session, compared after trimming.
pub const EXIT_TOKENS: [&str; 3] = ["q", "quit", "exit"];

/// Usage block printed by `help` and by lines with an unsupported arity.
pub const USAGE: &str = "\
----------- usage ------------
Start: docshell [config.properties]
1. list dbs:                          dbs
2. list collections:                  collections
3. query collection size:             <collection> size
4. query collection all:              <collection> all
5. query collection by key-value:     <collection> <key> <value>
6. query collection by regex pattern: <collection> <key> <pattern> reg
7. write key-value to collection:     <collection> <key> <value> write
8. write json to collection:          <collection> <json> write
9. delete one by key-value:           <collection> <key> <value> delete
10. quit:                             q (or quit, exit)
----------- end ------------";

/// One classified input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// An exit token; the session ends.
    Exit,
    /// Nothing but whitespace; ignored.
    Blank,
    Command(Command),
}

/// Database operation selected by a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    ListDatabases,
    /// Fallback for every other single token. The token itself is dropped.
    ListCollections,
    Count {
        collection: String,
    },
    ScanAll {
        collection: String,
    },
    WriteJson {
        collection: String,
        json: String,
    },
    FindEq {
        collection: String,
        field: String,
        value: String,
    },
    WriteKeyValue {
        collection: String,
        field: String,
        value: String,
    },
    DeleteOne {
        collection: String,
        field: String,
        value: String,
    },
    /// Fallback for four tokens whose last token is neither `write` nor
    /// `delete`. The last token is not inspected.
    FindRegex {
        collection: String,
        field: String,
        pattern: String,
    },
    /// Unsupported arity.
    Usage {
        token_count: usize,
    },
}

impl Command {
    /// Stable operation name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::ListDatabases => "list_databases",
            Command::ListCollections => "list_collections",
            Command::Count { .. } => "count",
            Command::ScanAll { .. } => "scan_all",
            Command::WriteJson { .. } => "write_json",
            Command::FindEq { .. } => "find_eq",
            Command::WriteKeyValue { .. } => "write_key_value",
            Command::DeleteOne { .. } => "delete_one",
            Command::FindRegex { .. } => "find_regex",
            Command::Usage { .. } => "usage",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Help | Command::ListDatabases | Command::ListCollections => {
                write!(f, "{}", self.name())
            }
            Command::Count { collection } | Command::ScanAll { collection } => {
                write!(f, "{}({})", self.name(), collection)
            }
            Command::WriteJson { collection, json } => {
                write!(f, "{}({}, {})", self.name(), collection, json)
            }
            Command::FindEq {
                collection,
                field,
                value,
            }
            | Command::WriteKeyValue {
                collection,
                field,
                value,
            }
            | Command::DeleteOne {
                collection,
                field,
                value,
            } => write!(f, "{}({}, {}, {})", self.name(), collection, field, value),
            Command::FindRegex {
                collection,
                field,
                pattern,
            } => write!(f, "{}({}, {}, {})", self.name(), collection, field, pattern),
            Command::Usage { token_count } => write!(f, "{}({} tokens)", self.name(), token_count),
        }
    }
}

/// Whether a line is one of the exit tokens.
pub fn is_exit(line: &str) -> bool {
    let line = line.trim();
    EXIT_TOKENS.iter().any(|token| *token == line)
}

/// Classify one input line.
pub fn parse_line(line: &str) -> Input {
    let line = line.trim();
    if is_exit(line) {
        return Input::Exit;
    }
    if line.is_empty() {
        return Input::Blank;
    }

    let tokens: Vec<&str> = line.split(' ').collect();
    Input::Command(classify(&tokens))
}

fn classify(tokens: &[&str]) -> Command {
    let owned = |idx: usize| tokens[idx].to_string();

    match tokens {
        [only] => {
            let only = only.trim();
            if only.eq_ignore_ascii_case("help") {
                Command::Help
            } else if only == "dbs" {
                Command::ListDatabases
            } else {
                Command::ListCollections
            }
        }
        [collection, keyword] => {
            if keyword.trim() == "size" {
                Command::Count {
                    collection: collection.to_string(),
                }
            } else {
                Command::ScanAll {
                    collection: collection.to_string(),
                }
            }
        }
        [_, _, keyword] => {
            if keyword.eq_ignore_ascii_case("write") {
                Command::WriteJson {
                    collection: owned(0),
                    json: owned(1),
                }
            } else {
                Command::FindEq {
                    collection: owned(0),
                    field: owned(1),
                    value: owned(2),
                }
            }
        }
        [_, _, _, keyword] => {
            if keyword.eq_ignore_ascii_case("write") {
                Command::WriteKeyValue {
                    collection: owned(0),
                    field: owned(1),
                    value: owned(2),
                }
            } else if keyword.eq_ignore_ascii_case("delete") {
                Command::DeleteOne {
                    collection: owned(0),
                    field: owned(1),
                    value: owned(2),
                }
            } else {
                Command::FindRegex {
                    collection: owned(0),
                    field: owned(1),
                    pattern: owned(2),
                }
            }
        }
        _ => Command::Usage {
            token_count: tokens.len(),
        },
    }
}
