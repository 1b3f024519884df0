//! Integration tests for the shell session.
//!
//! These tests drive complete sessions over an in-memory store and check the
//! observable console behavior of each command form.

use docshell_core::{
    ConnectionManager, Document, DocumentStore, MemoryStore, Session, SessionSummary, Termination,
};
use std::io::Cursor;
use tempfile::TempDir;

/// Output of one session run.
struct Transcript {
    summary: SessionSummary,
    out: String,
    err: String,
}

/// Run `input` as a complete session against `connection`.
fn run_session(connection: &ConnectionManager, input: &str) -> Transcript {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let summary = Session::new(connection)
        .run(Cursor::new(input.to_string()), &mut out, &mut err)
        .expect("session should not fail");
    Transcript {
        summary,
        out: String::from_utf8(out).unwrap(),
        err: String::from_utf8(err).unwrap(),
    }
}

/// Document rows (JSON lines) of a transcript.
fn rows(out: &str) -> Vec<serde_json::Value> {
    out.lines()
        .filter(|line| line.starts_with('{'))
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn shop() -> ConnectionManager {
    ConnectionManager::from_store(MemoryStore::new("shop").with_databases(["admin", "local"]))
}

#[test]
fn test_dbs_lists_every_database() {
    let connection = shop();
    let transcript = run_session(&connection, "dbs\n");

    let mut listed: Vec<&str> = transcript
        .out
        .lines()
        .filter(|line| !line.starts_with(" -----"))
        .collect();
    listed.sort_unstable();
    assert_eq!(listed, ["admin", "local", "shop"]);
}

#[test]
fn test_any_other_single_token_lists_collections() {
    let connection = shop();
    let store = connection.store().unwrap();
    store.insert_one("orders", Document::new()).unwrap();
    store.insert_one("users", Document::new()).unwrap();

    let canonical = run_session(&connection, "collections\n");
    for token in ["orders", "size", "write", "HELPME", "x"] {
        let transcript = run_session(&connection, &format!("{}\n", token));
        assert_eq!(transcript.out, canonical.out, "token {:?}", token);
        assert_eq!(transcript.summary.failed, 0);
    }
}

#[test]
fn test_size_of_empty_collection_prints_zero() {
    let connection = shop();
    let transcript = run_session(&connection, "orders size\n");
    let lines: Vec<&str> = transcript.out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with(" ----- "));
    assert_eq!(lines[1], "0");
    assert!(lines[2].starts_with(" ----- end"));
    assert!(transcript.err.is_empty());
}

#[test]
fn test_size_matches_document_count() {
    let connection = shop();
    let transcript = run_session(
        &connection,
        "orders status open write\norders status closed write\norders size\n",
    );
    assert!(transcript.out.lines().any(|line| line == "2"));
}

#[test]
fn test_json_write_round_trips_through_scan() {
    let connection = shop();
    let transcript = run_session(
        &connection,
        "orders {\"item\":\"lamp\",\"qty\":3} write\norders all\n",
    );
    let docs = rows(&transcript.out);
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["item"], "lamp");
    assert_eq!(docs[0]["qty"], 3);
}

#[test]
fn test_equality_and_regex_queries() {
    let connection = shop();
    let transcript = run_session(
        &connection,
        "users name alice write\nusers name albert write\nusers name bob write\n\
         users name bob\nusers name ^al reg\n",
    );
    let docs = rows(&transcript.out);
    let names: Vec<&str> = docs.iter().map(|d| d["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["bob", "alice", "albert"]);
}

#[test]
fn test_delete_twice_with_one_match() {
    let connection = shop();
    let transcript = run_session(
        &connection,
        "orders id 7 write\norders id 7 delete\norders id 7 delete\norders size\n",
    );
    assert_eq!(
        transcript
            .out
            .matches(" ----- end delete with nothing deleted -----")
            .count(),
        1
    );
    assert_eq!(transcript.out.matches(" ----- end delete : {").count(), 1);
    assert!(transcript.out.lines().any(|line| line == "0"));
}

#[test]
fn test_only_exit_tokens_terminate() {
    let connection = shop();
    for token in ["q", "quit", "exit", "  exit  "] {
        let transcript = run_session(&connection, &format!("{}\norders size\n", token));
        assert_eq!(transcript.summary.termination, Termination::ExitToken);
        assert_eq!(transcript.summary.executed, 0);
    }

    let transcript = run_session(&connection, "Quit\nEXIT\nq!\nquit now\nexit exit exit\n");
    assert_eq!(transcript.summary.termination, Termination::EndOfInput);
    assert_eq!(transcript.summary.executed, 5);
}

#[test]
fn test_malformed_json_does_not_end_the_session() {
    let connection = shop();
    let transcript = run_session(
        &connection,
        "orders {\"item\": write\norders {\"item\":\"ok\"} write\norders all\n",
    );
    assert_eq!(transcript.summary.failed, 1);
    assert_eq!(transcript.summary.executed, 3);
    assert!(transcript.err.contains("JSON parse error"));
    assert_eq!(rows(&transcript.out).len(), 1);
}

#[test]
fn test_invalid_regex_is_reported() {
    let connection = shop();
    let transcript = run_session(&connection, "users name ( reg\nhelp\n");
    assert_eq!(transcript.summary.failed, 1);
    assert!(transcript.err.contains("Invalid regular expression"));
    assert!(transcript.out.contains("----------- usage ------------"));
}

#[test]
fn test_unsupported_arity_prints_usage() {
    let connection = shop();
    let transcript = run_session(&connection, "a b c d e\n");
    assert!(transcript.out.contains("----------- usage ------------"));
    assert_eq!(transcript.summary.failed, 0);
}

#[test]
fn test_session_from_config_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.properties");
    std::fs::write(&path, "dbconnection=mongodb://unused\ndbname=warehouse\n").unwrap();

    let mut connection =
        ConnectionManager::connect_with(&path, |config| Ok(MemoryStore::new(&config.database)))
            .unwrap();
    let transcript = run_session(&connection, "dbs\nq\n");
    assert!(transcript.out.lines().any(|line| line == "warehouse"));

    assert!(connection.close());
    assert!(!connection.close());
}
