//! Integration tests for the REPL driven by a scripted editor

use std::collections::VecDeque;

use fabula_foundation::Result;
use fabula_runtime::{LineEditor, Outcome, ReadResult, Repl};

use crate::greeting_session;

/// Replays fixed input lines, then reports end of input.
struct Script {
    lines: VecDeque<String>,
}

impl Script {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| (*l).to_string()).collect(),
        }
    }
}

impl LineEditor for Script {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadResult> {
        Ok(self.lines.pop_front().map_or(ReadResult::Eof, ReadResult::Line))
    }

    fn read_continuation(&mut self, prompt: &str) -> Result<ReadResult> {
        self.read_line(prompt)
    }

    fn add_history(&mut self, _line: &str) {}

    fn set_keywords(&mut self, _keywords: Vec<String>) {}
}

fn repl(lines: &[&str]) -> Repl<Script> {
    Repl::with_editor(Script::new(lines))
        .unwrap()
        .without_banner()
        .with_session(greeting_session(6))
}

#[test]
fn scripted_session_applies_settings() {
    let mut repl = repl(&[":count 3", ":origin line", ":gen", ":quit", ":count 9"]);
    repl.run().unwrap();

    let session = repl.session();
    assert_eq!(session.config().count, 3);
    assert_eq!(session.config().origin, "line");
    assert_eq!(session.generated().len(), 3);
}

#[test]
fn errors_do_not_stop_the_loop() {
    let mut repl = repl(&[":bogus", ":count zero", ":count 2"]);
    repl.run().unwrap();
    assert_eq!(repl.session().config().count, 2);
}

#[test]
fn open_actions_continue_on_the_next_line() {
    let mut repl = repl(&["[pet:", "owl]#pet#"]);
    repl.run().unwrap();
    assert!(repl.session().grammar().defines("pet"));
}

#[test]
fn seed_commands_round_trip() {
    let mut repl = repl(&[]);
    let Outcome::Output(text) = repl.eval(":seed 77").unwrap() else {
        panic!("expected output");
    };
    assert_eq!(text, "seed: 77 (locked)");

    let first = repl.eval(":gen").unwrap();
    let second = repl.eval(":gen").unwrap();
    assert_eq!(first, second);

    let Outcome::Output(text) = repl.eval(":lock").unwrap() else {
        panic!("expected output");
    };
    assert_eq!(text, "seed: 77 (unlocked)");
}

#[test]
fn step_command_walks_to_completion() {
    let mut repl = repl(&[]);
    let mut last = String::new();
    for _ in 0..200 {
        let Outcome::Output(text) = repl.eval(":step").unwrap() else {
            panic!("expected output");
        };
        let done = text.ends_with("(complete)");
        last = text;
        if done {
            break;
        }
    }
    assert!(last.ends_with("(complete)"));
    assert_eq!(repl.session().generated().len(), 1);
}
