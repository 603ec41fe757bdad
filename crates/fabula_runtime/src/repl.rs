//! The interactive REPL.
//!
//! Lines starting with `:` are commands; anything else is expanded as a rule
//! against the session's grammar.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

use fabula_debug::{TraceOutput, render_tree, sample, snapshot, snapshot_symbol};
use fabula_engine::ExpansionTree;
use fabula_foundation::{Error, ErrorKind, Result};
use fabula_language::{parse, parsed_sections_to_text};

use crate::editor::{LineEditor, ReadResult, RustylineEditor, is_complete};
use crate::session::Session;

/// Commands understood by the REPL.
pub const COMMANDS: &[&str] = &[
    ":load", ":gen", ":origin", ":count", ":seed", ":lock", ":reroll", ":step", ":symbols",
    ":trace", ":dist", ":parse", ":help", ":quit",
];

/// Runs used by `:dist` when no count is given.
const DEFAULT_SAMPLE_RUNS: usize = 100;

/// What evaluating one input produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Text to print.
    Output(String),
    /// Nothing to print.
    Silent,
    /// Leave the REPL.
    Quit,
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    editor: E,
    session: Session,
    show_banner: bool,
    prompt: String,
    continuation_prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a REPL with the rustyline editor and a default session.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor or session fails to initialize.
    pub fn new() -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Self::with_editor(editor)
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a REPL with the given editor and a default session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session fails to initialize.
    pub fn with_editor(editor: E) -> Result<Self> {
        Ok(Self {
            editor,
            session: Session::new()?,
            show_banner: true,
            prompt: "fabula> ".to_string(),
            continuation_prompt: "   ...> ".to_string(),
        })
    }

    /// Replaces the session.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = session;
        self.refresh_keywords();
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub const fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the primary prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns the session.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the session mutably.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Runs the REPL loop until `:quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            match self.read_eval_print() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => self.print_error(&e),
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// One read-eval-print iteration. Returns `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let Some(input) = self.read_input()? else {
            return Ok(false);
        };

        if input.trim().is_empty() {
            return Ok(true);
        }
        self.editor.add_history(&input);

        match self.eval(&input) {
            Ok(Outcome::Output(text)) => println!("{text}"),
            Ok(Outcome::Silent) => {}
            Ok(Outcome::Quit) => return Ok(false),
            Err(e) => self.print_error(&e),
        }
        Ok(true)
    }

    /// Reads one input, joining continuation lines while a tag or action is
    /// open.
    fn read_input(&mut self) -> Result<Option<String>> {
        let mut input = match self.editor.read_line(&self.prompt)? {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted => {
                println!();
                return Ok(Some(String::new()));
            }
            ReadResult::Eof => return Ok(None),
        };

        while !is_complete(&input) {
            match self.editor.read_continuation(&self.continuation_prompt)? {
                ReadResult::Line(line) => {
                    input.push('\n');
                    input.push_str(&line);
                }
                ReadResult::Interrupted => {
                    println!("\nInput cancelled.");
                    return Ok(Some(String::new()));
                }
                ReadResult::Eof => {
                    return Err(Error::new(ErrorKind::Internal(
                        "unexpected EOF in multi-line input".to_string(),
                    )));
                }
            }
        }
        Ok(Some(input))
    }

    /// Evaluates one input.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown commands, bad command arguments, and
    /// fatal expansion errors.
    pub fn eval(&mut self, input: &str) -> Result<Outcome> {
        let trimmed = input.trim();
        if let Some(command) = trimmed.strip_prefix(':') {
            let (name, arg) = match command.split_once(char::is_whitespace) {
                Some((name, arg)) => (name, arg.trim()),
                None => (command, ""),
            };
            return self.eval_command(name, arg);
        }

        let before = self.session.tracer().generation();
        let tree = self.session.expand(input)?;
        let text = self.describe(&[tree], before);
        if text.is_empty() {
            return Ok(Outcome::Silent);
        }
        Ok(Outcome::Output(text))
    }

    fn eval_command(&mut self, name: &str, arg: &str) -> Result<Outcome> {
        match name {
            "load" => {
                let count = self.load_file(required(name, arg)?)?;
                Ok(Outcome::Output(format!("loaded {count} symbols from {arg}")))
            }
            "gen" => {
                let before = self.session.tracer().generation();
                self.session.generate()?;
                let text = self.describe(self.session.generated(), before);
                Ok(Outcome::Output(text))
            }
            "reroll" => {
                let before = self.session.tracer().generation();
                self.session.reroll()?;
                let mut text = self.describe(self.session.generated(), before);
                let _ = write!(text, "\n(seed {})", self.session.seed());
                Ok(Outcome::Output(text))
            }
            "origin" => {
                if !arg.is_empty() {
                    self.session.set_origin(arg);
                }
                Ok(Outcome::Output(format!(
                    "origin: {}",
                    self.session.config().origin
                )))
            }
            "count" => {
                if !arg.is_empty() {
                    self.session.set_count(parse_number("count", arg)?)?;
                }
                Ok(Outcome::Output(format!(
                    "count: {}",
                    self.session.config().count
                )))
            }
            "seed" => {
                if !arg.is_empty() {
                    self.session.set_seed(parse_number("seed", arg)?);
                }
                Ok(Outcome::Output(self.seed_status()))
            }
            "lock" => {
                let locked = !self.session.is_seed_locked();
                self.session.set_seed_locked(locked);
                Ok(Outcome::Output(self.seed_status()))
            }
            "step" => self.step(),
            "symbols" => self.symbols(arg),
            "trace" => self.trace(arg),
            "dist" => {
                let runs = if arg.is_empty() {
                    DEFAULT_SAMPLE_RUNS
                } else {
                    parse_number("runs", arg)?
                };
                let rule = self.session.origin_rule();
                let report = sample(self.session.grammar_mut(), &rule, runs)?;
                Ok(Outcome::Output(report.to_string().trim_end().to_string()))
            }
            "parse" => Ok(Outcome::Output(parsed_sections_to_text(&parse(arg)))),
            "help" => Ok(Outcome::Output(HELP.trim_end().to_string())),
            "quit" | "q" => Ok(Outcome::Quit),
            other => Err(Error::new(ErrorKind::Internal(format!(
                "unknown command :{other} (try :help)"
            )))),
        }
    }

    /// Starts step mode, or expands one more node if already stepping.
    fn step(&mut self) -> Result<Outcome> {
        let stepping = self
            .session
            .stepping()
            .is_some_and(|tree| !tree.is_complete());

        let tree = if stepping {
            self.session.step()?;
            self.session.stepping()
        } else {
            Some(self.session.start_stepping()?)
        };

        let mut out = tree.map(render_tree).unwrap_or_default();
        if self.session.stepping().is_some_and(ExpansionTree::is_complete) {
            out.push_str("(complete)");
        }
        Ok(Outcome::Output(out.trim_end().to_string()))
    }

    fn symbols(&self, arg: &str) -> Result<Outcome> {
        let grammar = self.session.grammar();
        let text = if arg.is_empty() {
            snapshot(grammar).iter().map(ToString::to_string).collect()
        } else {
            snapshot_symbol(grammar, arg)
                .ok_or_else(|| Error::undefined_symbol(arg))?
                .to_string()
        };
        Ok(Outcome::Output(text.trim_end().to_string()))
    }

    fn trace(&mut self, arg: &str) -> Result<Outcome> {
        match arg {
            "" => {
                let text = self.session.tracer().format_last_generation();
                if text.is_empty() {
                    return Ok(Outcome::Output("(no trace recorded)".to_string()));
                }
                return Ok(Outcome::Output(text));
            }
            "on" => self.session.set_trace(true),
            "off" => self.session.set_trace(false),
            "json" => self.session.tracer_mut().set_json_format(true),
            "human" => self.session.tracer_mut().set_json_format(false),
            "stderr" => self.session.tracer_mut().set_output(TraceOutput::Stderr),
            other => {
                return Err(Error::invalid_setting(
                    "trace",
                    format!("expected on, off, json, human, or stderr, got {other:?}"),
                ));
            }
        }
        let state = if self.session.tracer().is_enabled() {
            "on"
        } else {
            "off"
        };
        Ok(Outcome::Output(format!("trace: {state}")))
    }

    /// Loads a grammar file into the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid grammar.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let count = self.session.load_file(path)?;
        self.refresh_keywords();
        Ok(count)
    }

    /// Offers every symbol and modifier name for completion.
    fn refresh_keywords(&mut self) {
        let grammar = self.session.grammar();
        let keywords = grammar
            .symbols()
            .map(|scope| scope.key().to_string())
            .chain(grammar.modifier_names().map(str::to_string))
            .collect();
        self.editor.set_keywords(keywords);
    }

    /// Texts of `trees`, their recorded errors, and any trace recorded after
    /// generation `before`.
    fn describe(&self, trees: &[ExpansionTree], before: u64) -> String {
        let mut out = String::new();
        for tree in trees {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(tree.finished_text());
            for (node, error) in tree.errors() {
                let _ = write!(out, "\n  \x1b[33m! {node}: {error}\x1b[0m");
            }
        }

        let tracer = self.session.tracer();
        if tracer.output() == TraceOutput::Stderr {
            return out;
        }
        let trace = tracer.format_since(before);
        if !trace.is_empty() {
            out.push('\n');
            out.push_str(&trace);
        }
        out
    }

    fn seed_status(&self) -> String {
        let state = if self.session.is_seed_locked() {
            "locked"
        } else {
            "unlocked"
        };
        format!("seed: {} ({state})", self.session.seed())
    }

    /// Prints an error to stderr.
    #[allow(clippy::unused_self)]
    fn print_error(&self, error: &Error) {
        eprintln!("\x1b[31mError: {error}\x1b[0m");
        if let Some(context) = &error.context {
            eprintln!("\x1b[2m{context}\x1b[0m");
        }
    }

    #[allow(clippy::unused_self)]
    fn print_banner(&self) {
        println!("\x1b[1;36mFabula\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
        println!("Type a rule to expand it, or :help for commands. Ctrl+D exits.\n");
        let _ = io::stdout().flush();
    }
}

fn required<'a>(command: &str, arg: &'a str) -> Result<&'a str> {
    if arg.is_empty() {
        return Err(Error::new(ErrorKind::Internal(format!(
            ":{command} requires an argument"
        ))));
    }
    Ok(arg)
}

fn parse_number<T: std::str::FromStr>(name: &'static str, arg: &str) -> Result<T> {
    arg.parse()
        .map_err(|_| Error::invalid_setting(name, format!("not a number: {arg}")))
}

const HELP: &str = "\
\x1b[1mRULES\x1b[0m
    #symbol#             Expand a symbol
    #symbol.mod1.mod2#   Expand, then apply modifiers left to right
    [name:rule]          Bind name to the expansion of rule
    [name:POP]           Remove the latest binding of name
    \\#  \\[  \\]  \\\\        Literal characters

\x1b[1mCOMMANDS\x1b[0m
    :load PATH           Merge a JSON grammar file
    :gen                 Generate from the origin
    :reroll              Unlock the seed and generate
    :origin [NAME]       Show or set the origin symbol
    :count [N]           Show or set texts per run
    :seed [N]            Show or set (and lock) the seed
    :lock                Toggle the seed lock
    :step                Start step mode, or expand the next node
    :symbols [NAME]      Show symbol stacks
    :trace [on|off|json|human|stderr]
                         Configure tracing, or show the last trace
    :dist [RUNS]         Sample the origin and show selection counts
    :parse RULE          Show how a rule parses
    :help                This help
    :quit                Exit
";
