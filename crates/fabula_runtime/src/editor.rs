//! Line editor abstraction for the REPL.
//!
//! The REPL talks to a [`LineEditor`], so tests can script input and the
//! rustyline backend stays swappable.

use crate::highlight::RuleHighlighter;
use crate::repl::COMMANDS;
use fabula_foundation::{Error, ErrorKind, Result};
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::HistoryHinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Completer, Config, Context, Editor, Helper, Hinter, Validator as RLValidator};
use std::borrow::Cow;

/// Result of reading a line from the editor.
#[derive(Debug)]
pub enum ReadResult {
    /// A line was read.
    Line(String),
    /// Ctrl+C.
    Interrupted,
    /// Ctrl+D.
    Eof,
}

/// Abstraction over line editing.
pub trait LineEditor {
    /// Reads a line with the given prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Reads a continuation line of multi-line input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from the terminal fails.
    fn read_continuation(&mut self, prompt: &str) -> Result<ReadResult>;

    /// Adds a line to history.
    fn add_history(&mut self, line: &str);

    /// Replaces the completion words (symbol and modifier names).
    fn set_keywords(&mut self, keywords: Vec<String>);
}

/// Returns true when `input` has no open action and no open tag.
///
/// `:commands` are always complete.
#[must_use]
pub fn is_complete(input: &str) -> bool {
    if input.trim_start().starts_with(':') {
        return true;
    }

    let mut depth = 0i32;
    let mut in_tag = false;
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' => depth += 1,
            ']' => depth -= 1,
            '#' if depth == 0 => in_tag = !in_tag,
            _ => {}
        }
    }
    depth <= 0 && !in_tag
}

/// rustyline helper: completion, hints, highlighting, and validation.
#[derive(Helper, Completer, Hinter, RLValidator)]
struct FabulaHelper {
    #[rustyline(Completer)]
    completer: RuleCompleter,
    #[rustyline(Hinter)]
    hinter: HistoryHinter,
    #[rustyline(Validator)]
    validator: RuleValidator,
    highlighter: RuleHighlighter,
}

impl Highlighter for FabulaHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        if default {
            Cow::Owned(format!("\x1b[1;36m{prompt}\x1b[0m"))
        } else {
            Cow::Borrowed(prompt)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{hint}\x1b[0m"))
    }
}

/// Completes commands, file paths after `:load`, and symbol names in rules.
struct RuleCompleter {
    file_completer: FilenameCompleter,
    keywords: Vec<String>,
}

impl RuleCompleter {
    fn new() -> Self {
        Self {
            file_completer: FilenameCompleter::new(),
            keywords: Vec::new(),
        }
    }

    fn candidates<'a>(words: impl Iterator<Item = &'a str>, prefix: &str) -> Vec<Pair> {
        words
            .filter(|word| word.starts_with(prefix))
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect()
    }
}

impl Completer for RuleCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let before = &line[..pos];

        if before.starts_with(":load ") {
            return self.file_completer.complete(line, pos, ctx);
        }
        if before.starts_with(':') && !before.contains(char::is_whitespace) {
            return Ok((0, Self::candidates(COMMANDS.iter().copied(), before)));
        }

        let start = before
            .char_indices()
            .rev()
            .find(|&(_, c)| c.is_whitespace() || "#[]:.".contains(c))
            .map_or(0, |(i, c)| i + c.len_utf8());
        let word = &before[start..];

        Ok((
            start,
            Self::candidates(self.keywords.iter().map(String::as_str), word),
        ))
    }
}

/// Keeps reading lines while an action or tag is open.
#[derive(Default)]
struct RuleValidator;

impl Validator for RuleValidator {
    fn validate(&self, ctx: &mut ValidationContext<'_>) -> rustyline::Result<ValidationResult> {
        if is_complete(ctx.input()) {
            Ok(ValidationResult::Valid(None))
        } else {
            Ok(ValidationResult::Incomplete)
        }
    }
}

const HISTORY_SIZE: usize = 500;

fn setup_error(e: ReadlineError) -> Error {
    Error::new(ErrorKind::Internal(format!("line editor setup failed: {e}")))
}

/// Line editor backed by rustyline.
pub struct RustylineEditor {
    editor: Editor<FabulaHelper, DefaultHistory>,
}

impl RustylineEditor {
    /// Creates a new rustyline-based editor.
    ///
    /// # Errors
    ///
    /// Returns an error if rustyline fails to initialize.
    pub fn new() -> Result<Self> {
        let config = Config::builder()
            .auto_add_history(false)
            .max_history_size(HISTORY_SIZE)
            .map_err(setup_error)?
            .build();

        let mut editor = Editor::with_config(config).map_err(setup_error)?;
        editor.set_helper(Some(FabulaHelper {
            completer: RuleCompleter::new(),
            hinter: HistoryHinter::new(),
            validator: RuleValidator,
            highlighter: RuleHighlighter::new(),
        }));
        Ok(Self { editor })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(Error::new(ErrorKind::IoError(format!("terminal: {e}")))),
        }
    }

    fn read_continuation(&mut self, prompt: &str) -> Result<ReadResult> {
        self.read_line(prompt)
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }

    fn set_keywords(&mut self, keywords: Vec<String>) {
        if let Some(helper) = self.editor.helper_mut() {
            helper.completer.keywords = keywords;
        }
    }
}
