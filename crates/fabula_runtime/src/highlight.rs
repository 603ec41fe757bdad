//! Syntax highlighting for rules typed at the REPL.

use std::borrow::Cow;

const RESET: &str = "\x1b[0m";
const TAG: &str = "\x1b[36m";
const MODIFIER: &str = "\x1b[35m";
const ACTION: &str = "\x1b[33m";
const ESCAPE: &str = "\x1b[2m";
const COMMAND: &str = "\x1b[1;32m";

/// Highlighter for rule syntax.
///
/// Tags are cyan with their modifier chain in magenta, actions are yellow,
/// and escape sequences are dimmed. A leading `:command` is bold green.
pub struct RuleHighlighter;

impl RuleHighlighter {
    /// Creates a new highlighter.
    pub const fn new() -> Self {
        Self
    }

    /// Highlights a line of input.
    #[allow(clippy::unused_self)]
    pub fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.contains(['#', '[', '\\', ':']) {
            return Cow::Borrowed(line);
        }

        let mut result = String::with_capacity(line.len() * 2);
        let mut rest = line;

        if let Some(stripped) = line.strip_prefix(':') {
            let end = stripped.find(char::is_whitespace).unwrap_or(stripped.len());
            result.push_str(COMMAND);
            result.push(':');
            result.push_str(&stripped[..end]);
            result.push_str(RESET);
            rest = &stripped[end..];
        }

        let mut depth = 0usize;
        let mut in_tag = false;
        let mut in_modifiers = false;
        let mut chars = rest.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    result.push_str(ESCAPE);
                    result.push(c);
                    if let Some(next) = chars.next() {
                        result.push(next);
                    }
                    result.push_str(RESET);
                    result.push_str(current_color(depth, in_tag, in_modifiers));
                }
                '[' => {
                    depth += 1;
                    result.push_str(ACTION);
                    result.push(c);
                }
                ']' => {
                    result.push(c);
                    depth = depth.saturating_sub(1);
                    result.push_str(RESET);
                    result.push_str(current_color(depth, in_tag, in_modifiers));
                }
                '#' if depth == 0 => {
                    if in_tag {
                        result.push_str(TAG);
                        result.push(c);
                        result.push_str(RESET);
                        in_tag = false;
                        in_modifiers = false;
                    } else {
                        result.push_str(TAG);
                        result.push(c);
                        in_tag = true;
                    }
                }
                '.' if in_tag && depth == 0 => {
                    in_modifiers = true;
                    result.push_str(MODIFIER);
                    result.push(c);
                }
                _ => result.push(c),
            }
        }

        if in_tag || depth > 0 {
            result.push_str(RESET);
        }

        Cow::Owned(result)
    }
}

/// Colour to resume after an escape or a closed action.
fn current_color(depth: usize, in_tag: bool, in_modifiers: bool) -> &'static str {
    if depth > 0 {
        ACTION
    } else if in_modifiers {
        MODIFIER
    } else if in_tag {
        TAG
    } else {
        ""
    }
}

impl Default for RuleHighlighter {
    fn default() -> Self {
        Self::new()
    }
}
