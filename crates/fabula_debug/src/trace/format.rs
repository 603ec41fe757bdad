//! Rendering trace records as text.
//!
//! [`HumanFormatter`] writes one indented line per record, mirroring the shape
//! of the expansion tree. [`JsonFormatter`] writes records as serde JSON.

use std::fmt::Write;

use super::record::{TraceEvent, TraceRecord};

/// Renders trace records.
pub trait TraceFormatter {
    /// Renders one record.
    fn format(&self, record: &TraceRecord) -> String;

    /// Renders a sequence of records, one per line by default.
    fn format_many(&self, records: &[&TraceRecord]) -> String {
        let mut out = String::new();
        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&self.format(record));
        }
        out
    }
}

// =============================================================================
// HumanFormatter
// =============================================================================

/// One line per record, indented two spaces per tree level.
#[derive(Clone, Debug, Default)]
pub struct HumanFormatter {
    /// Prefix each line with `[id] Ggeneration`.
    pub show_origin: bool,
}

impl HumanFormatter {
    /// Lines without the record prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefixes each line with its record ID and generation.
    #[must_use]
    pub fn with_origin(mut self) -> Self {
        self.show_origin = true;
        self
    }
}

impl TraceFormatter for HumanFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        let mut line = String::new();
        if self.show_origin {
            let _ = write!(line, "[{:06}] G{:04} ", record.id, record.generation);
        }
        for _ in 0..record.depth {
            line.push_str("  ");
        }

        let _ = match &record.event {
            TraceEvent::Expand {
                kind, raw, text, ..
            } => write!(line, "{kind} {raw:?} => {text:?}"),
            TraceEvent::RuleSelected { symbol, rule, .. } => {
                write!(line, "SELECT #{symbol}# -> {rule:?}")
            }
            TraceEvent::BindingPushed { target, text, .. } => {
                write!(line, "PUSH {target} = {text:?}")
            }
            TraceEvent::BindingPopped { target, .. } => write!(line, "POP {target}"),
            TraceEvent::ModifierApplied { modifier, .. } => write!(line, "MODIFY .{modifier}"),
            TraceEvent::UnknownModifier { modifier, .. } => {
                write!(line, "MODIFY .{modifier} (unknown)")
            }
            TraceEvent::Issue { message, .. } => write!(line, "ERROR {message}"),
        };
        line
    }
}

// =============================================================================
// JsonFormatter
// =============================================================================

/// Compact JSON. Several records render as one array.
#[derive(Clone, Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// A compact JSON formatter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("{{\"error\":{:?}}}", e.to_string()))
}

impl TraceFormatter for JsonFormatter {
    fn format(&self, record: &TraceRecord) -> String {
        to_json(record)
    }

    fn format_many(&self, records: &[&TraceRecord]) -> String {
        to_json(records)
    }
}

// =============================================================================
// Tests
// =============================================================================
