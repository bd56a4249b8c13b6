//! Presentation of extraction results: plain text, user templates and the JSON report.

use anyhow::{anyhow, Result};
use serde::Serialize;
use systract_core::model::SystemCall;
use systract_core::services::SourceKind;

/// Default listing: a count header and one indented `name (id)` line per result.
pub fn render_text(calls: &[SystemCall]) -> String {
    if calls.is_empty() {
        return "no system calls were found\n".to_string();
    }
    let mut out = format!("{} system calls found:\n", calls.len());
    for call in calls {
        out.push_str(&format!("    {} ({})\n", call.name, call.id));
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Id,
    Name,
}

/// Per-result output template.
///
/// `{id}` and `{name}` are substituted; `{{`, `}}`, `\n`, `\t` and `\\` are escapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some('n') => literal.push('\n'),
                    Some('t') => literal.push('\t'),
                    Some('\\') => literal.push('\\'),
                    Some(other) => {
                        literal.push('\\');
                        literal.push(other);
                    }
                    None => literal.push('\\'),
                },
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut key = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(k) => key.push(k),
                            None => return Err(anyhow!("invalid template: unterminated '{{'")),
                        }
                    }
                    let segment = match key.trim() {
                        "id" => Segment::Id,
                        "name" => Segment::Name,
                        other => {
                            return Err(anyhow!(
                                "invalid template: unknown placeholder '{{{other}}}'"
                            ))
                        }
                    };
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(segment);
                }
                '}' => return Err(anyhow!("invalid template: unmatched '}}'")),
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    pub fn render(&self, calls: &[SystemCall]) -> String {
        let mut out = String::new();
        for call in calls {
            for segment in &self.segments {
                match segment {
                    Segment::Literal(text) => out.push_str(text),
                    Segment::Id => out.push_str(&call.id.to_string()),
                    Segment::Name => out.push_str(&call.name),
                }
            }
        }
        out
    }
}

/// Machine-readable bill of materials for one input.
#[derive(Debug, Clone, Serialize)]
pub struct SyscallReport {
    pub source: String,
    pub kind: SourceKind,
    pub sha256: String,
    pub generated_at: String,
    pub syscalls: Vec<SystemCall>,
}
