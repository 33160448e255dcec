//! JSON text rendering: the shared string escaper and the tree writer.

use crate::error::Error;
use crate::node::{Document, NodeId, NodeKind};

/// Escape a string for embedding in a JSON literal (quotes not included).
///
/// Quote, backslash and the named control characters become two-character
/// escapes; any other character below 0x20 becomes `\u00` plus two
/// lowercase hex digits; everything else passes through unchanged.
pub fn escape_json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(s, &mut out);
    out
}

pub(crate) fn escape_into(s: &str, out: &mut String) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let b = c as u32;
                out.push_str("\\u00");
                out.push(HEX[(b >> 4) as usize] as char);
                out.push(HEX[(b & 0xf) as usize] as char);
            }
            c => out.push(c),
        }
    }
}

/// Format a number the way the engine emits it everywhere: `None` for
/// non-finite values (the caller decides how those render), an integer
/// literal when the value equals its saturating 32-bit truncation, the
/// shortest double literal otherwise.
pub(crate) fn format_number(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value as i32;
    if value == f64::from(truncated) {
        return Some(truncated.to_string());
    }
    serde_json::Number::from_f64(value).map(|n| n.to_string())
}

impl Document {
    /// Render a subtree as compact JSON text.
    pub fn to_json(&self, id: NodeId) -> Result<String, Error> {
        let mut out = String::new();
        self.write_json(id, 0, &mut out)?;
        Ok(out)
    }

    /// Render a subtree as pretty JSON text with a two-space indent step.
    pub fn to_json_pretty(&self, id: NodeId) -> Result<String, Error> {
        let mut out = String::new();
        self.write_json(id, 2, &mut out)?;
        Ok(out)
    }

    /// `indent` is the column for this level's members; 0 means compact.
    /// Closing brackets sit one level shallower than their members.
    fn write_json(&self, id: NodeId, indent: usize, out: &mut String) -> Result<(), Error> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Null => out.push_str("null"),
            NodeKind::Bool(true) => out.push_str("true"),
            NodeKind::Bool(false) => out.push_str("false"),
            NodeKind::Number(value) => match format_number(*value) {
                Some(literal) => out.push_str(&literal),
                // NaN and infinities have no JSON literal
                None => out.push_str("null"),
            },
            NodeKind::Raw(None) => out.push_str("\"\""),
            NodeKind::String(s) | NodeKind::Raw(Some(s)) => {
                out.push('"');
                escape_into(s, out);
                out.push('"');
            }
            NodeKind::Array => {
                out.push('[');
                if indent > 0 {
                    out.push('\n');
                }
                for (i, child) in node.children.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                        if indent > 0 {
                            out.push('\n');
                        }
                    }
                    push_spaces(out, indent);
                    self.write_json(*child, next_indent(indent), out)?;
                }
                if indent > 0 {
                    out.push('\n');
                    push_spaces(out, indent - 2);
                }
                out.push(']');
            }
            NodeKind::Object => {
                out.push('{');
                if indent > 0 {
                    out.push('\n');
                }
                for (i, child) in node.children.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                        if indent > 0 {
                            out.push('\n');
                        }
                    }
                    push_spaces(out, indent);
                    let child_node = self.node(*child)?;
                    out.push('"');
                    escape_into(child_node.key.as_deref().unwrap_or(""), out);
                    out.push_str("\":");
                    if indent > 0 {
                        out.push(' ');
                    }
                    self.write_json(*child, next_indent(indent), out)?;
                }
                if indent > 0 {
                    out.push('\n');
                    push_spaces(out, indent - 2);
                }
                out.push('}');
            }
        }
        Ok(())
    }
}

fn next_indent(indent: usize) -> usize {
    if indent > 0 {
        indent + 2
    } else {
        0
    }
}

fn push_spaces(out: &mut String, count: usize) {
    for _ in 0..count {
        out.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_the_named_table() {
        assert_eq!(escape_json_string("plain"), "plain");
        assert_eq!(escape_json_string("a\"b"), "a\\\"b");
        assert_eq!(escape_json_string("a\\b"), "a\\\\b");
        assert_eq!(
            escape_json_string("\u{8}\u{c}\n\r\t"),
            "\\b\\f\\n\\r\\t"
        );
        assert_eq!(escape_json_string("\u{1}\u{1f}"), "\\u0001\\u001f");
        assert_eq!(escape_json_string("ünïcode"), "ünïcode");
    }

    #[test]
    fn number_formatting_prefers_integers() {
        assert_eq!(format_number(0.0), Some("0".to_string()));
        assert_eq!(format_number(-7.0), Some("-7".to_string()));
        assert_eq!(format_number(1.5), Some("1.5".to_string()));
        // Past the 32-bit range the integral check no longer applies
        assert_eq!(format_number(3e9), Some("3000000000.0".to_string()));
        assert_eq!(format_number(f64::NAN), None);
        assert_eq!(format_number(f64::INFINITY), None);
    }
}
