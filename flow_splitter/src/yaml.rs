//! YAML emission and parsing for record values.
//!
//! Output is block style with two-space indentation. Strings are written
//! plain only when no YAML reader could take them for another type; anything
//! else is double-quoted. Empty collections and nulls use their flow forms
//! (`{}`, `[]`, `null`) so they survive a round trip.
//!
//! Parsing goes through `serde-saphyr`. Every node is requested as an option
//! so plain `null`, `~` and empty scalars come back as [`Value::Null`].

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Number, Value};
use serde_saphyr::Options;

const INDENT_STEP: usize = 2;

/// Words a YAML 1.1 or 1.2 reader resolves to null, booleans or floats.
const RESERVED_WORDS: &[&str] = &[
    "null", "true", "false", "y", "n", "yes", "no", "on", "off", "inf", "nan", "infinity",
];

/// Render `value` as a YAML document terminated by a newline.
pub(crate) fn to_yaml_string(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Object(map) if !map.is_empty() => emit_map(&mut out, map, 0, false),
        Value::Array(items) if !items.is_empty() => emit_seq(&mut out, items, 0, false),
        scalar => {
            write_scalar(&mut out, scalar);
            out.push('\n');
        }
    }
    out
}

/// Parse a single YAML document into a JSON value.
///
/// Booleans are strict, so only `true` and `false` become booleans.
pub(crate) fn parse_yaml(text: &str) -> Result<Value, serde_saphyr::Error> {
    let options = Options {
        strict_booleans: true,
        ..Options::default()
    };
    serde_saphyr::from_str_with_options::<YamlNode>(text, options).map(|node| node.0)
}

fn pad(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat_n(' ', indent));
}

fn emit_map(out: &mut String, map: &Map<String, Value>, indent: usize, is_inline: bool) {
    for (position, (key, value)) in map.iter().enumerate() {
        if position > 0 || !is_inline {
            pad(out, indent);
        }
        write_str(out, key);
        out.push(':');
        match value {
            Value::Object(child) if !child.is_empty() => {
                out.push('\n');
                emit_map(out, child, indent + INDENT_STEP, false);
            }
            Value::Array(items) if !items.is_empty() => {
                out.push('\n');
                emit_seq(out, items, indent + INDENT_STEP, false);
            }
            scalar => {
                out.push(' ');
                write_scalar(out, scalar);
                out.push('\n');
            }
        }
    }
}

fn emit_seq(out: &mut String, items: &[Value], indent: usize, is_inline: bool) {
    for (position, item) in items.iter().enumerate() {
        if position > 0 || !is_inline {
            pad(out, indent);
        }
        out.push_str("- ");
        match item {
            Value::Object(child) if !child.is_empty() => {
                emit_map(out, child, indent + INDENT_STEP, true);
            }
            Value::Array(nested) if !nested.is_empty() => {
                emit_seq(out, nested, indent + INDENT_STEP, true);
            }
            scalar => {
                write_scalar(out, scalar);
                out.push('\n');
            }
        }
    }
}

/// Write a scalar or an empty collection on the current line.
fn write_scalar(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
        Value::Number(number) => out.push_str(&number.to_string()),
        Value::String(text) => write_str(out, text),
        Value::Array(_) => out.push_str("[]"),
        Value::Object(_) => out.push_str("{}"),
    }
}

fn write_str(out: &mut String, text: &str) {
    if is_plain_safe(text) {
        out.push_str(text);
    } else {
        write_double_quoted(out, text);
    }
}

/// Whether `text` reads back as the same string when written unquoted.
///
/// Only a conservative subset qualifies: it starts with an ASCII letter or
/// underscore, uses letters, digits, `_`, `-`, `.`, `/` and inner spaces, and
/// is not a reserved word in any case.
fn is_plain_safe(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && !text.ends_with(' ')
        && text
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | '/' | ' '))
        && !RESERVED_WORDS
            .iter()
            .any(|word| word.eq_ignore_ascii_case(text))
}

/// Write `text` double-quoted.
///
/// A `]` or space directly after `]` is escaped: the parser rejects documents
/// containing `]]` or `] ]` outside nested flow sequences.
fn write_double_quoted(out: &mut String, text: &str) {
    out.push('"');
    let mut previous = None;
    for ch in text.chars() {
        match ch {
            ']' | ' ' if previous == Some(']') => {
                out.push_str(&format!("\\u{:04X}", u32::from(ch)));
            }
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            special
                if special.is_control()
                    || matches!(special, '\u{2028}' | '\u{2029}' | '\u{feff}') =>
            {
                out.push_str(&format!("\\u{:04X}", u32::from(special)));
            }
            other => out.push(other),
        }
        previous = Some(ch);
    }
    out.push('"');
}

/// A parsed YAML node with null-like scalars resolved to [`Value::Null`].
struct YamlNode(Value);

impl<'de> Deserialize<'de> for YamlNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(NodeVisitor).map(Self)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML node")
    }

    fn visit_none<E>(self) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_unit<E>(self) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_bool<E>(self, value: bool) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Bool(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(value))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(value))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Number::from_f64(value).map_or(Value::Null, Value::Number))
    }

    fn visit_str<E>(self, value: &str) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::String(value.to_owned()))
    }

    fn visit_string<E>(self, value: String) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::String(value))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(YamlNode(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = Map::new();
        while let Some((key, YamlNode(value))) = access.next_entry::<String, YamlNode>()? {
            map.insert(key, value);
        }
        Ok(Value::Object(map))
    }
}
