//! JSON and YAML codecs for split record files.

use std::fmt;
use std::str::FromStr;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::yaml::{parse_yaml, to_yaml_string};
use crate::{FlowSplitError, FlowSplitResult};

/// Serialisation format used for split record files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Pretty-printed JSON with two-space indentation.
    Json,
    /// YAML 1.2.
    #[default]
    Yaml,
}

impl Encoding {
    /// Returns the configuration spelling of this encoding.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// Extension given to files written in this encoding.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        self.as_str()
    }

    /// Whether `path` names a file this encoding can read.
    ///
    /// YAML accepts both `.yaml` and `.yml`.
    #[must_use]
    pub fn matches_path(self, path: &Utf8Path) -> bool {
        match (self, path.extension()) {
            (Self::Json, Some("json")) | (Self::Yaml, Some("yaml" | "yml")) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = FlowSplitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            other => Err(FlowSplitError::UnsupportedFormat(other.to_owned())),
        }
    }
}

/// Serialise `value` in `encoding` with host line endings.
///
/// # Errors
///
/// Returns [`FlowSplitError::Encode`] when the serialiser rejects the value.
pub fn encode<T>(value: &T, encoding: Encoding) -> FlowSplitResult<String>
where
    T: Serialize + ?Sized,
{
    let text = match encoding {
        Encoding::Json => {
            serde_json::to_string_pretty(value).map_err(|err| FlowSplitError::Encode {
                encoding,
                source: Box::new(err),
            })?
        }
        Encoding::Yaml => {
            let tree = serde_json::to_value(value).map_err(|err| FlowSplitError::Encode {
                encoding,
                source: Box::new(err),
            })?;
            to_yaml_string(&tree)
        }
    };
    Ok(normalise_line_endings(&text))
}

/// Parse `bytes` as `encoding` into a JSON value.
///
/// YAML is read with strict booleans so scalars such as `yes` stay strings,
/// and plain `null`, `~` or empty values become JSON null.
///
/// # Errors
///
/// Returns [`FlowSplitError::Decode`] for malformed input.
pub fn decode(bytes: &[u8], encoding: Encoding) -> FlowSplitResult<Value> {
    let decode_error = |source: Box<dyn std::error::Error + Send + Sync>| {
        FlowSplitError::Decode { encoding, source }
    };
    match encoding {
        Encoding::Json => serde_json::from_slice(bytes).map_err(|err| decode_error(Box::new(err))),
        Encoding::Yaml => {
            let text = std::str::from_utf8(bytes).map_err(|err| decode_error(Box::new(err)))?;
            parse_yaml(text).map_err(|err| decode_error(err.to_string().into()))
        }
    }
}

/// Convert every line break in `text` to the host convention.
///
/// `\r\n`, lone `\r` and `\n` all become `\r\n` on Windows and `\n`
/// elsewhere.
#[must_use]
pub fn normalise_line_endings(text: &str) -> String {
    let unix = text.replace("\r\n", "\n").replace('\r', "\n");
    if cfg!(windows) {
        unix.replace('\n', "\r\n")
    } else {
        unix
    }
}

#[cfg(test)]
mod tests {
    //! Codec coverage for both encodings.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn sample_node() -> Value {
        json!({
            "id": "a1b2c3",
            "type": "tab",
            "label": "Flow 1: \"quoted\"",
            "disabled": false,
            "info": "line one\nline two",
            "answer": "yes",
            "wires": [["n2", "n3"], []],
            "env": [{ "name": "PORT", "value": 1880, "ratio": 0.5 }],
            "missing": null
        })
    }

    #[rstest]
    #[case(Encoding::Json)]
    #[case(Encoding::Yaml)]
    fn round_trips_nested_values(#[case] encoding: Encoding) {
        let value = sample_node();
        let text = encode(&value, encoding).expect("encode node");
        let decoded = decode(text.as_bytes(), encoding).expect("decode node");
        assert_eq!(decoded, value);
    }

    #[rstest]
    #[case(json!({ "c": "with: colon" }))]
    #[case(json!({ "port": "1883", "hex": "0x1F", "neg": "-3", "float": "0.5" }))]
    #[case(json!({ "words": ["null", "~", "true", "No", "off", ".inf", ""] }))]
    #[case(json!({ "punct": ["-", "#tag", "a # b", "* star", "&anchor", "!bang", "@at"] }))]
    #[case(json!({ "spaces": [" lead", "trail ", "two  inner"] }))]
    #[case(json!({ "code": "msg.payload = a[b[0]] ]; // ]]" }))]
    #[case(json!({ "wires": [], "credentials": {}, "x": null }))]
    #[case(json!({ "wires": [[], ["n1"], [[]]], "nested": { "deep": {} } }))]
    #[case(json!({ "1883": "numeric key", "null": "null key", "a: b": "colon key" }))]
    #[case(json!({ "n": [0, -1, 18_446_744_073_709_551_615_u64, 0.5, -2.25] }))]
    #[case(json!({ "text": "ünïcode \u{1F600}\u{7}\u{2028}\r\n" }))]
    #[case(json!({}))]
    #[case(json!([]))]
    #[case(json!(null))]
    #[case(json!([null, {}, [], "x"]))]
    fn yaml_round_trips_ambiguous_values(#[case] value: Value) {
        let text = encode(&value, Encoding::Yaml).expect("encode yaml");
        let decoded = decode(text.as_bytes(), Encoding::Yaml)
            .unwrap_or_else(|err| panic!("decode failed for {text:?}: {err}"));
        assert_eq!(decoded, value, "yaml text was {text:?}");
    }

    #[rstest]
    fn yaml_quotes_ambiguous_strings_with_double_quotes() {
        let value = json!({ "id": "a1", "port": "1883", "label": "Flow: 1", "dash": "-" });
        let text = encode(&value, Encoding::Yaml).expect("encode yaml");
        let expected = normalise_line_endings(
            "id: a1\nport: \"1883\"\nlabel: \"Flow: 1\"\ndash: \"-\"\n",
        );
        assert_eq!(text, expected);
        assert!(!text.contains('\''), "single quotes are never used: {text}");
    }

    #[rstest]
    fn encode_accepts_unsized_slices() {
        let records: &[Value] = &[json!({ "id": "a" })];
        let text = encode(records, Encoding::Yaml).expect("encode slice");
        assert_eq!(text, normalise_line_endings("- id: a\n"));
    }

    #[rstest]
    fn json_uses_two_space_indentation() {
        let text = encode(&json!({ "id": "x", "z": [1] }), Encoding::Json).expect("encode");
        let expected = normalise_line_endings("{\n  \"id\": \"x\",\n  \"z\": [\n    1\n  ]\n}");
        assert_eq!(text, expected);
    }

    #[rstest]
    fn json_keeps_insertion_order() {
        let value = json!({ "z": 1, "a": 2, "m": 3 });
        let text = encode(&value, Encoding::Json).expect("encode");
        let z = text.find("\"z\"").expect("z key");
        let a = text.find("\"a\"").expect("a key");
        assert!(z < a, "keys should keep insertion order: {text}");
    }

    #[rstest]
    fn yaml_yes_stays_a_string() {
        let value = decode(b"answer: yes\n", Encoding::Yaml).expect("decode yaml");
        assert_eq!(value, json!({ "answer": "yes" }));
    }

    #[rstest]
    #[case(Encoding::Json, b"{ \"id\": ".as_slice())]
    #[case(Encoding::Yaml, b"id: [".as_slice())]
    #[case(Encoding::Yaml, b"\xff\xfe".as_slice())]
    fn malformed_input_is_a_decode_error(#[case] encoding: Encoding, #[case] bytes: &[u8]) {
        let err = decode(bytes, encoding).expect_err("malformed input");
        assert!(matches!(err, FlowSplitError::Decode { encoding: e, .. } if e == encoding));
    }

    #[rstest]
    #[case("json", Encoding::Json)]
    #[case("yaml", Encoding::Yaml)]
    fn parses_supported_formats(#[case] input: &str, #[case] expected: Encoding) {
        assert_eq!(input.parse::<Encoding>().expect("supported"), expected);
    }

    #[rstest]
    #[case("yml")]
    #[case("toml")]
    #[case("JSON")]
    fn rejects_unsupported_formats(#[case] input: &str) {
        let err = input.parse::<Encoding>().expect_err("unsupported");
        assert!(matches!(err, FlowSplitError::UnsupportedFormat(name) if name == input));
    }

    #[rstest]
    #[case(Encoding::Json, "node.json", true)]
    #[case(Encoding::Json, "node.yaml", false)]
    #[case(Encoding::Yaml, "node.yaml", true)]
    #[case(Encoding::Yaml, "node.yml", true)]
    #[case(Encoding::Yaml, "node.json", false)]
    #[case(Encoding::Yaml, "yaml", false)]
    fn matches_expected_extensions(
        #[case] encoding: Encoding,
        #[case] name: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(encoding.matches_path(Utf8Path::new(name)), expected);
    }

    #[rstest]
    fn normalises_mixed_line_endings() {
        let normalised = normalise_line_endings("a\r\nb\rc\nd");
        let expected = if cfg!(windows) {
            "a\r\nb\r\nc\r\nd"
        } else {
            "a\nb\nc\nd"
        };
        assert_eq!(normalised, expected);
    }
}
