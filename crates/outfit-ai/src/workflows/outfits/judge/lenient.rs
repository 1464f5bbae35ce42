//! Lenient decoding for judge replies.
//!
//! Replies are free text that usually, but not always, embeds a JSON array.
//! Decoding walks an ordered chain: strict parse of the outermost array, then
//! cumulative structural repairs, and finally a regex scrape that only
//! recovers `(index, justification)` pairs.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value;
use tracing::debug;

/// Structural repairs, applied cumulatively in declaration order.
///
/// Every repair leaves double-quoted string literals untouched, so prose such
/// as `"Bold, tip: roll the sleeves"` survives key and bareword quoting.
/// Single quotes are converted first so their contents are protected too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repair {
    TrailingCommas,
    SingleQuotedStrings,
    UnquotedKeys,
    BarewordValues,
}

impl Repair {
    pub const ORDERED: [Repair; 4] = [
        Repair::TrailingCommas,
        Repair::SingleQuotedStrings,
        Repair::UnquotedKeys,
        Repair::BarewordValues,
    ];

    pub fn apply(self, text: &str) -> String {
        match self {
            Repair::TrailingCommas => outside_strings(text, |span| {
                trailing_comma_regex().replace_all(span, "$1").into_owned()
            }),
            Repair::SingleQuotedStrings => outside_strings(text, |span| {
                replace_until_stable(span, single_quote_regex(), |caps| {
                    let inner = caps[2].replace('"', "\\\"");
                    format!("{}\"{}\"{}", &caps[1], inner, &caps[3])
                })
            }),
            Repair::UnquotedKeys => outside_strings(text, |span| {
                unquoted_key_regex().replace_all(span, "$1\"$2\":").into_owned()
            }),
            Repair::BarewordValues => {
                let quoted = outside_strings(text, |span| {
                    replace_until_stable(span, bareword_value_regex(), quote_bareword)
                });
                outside_strings(&quoted, |span| {
                    replace_until_stable(span, bareword_element_regex(), quote_bareword)
                })
            }
        }
    }
}

/// Removes markdown code fences such as ```` ```json ````.
pub fn strip_code_fences(text: &str) -> String {
    fence_regex().replace_all(text, "").trim().to_string()
}

/// The span from the first `[` to the last `]`, inclusive.
pub fn outermost_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

/// Best-effort structural decode into a list of JSON values.
pub fn decode_array(text: &str) -> Option<Vec<Value>> {
    let unfenced = strip_code_fences(text);
    let body = outermost_array(&unfenced).unwrap_or(unfenced.as_str());

    if let Some(values) = parse_array(body) {
        return Some(values);
    }

    let mut repaired = body.to_string();
    for repair in Repair::ORDERED {
        repaired = repair.apply(&repaired);
        if let Some(values) = parse_array(&repaired) {
            debug!(?repair, "judge reply recovered after repair");
            return Some(values);
        }
    }

    None
}

/// Last resort: scrape `index`/`justification` pairs out of malformed text.
pub fn extract_pairs(text: &str) -> Vec<(usize, String)> {
    pair_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let index = caps.get(1)?.as_str().parse::<usize>().ok()?;
            let justification = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|value| value.as_str().replace("\\\"", "\""))?;
            Some((index, justification))
        })
        .collect()
}

fn parse_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Array(values) => Some(values),
        Value::Object(map) => {
            // Some models wrap the list, e.g. {"outfits": [...]}.
            let nested = map.values().find_map(|value| value.as_array().cloned());
            Some(nested.unwrap_or_else(|| vec![Value::Object(map)]))
        }
        _ => None,
    }
}

/// Rewrites the text between double-quoted literals, copying literals verbatim.
fn outside_strings<F>(text: &str, mut repair: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for literal in string_literal_regex().find_iter(text) {
        out.push_str(&repair(&text[cursor..literal.start()]));
        out.push_str(literal.as_str());
        cursor = literal.end();
    }
    out.push_str(&repair(&text[cursor..]));
    out
}

fn replace_until_stable<F>(text: &str, regex: &Regex, mut replacer: F) -> String
where
    F: FnMut(&Captures<'_>) -> String,
{
    let mut current = text.to_string();
    // Adjacent matches share a delimiter, so one pass can leave gaps.
    for _ in 0..8 {
        let next = regex.replace_all(&current, |caps: &Captures<'_>| replacer(caps)).into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn quote_bareword(caps: &Captures<'_>) -> String {
    let word = caps[2].trim_end();
    match word {
        "true" | "false" | "null" => caps[0].to_string(),
        _ => format!("{}\"{}\"{}", &caps[1], word, &caps[3]),
    }
}

fn fence_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"```[A-Za-z0-9_-]*").expect("valid fence regex"))
}

fn string_literal_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r#""(?:[^"\\]|\\.)*""#).expect("valid string literal regex"))
}

fn trailing_comma_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r",\s*([\]}])").expect("valid trailing comma regex"))
}

fn unquoted_key_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").expect("valid unquoted key regex")
    })
}

fn single_quote_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"([\[{,:]\s*)'((?:[^'\\]|\\.)*)'(\s*[,}\]:])"#)
            .expect("valid single quote regex")
    })
}

fn bareword_value_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(:\s*)([A-Za-z][A-Za-z0-9 _.\-]*?)(\s*[,}\]])")
            .expect("valid bareword value regex")
    })
}

fn bareword_element_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"([\[,]\s*)([A-Za-z][A-Za-z0-9_\-]*)(\s*[,\]])")
            .expect("valid bareword element regex")
    })
}

fn pair_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r#"(?s)["']?index["']?\s*[:=]\s*["']?(\d+)["']?.*?["']?justification["']?\s*[:=]\s*(?:"((?:[^"\\]|\\.)*)"|'([^']*)')"#,
        )
        .expect("valid pair regex")
    })
}
