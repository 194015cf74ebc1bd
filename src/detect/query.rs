// SPDX-License-Identifier: MPL-2.0
//! Minimal query-string handling for the language override parameter.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::HashMap;

/// Characters left untouched when encoding a query value.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Splits a location search string (`?a=1&b=2`) into its parameters.
///
/// Pairs without `=`, or with `=` as their first character, carry no usable
/// key and are dropped. Values are returned raw, without percent-decoding.
/// When a key repeats, the last occurrence wins.
pub fn parse(search: &str) -> HashMap<&str, &str> {
    let query = search.strip_prefix('?').unwrap_or(search);
    query
        .split('&')
        .filter_map(|pair| match pair.find('=') {
            Some(pos) if pos > 0 => Some((&pair[..pos], &pair[pos + 1..])),
            _ => None,
        })
        .collect()
}

/// Looks up a single parameter, treating an empty value as absent.
pub fn param<'a>(search: &'a str, key: &str) -> Option<&'a str> {
    parse(search).get(key).copied().filter(|v| !v.is_empty())
}

/// Builds `?key=value` with the value percent-encoded.
pub fn single_param(key: &str, value: &str) -> String {
    format!(
        "?{}={}",
        utf8_percent_encode(key, QUERY_VALUE),
        utf8_percent_encode(value, QUERY_VALUE)
    )
}

/// Percent-encodes a query value.
pub fn encode_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_and_strips_question_mark() {
        let params = parse("?setLng=fr&debug=true");
        assert_eq!(params.get("setLng"), Some(&"fr"));
        assert_eq!(params.get("debug"), Some(&"true"));
    }

    #[test]
    fn ignores_flags_without_equals_sign() {
        let params = parse("?verbose&setLng=de&=orphan");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("setLng"), Some(&"de"));
    }

    #[test]
    fn value_keeps_everything_after_first_equals() {
        let params = parse("token=a=b");
        assert_eq!(params.get("token"), Some(&"a=b"));
    }

    #[test]
    fn last_duplicate_wins() {
        assert_eq!(param("?setLng=fr&setLng=it", "setLng"), Some("it"));
    }

    #[test]
    fn empty_value_is_absent() {
        assert_eq!(param("?setLng=", "setLng"), None);
        assert_eq!(param("", "setLng"), None);
    }

    #[test]
    fn single_param_encodes_value() {
        assert_eq!(single_param("setLng", "ca_ES"), "?setLng=ca_ES");
        assert_eq!(single_param("q", "a b&c"), "?q=a%20b%26c");
    }
}
