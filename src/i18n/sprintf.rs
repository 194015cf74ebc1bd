// SPDX-License-Identifier: MPL-2.0
//! printf-style substitution applied to translated strings.
//!
//! Supported placeholders:
//!
//! - `%s`, `%d`/`%i`, `%f`, `%x`/`%X`, `%o`, `%b`, and `%%` for a literal `%`
//! - explicit positions: `%2$s`
//! - named values: `%(name)s`
//! - flags `-` (left align), `0` (zero pad), `+` (force sign), a width and a
//!   precision (`%.2f`, `%5.1f`, `%.3s`)
//!
//! Values that are missing render as an empty string. A `%` that does not
//! start a valid placeholder is copied through unchanged.

use std::collections::HashMap;
use std::fmt;

/// A value substituted into a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl FormatValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            FormatValue::Str(s) => s.trim().parse().ok(),
            FormatValue::Int(i) => Some(*i as f64),
            FormatValue::Float(f) => Some(*f),
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            FormatValue::Str(s) => s
                .trim()
                .parse::<i64>()
                .ok()
                .or_else(|| s.trim().parse::<f64>().ok().map(|f| f.trunc() as i64)),
            FormatValue::Int(i) => Some(*i),
            FormatValue::Float(f) => Some(f.trunc() as i64),
        }
    }
}

impl fmt::Display for FormatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatValue::Str(s) => f.write_str(s),
            FormatValue::Int(i) => write!(f, "{}", i),
            FormatValue::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FormatValue {
    fn from(value: &str) -> Self {
        FormatValue::Str(value.to_string())
    }
}

impl From<String> for FormatValue {
    fn from(value: String) -> Self {
        FormatValue::Str(value)
    }
}

impl From<&String> for FormatValue {
    fn from(value: &String) -> Self {
        FormatValue::Str(value.clone())
    }
}

macro_rules! int_format_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FormatValue {
                fn from(value: $ty) -> Self {
                    FormatValue::Int(i64::from(value))
                }
            }
        )*
    };
}

int_format_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for FormatValue {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(FormatValue::Int)
            .unwrap_or(FormatValue::Float(value as f64))
    }
}

impl From<usize> for FormatValue {
    fn from(value: usize) -> Self {
        FormatValue::from(value as u64)
    }
}

impl From<f32> for FormatValue {
    fn from(value: f32) -> Self {
        FormatValue::Float(f64::from(value))
    }
}

impl From<f64> for FormatValue {
    fn from(value: f64) -> Self {
        FormatValue::Float(value)
    }
}

/// Values handed to the formatter: a positional list or a name → value map.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Values {
    #[default]
    None,
    Positional(Vec<FormatValue>),
    Named(HashMap<String, FormatValue>),
}

impl Values {
    pub fn is_empty(&self) -> bool {
        match self {
            Values::None => true,
            Values::Positional(values) => values.is_empty(),
            Values::Named(values) => values.is_empty(),
        }
    }

    /// Builds a named map from `(name, value)` pairs.
    pub fn named<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<FormatValue>,
    {
        Values::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    fn positional(&self, index: usize) -> Option<&FormatValue> {
        match self {
            Values::Positional(values) => values.get(index),
            _ => None,
        }
    }

    fn by_name(&self, name: &str) -> Option<&FormatValue> {
        match self {
            Values::Named(values) => values.get(name),
            _ => None,
        }
    }
}

/// Widths above this are ignored and precisions are clamped to it, since
/// both come from catalog text.
const MAX_FIELD_WIDTH: usize = 256;

#[derive(Debug, Default)]
struct Spec {
    left_align: bool,
    zero_pad: bool,
    plus_sign: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Substitutes `values` into `format`.
pub fn sprintf(format: &str, values: &Values) -> String {
    let chars: Vec<char> = format.chars().collect();
    let mut out = String::with_capacity(format.len());
    let mut next_positional = 0;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '%' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        if chars.get(i + 1) == Some(&'%') {
            out.push('%');
            i += 2;
            continue;
        }
        match parse_placeholder(&chars, i + 1) {
            Some((argument, spec, conversion, end)) => {
                let value = match argument {
                    Argument::Next => {
                        let value = values.positional(next_positional);
                        next_positional += 1;
                        value
                    }
                    Argument::Index(index) => values.positional(index),
                    Argument::Name(name) => values.by_name(&name),
                };
                out.push_str(&render(value, &spec, conversion));
                i = end;
            }
            None => {
                out.push('%');
                i += 1;
            }
        }
    }
    out
}

enum Argument {
    Next,
    Index(usize),
    Name(String),
}

/// Parses the placeholder starting right after a `%`. Returns the argument
/// reference, the flags, the conversion character and the index following
/// the placeholder.
fn parse_placeholder(chars: &[char], start: usize) -> Option<(Argument, Spec, char, usize)> {
    let mut i = start;
    let mut argument = Argument::Next;

    if chars.get(i) == Some(&'(') {
        let close = chars[i + 1..].iter().position(|&c| c == ')')? + i + 1;
        let name: String = chars[i + 1..close].iter().collect();
        if name.is_empty() {
            return None;
        }
        argument = Argument::Name(name);
        i = close + 1;
    } else {
        let digits_end = chars[i..]
            .iter()
            .position(|c| !c.is_ascii_digit())
            .map_or(chars.len(), |p| p + i);
        if digits_end > i && chars.get(digits_end) == Some(&'$') {
            let position: usize = chars[i..digits_end].iter().collect::<String>().parse().ok()?;
            argument = Argument::Index(position.checked_sub(1)?);
            i = digits_end + 1;
        }
    }

    let mut spec = Spec::default();
    while let Some(&flag) = chars.get(i) {
        match flag {
            '-' => spec.left_align = true,
            '0' => spec.zero_pad = true,
            '+' => spec.plus_sign = true,
            _ => break,
        }
        i += 1;
    }

    let (width, after_width) = read_number(chars, i);
    spec.width = width.filter(|width| *width <= MAX_FIELD_WIDTH);
    i = after_width;

    if chars.get(i) == Some(&'.') {
        let (precision, after_precision) = read_number(chars, i + 1);
        spec.precision = Some(precision.map_or(0, |p| p.min(MAX_FIELD_WIDTH)));
        i = after_precision;
    }

    let conversion = *chars.get(i)?;
    if !matches!(conversion, 's' | 'd' | 'i' | 'f' | 'x' | 'X' | 'o' | 'b') {
        return None;
    }
    Some((argument, spec, conversion, i + 1))
}

fn read_number(chars: &[char], start: usize) -> (Option<usize>, usize) {
    let end = chars[start.min(chars.len())..]
        .iter()
        .position(|c| !c.is_ascii_digit())
        .map_or(chars.len(), |p| p + start);
    if end == start {
        return (None, start);
    }
    (chars[start..end].iter().collect::<String>().parse().ok(), end)
}

fn render(value: Option<&FormatValue>, spec: &Spec, conversion: char) -> String {
    let Some(value) = value else {
        return String::new();
    };

    let (body, numeric, negative) = match conversion {
        's' => {
            let mut text = value.to_string();
            if let Some(precision) = spec.precision {
                text = text.chars().take(precision).collect();
            }
            (text, false, false)
        }
        'd' | 'i' => match value.as_i64() {
            Some(n) => (n.unsigned_abs().to_string(), true, n < 0),
            None => (value.to_string(), false, false),
        },
        'f' => match value.as_f64() {
            Some(n) => {
                let magnitude = n.abs();
                let text = match spec.precision {
                    Some(precision) => format!("{:.*}", precision, magnitude),
                    None => magnitude.to_string(),
                };
                (text, true, n.is_sign_negative() && n != 0.0)
            }
            None => (value.to_string(), false, false),
        },
        'x' | 'X' | 'o' | 'b' => match value.as_i64() {
            Some(n) => {
                let magnitude = n.unsigned_abs();
                let text = match conversion {
                    'x' => format!("{:x}", magnitude),
                    'X' => format!("{:X}", magnitude),
                    'o' => format!("{:o}", magnitude),
                    _ => format!("{:b}", magnitude),
                };
                (text, true, n < 0)
            }
            None => (value.to_string(), false, false),
        },
        _ => (value.to_string(), false, false),
    };

    let sign = if numeric && negative {
        "-"
    } else if numeric && spec.plus_sign {
        "+"
    } else {
        ""
    };

    let len = sign.chars().count() + body.chars().count();
    let padding = spec.width.unwrap_or(0).saturating_sub(len);
    if padding == 0 {
        return format!("{}{}", sign, body);
    }
    if spec.left_align {
        format!("{}{}{}", sign, body, " ".repeat(padding))
    } else if spec.zero_pad && numeric {
        format!("{}{}{}", sign, "0".repeat(padding), body)
    } else {
        format!("{}{}{}", " ".repeat(padding), sign, body)
    }
}
