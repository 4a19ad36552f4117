//! Field codec - one `key:value` line per field
//!
//! Values are not escaped. A value containing the separator token, or a
//! line whose only `:` is its last character, cannot be represented; such
//! lines are dropped on read. Likewise a literal `"null"` string comes back
//! as an absent value.

use std::collections::HashSet;
use std::fmt::{self, Display};
use std::io::{self, Write};

use super::constants::{
    FILTER_RANGE_DELIMITER, LIST_DELIMITER, NULL_TOKEN, RANGE_DELIMITER, SEPARATOR,
};
use super::types::{Color, FloatRange, IntRange, QualityCategory, QualityRange};

// =============================================================================
// FIELD CODEC
// =============================================================================

/// One decoded line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// The record separator sentinel
    Separator,
    /// A named value; `None` when the file holds the null token
    Value { key: String, value: Option<String> },
}

/// Encode a field as a single line (without trailing newline)
pub fn encode_field(key: &str, value: &str) -> String {
    let value = if value.is_empty() { NULL_TOKEN } else { value };
    format!("{}:{}", key, value)
}

/// Decode one line, returning `None` for lines that must be skipped
///
/// Malformed lines are empty, have no `:`, or end with their first `:`.
pub fn decode_line(line: &str) -> Option<Field> {
    let line = line.trim();
    if line == SEPARATOR {
        return Some(Field::Separator);
    }

    let idx = line.find(':')?;
    if idx >= line.len() - 1 {
        return None;
    }

    let key = &line[..idx];
    let value = &line[idx + 1..];
    let value = if value == NULL_TOKEN {
        None
    } else {
        Some(value.to_string())
    };

    Some(Field::Value {
        key: key.to_string(),
        value,
    })
}

/// Line-oriented field writer used by every container
pub struct FieldWriter<W: Write> {
    inner: W,
}

impl<W: Write> FieldWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_field(&mut self, key: &str, value: impl Display) -> io::Result<()> {
        let value = value.to_string();
        writeln!(self.inner, "{}", encode_field(key, &value))
    }

    pub fn write_separator(&mut self) -> io::Result<()> {
        writeln!(self.inner, "{}", SEPARATOR)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

// =============================================================================
// VALUE FORMATS
// =============================================================================

/// A field whose value could not be parsed into its expected type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidValue {
    pub key: String,
    pub value: Option<String>,
}

impl fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid value [{}] for field [{}]",
            self.value.as_deref().unwrap_or(NULL_TOKEN),
            self.key
        )
    }
}

impl std::error::Error for InvalidValue {}

/// Parse a required field value, null included as invalid
pub fn require<T>(
    key: &str,
    value: Option<&str>,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, InvalidValue> {
    value.and_then(parse).ok_or_else(|| InvalidValue {
        key: key.to_string(),
        value: value.map(str::to_string),
    })
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub fn parse_int(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

pub fn parse_float(value: &str) -> Option<f32> {
    value.trim().parse().ok()
}

/// Round to `decimals` places for writing
pub fn round_to(value: f32, decimals: i32) -> f32 {
    let factor = 10f64.powi(decimals);
    ((value as f64 * factor).round() / factor) as f32
}

fn split_pair(value: &str, delimiter: char) -> Option<(&str, &str)> {
    let (min, max) = value.split_once(delimiter)?;
    // Only the first two parts are meaningful
    let max = max.split(delimiter).next().unwrap_or(max);
    Some((min, max))
}

/// Parse `min~max`
pub fn parse_int_range(value: &str) -> Option<IntRange> {
    let (min, max) = split_pair(value, RANGE_DELIMITER)?;
    Some(IntRange::new(parse_int(min)?, parse_int(max)?))
}

/// Parse `min~max`
pub fn parse_float_range(value: &str) -> Option<FloatRange> {
    let (min, max) = split_pair(value, RANGE_DELIMITER)?;
    Some(FloatRange::new(parse_float(min)?, parse_float(max)?))
}

/// Parse `min<delimiter>max` with quality names or ordinals
pub fn parse_quality_range(value: &str, delimiter: char) -> Option<QualityRange> {
    let (min, max) = split_pair(value, delimiter)?;
    Some(QualityRange::new(
        QualityCategory::from_name(min)?,
        QualityCategory::from_name(max)?,
    ))
}

/// Filter hit points as `min:max`, two decimals
pub fn format_hit_points(range: FloatRange) -> String {
    format!(
        "{}{}{}",
        round_to(range.min, 2),
        FILTER_RANGE_DELIMITER,
        round_to(range.max, 2)
    )
}

pub fn parse_hit_points(value: &str) -> Option<FloatRange> {
    let (min, max) = split_pair(value, FILTER_RANGE_DELIMITER)?;
    Some(FloatRange::new(parse_float(min)?, parse_float(max)?))
}

/// Filter qualities as `min:max`
pub fn format_qualities(range: QualityRange) -> String {
    format!("{}{}{}", range.min, FILTER_RANGE_DELIMITER, range.max)
}

/// Parse `r,g,b,a`
pub fn parse_color(value: &str) -> Option<Color> {
    let parts = value
        .split(',')
        .map(parse_float)
        .collect::<Option<Vec<f32>>>()?;
    match parts.as_slice() {
        [r, g, b, a] => Some(Color::new(*r, *g, *b, *a)),
        _ => None,
    }
}

/// Join definition names with `/`
pub fn join_names<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for name in names {
        if !out.is_empty() {
            out.push(LIST_DELIMITER);
        }
        out.push_str(name);
    }
    out
}

/// Split a `/`-joined list into a lookup set
pub fn split_names(value: &str) -> HashSet<&str> {
    value.split(LIST_DELIMITER).collect()
}
