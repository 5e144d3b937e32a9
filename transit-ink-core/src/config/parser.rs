//! Minimal `settings.toml` line parser
//!
//! Handles only the flat subset CircuitPython-style settings files use. It
//! does NOT support the full TOML spec.
//!
//! Supported features:
//! - `KEY = value` pairs (quoted string or bare integer)
//! - Basic string escapes (`\"`, `\\`, `\n`, `\t`)
//! - Comments (`# ...`), including trailing comments
//!
//! NOT supported:
//! - Section headers (rejected as a syntax error)
//! - Multi-line strings, arrays, tables, datetimes

use heapless::String;

/// Low-level parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line is neither blank, a comment, nor `KEY = value`
    Syntax,
    /// Value does not fit its fixed-capacity buffer
    TooLong,
    /// Value has the wrong type or an unknown escape
    InvalidValue,
}

/// One `KEY = value` entry, with the raw (still quoted) value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    /// 1-based line number
    pub line: usize,
    pub key: &'a str,
    pub value: &'a str,
}

/// Iterate over the entries of a settings file
///
/// Yields `Err((line, ParseError::Syntax))` for malformed lines and keeps
/// going.
pub fn entries(input: &str) -> impl Iterator<Item = Result<Entry<'_>, (usize, ParseError)>> {
    input.lines().enumerate().filter_map(|(idx, line)| {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        match parse_key_value(line) {
            Some((key, value)) => Some(Ok(Entry {
                line: idx + 1,
                key,
                value,
            })),
            None => Some(Err((idx + 1, ParseError::Syntax))),
        }
    })
}

/// Split `KEY = value`, dropping any trailing comment
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    if line.starts_with('[') {
        return None;
    }

    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    Some((key, value))
}

/// Remove a trailing `# comment` that is not inside a string
fn strip_comment(value: &str) -> &str {
    let mut in_string = false;
    let mut escaped = false;

    for (pos, ch) in value.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '#' if !in_string => return value[..pos].trim_end(),
            _ => {}
        }
    }

    value
}

/// Parse a string value into a fixed-capacity buffer
///
/// Quoted values are unescaped; bare values are taken as-is.
pub fn parse_string<const N: usize>(value: &str) -> Result<String<N>, ParseError> {
    let mut out = String::new();

    let quoted = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');
    if !quoted {
        out.push_str(value).map_err(|_| ParseError::TooLong)?;
        return Ok(out);
    }

    let mut chars = value[1..value.len() - 1].chars();
    while let Some(ch) = chars.next() {
        let ch = if ch == '\\' {
            match chars.next() {
                Some('"') => '"',
                Some('\\') => '\\',
                Some('n') => '\n',
                Some('t') => '\t',
                _ => return Err(ParseError::InvalidValue),
            }
        } else if ch == '"' {
            // Unescaped quote in the middle of a string
            return Err(ParseError::InvalidValue);
        } else {
            ch
        };
        out.push(ch).map_err(|_| ParseError::TooLong)?;
    }

    Ok(out)
}

/// Parse an integer value (bare or quoted)
pub fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    value.parse().map_err(|_| ParseError::InvalidValue)
}
