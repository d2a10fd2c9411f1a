//! Date parsing for date operators and date sorting
//!
//! Date formats use the `Y-m-d` letter style. They are translated once
//! into chrono strftime patterns before parsing.
//!
//! Fields a format leaves out are filled in: month and day default to 1,
//! the time of day to midnight, and a format without any date part
//! (`H:i`) puts every value on 1970-01-01.

use chrono::format::{self, Parsed, StrftimeItems};
use chrono::NaiveDateTime;
use serde_json::Value;

/// A parsed date format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    source: String,
    pattern: String,
    has_date: bool,
    has_timestamp: bool,
}

impl DateFormat {
    /// Translates a `Y-m-d` style format.
    ///
    /// Letters without a translation and a backslash-escaped character are
    /// kept as literals.
    pub fn new(format: &str) -> Self {
        let mut pattern = String::with_capacity(format.len() * 2);
        let mut has_date = false;
        let mut has_timestamp = false;
        let mut chars = format.chars();

        while let Some(c) = chars.next() {
            match c {
                'Y' | 'y' | 'd' | 'j' | 'm' | 'n' | 'M' | 'F' => has_date = true,
                'U' => has_timestamp = true,
                _ => {}
            }

            let translated = match c {
                'd' => "%d",
                'j' => "%-d",
                'm' => "%m",
                'n' => "%-m",
                'Y' => "%Y",
                'y' => "%y",
                'H' => "%H",
                'G' => "%-H",
                'h' => "%I",
                'g' => "%-I",
                'i' => "%M",
                's' => "%S",
                'A' | 'a' => "%p",
                'D' => "%a",
                'l' => "%A",
                'M' => "%b",
                'F' => "%B",
                'U' => "%s",
                '%' => "%%",
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        push_literal(&mut pattern, escaped);
                    }
                    continue;
                }
                other => {
                    push_literal(&mut pattern, other);
                    continue;
                }
            };
            pattern.push_str(translated);
        }

        Self {
            source: format.to_string(),
            pattern,
            has_date,
            has_timestamp,
        }
    }

    /// The format as given
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The chrono strftime pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parses a string into a date-time, filling in the fields the format
    /// does not carry.
    pub fn parse_str(&self, input: &str) -> Option<NaiveDateTime> {
        let mut parsed = Parsed::new();
        format::parse(&mut parsed, input, StrftimeItems::new(&self.pattern)).ok()?;

        if !self.has_timestamp {
            self.fill_defaults(&mut parsed);
        }
        parsed.to_naive_datetime_with_offset(0).ok()
    }

    // A setter fails when the field already holds a parsed value, which
    // is then kept.
    fn fill_defaults(&self, parsed: &mut Parsed) {
        if !self.has_date {
            let _ = parsed.set_year(1970);
        }
        let _ = parsed.set_month(1);
        let _ = parsed.set_day(1);
        let _ = parsed.set_ampm(false);
        let _ = parsed.set_hour(0);
        let _ = parsed.set_minute(0);
        let _ = parsed.set_second(0);
    }

    /// Parses a JSON value. Strings and numbers are parsed; anything else
    /// is not a date.
    pub fn parse(&self, value: &Value) -> Option<NaiveDateTime> {
        match value {
            Value::String(s) => self.parse_str(s),
            Value::Number(n) => self.parse_str(&n.to_string()),
            _ => None,
        }
    }
}

fn push_literal(pattern: &mut String, c: char) {
    if c == '%' {
        pattern.push_str("%%");
    } else {
        pattern.push(c);
    }
}
