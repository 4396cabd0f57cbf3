//! Date normalization: lenient parsing and `YYYY-MM-DD` rewriting.
//!
//! Parsing is month-first for ambiguous numeric dates (`01/02/2024` is
//! January 2nd). A day-first reading is only used when the first number
//! cannot be a month. Unknown words and time-of-day tokens are ignored.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::{ColumnKind, Table};
use crate::report::IssueKind;
use crate::report::summary::DATES_NORMALIZED;
use crate::schema::{ColumnRole, has_role};

use super::{CellOutcome, Rule, RuleOutcome, matching_columns, normalize_cells};

/// Output format for normalized dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

/// Date-time layouts tried before token parsing.
const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

// Splits "2024-01-02T10:30" style stamps so the time becomes its own token.
static DIGIT_T_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d)[Tt](\d)").unwrap());

static ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)(\d{1,2})(st|nd|rd|th)$").unwrap());

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

// =============================================================================
// PARSING
// =============================================================================

/// One meaningful piece of a date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    /// A run of digits and how many digits it had.
    Number { value: u32, digits: usize },
    /// A month name (1-based).
    Month(u32),
    /// A digit run too long to be any date part.
    Oversized,
}

/// Parse a date leniently. Returns `None` when no unambiguous calendar date
/// can be read, including when the day or the year is absent.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(dt.date());
        }
    }

    resolve(&tokenize(s))
}

fn tokenize(s: &str) -> Vec<Token> {
    let spaced = DIGIT_T_DIGIT.replace_all(s, "$1 $2");

    spaced
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '/' | '-' | '.'))
        .filter(|t| !t.is_empty())
        .filter_map(classify_token)
        .collect()
}

fn classify_token(token: &str) -> Option<Token> {
    // Times ("10:30", "10:30:00") and anything else with a colon.
    if token.contains(':') {
        return None;
    }

    if token.chars().all(|c| c.is_ascii_digit()) {
        return Some(match token.parse() {
            Ok(value) => Token::Number {
                value,
                digits: token.len(),
            },
            Err(_) => Token::Oversized,
        });
    }

    if let Some(caps) = ORDINAL.captures(token) {
        let value = caps[1].parse().ok()?;
        return Some(Token::Number { value, digits: caps[1].len() });
    }

    month_number(token).map(Token::Month)
}

/// Month number for a full name or an abbreviation of at least three letters.
fn month_number(word: &str) -> Option<u32> {
    if word.len() < 3 || !word.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let word = word.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|name| name.starts_with(&word))
        .map(|idx| idx as u32 + 1)
}

fn resolve(tokens: &[Token]) -> Option<NaiveDate> {
    if tokens.contains(&Token::Oversized) {
        return None;
    }

    let months: Vec<u32> = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Month(m) => Some(*m),
            _ => None,
        })
        .collect();
    let numbers: Vec<(u32, usize)> = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Number { value, digits } => Some((*value, *digits)),
            _ => None,
        })
        .collect();

    match (months.as_slice(), numbers.as_slice()) {
        // "January 5, 2024", "5 Jan 2024", "Jan 5 24"
        ([month], [first, second]) => {
            let (day, year) = if is_year(*first) && !is_year(*second) {
                (second.0, expand_year(*first)?)
            } else {
                (first.0, expand_year(*second)?)
            };
            NaiveDate::from_ymd_opt(year, *month, day)
        }
        // "20240102"
        ([], [(value, 8)]) => {
            let year = (value / 10_000) as i32;
            NaiveDate::from_ymd_opt(year, (value / 100) % 100, value % 100)
        }
        ([], [first, second, third]) => {
            if first.1 == 4 {
                // Year first: Y-M-D, or Y-D-M when the middle can't be a month.
                let year = first.0 as i32;
                let (month, day) = month_first(second.0, third.0)?;
                NaiveDate::from_ymd_opt(year, month, day)
            } else {
                let year = expand_year(*third)?;
                let (month, day) = month_first(first.0, second.0)?;
                NaiveDate::from_ymd_opt(year, month, day)
            }
        }
        _ => None,
    }
}

/// Order two numbers as (month, day), preferring the first as the month.
fn month_first(a: u32, b: u32) -> Option<(u32, u32)> {
    if a <= 12 {
        Some((a, b))
    } else if b <= 12 {
        Some((b, a))
    } else {
        None
    }
}

/// A number that can only be a year.
fn is_year((value, digits): (u32, usize)) -> bool {
    digits >= 3 || value > 31
}

/// Turn a year token into a full year. Two-digit years pivot at 69.
fn expand_year((value, digits): (u32, usize)) -> Option<i32> {
    match digits {
        4 => Some(value as i32),
        1 | 2 if value < 69 => Some(2000 + value as i32),
        1 | 2 => Some(1900 + value as i32),
        _ => None,
    }
}

// =============================================================================
// RULE
// =============================================================================

/// Rewrite dates in date-class columns as `YYYY-MM-DD`.
///
/// Native date-time columns are reformatted and become text. Text values
/// that parse are rewritten; those that don't are left as they are and
/// flagged as `unparseable_date`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeDates;

impl Rule for NormalizeDates {
    fn name(&self) -> &'static str {
        "normalize_dates"
    }

    fn apply(&self, mut table: Table) -> RuleOutcome {
        let columns = matching_columns(&table, |name| has_role(name, ColumnRole::Date));
        let mut changed = 0;
        let mut issues = Vec::new();

        for col in columns {
            let native = table.column_kind(col) == Some(ColumnKind::DateTime);
            let (count, found) = normalize_cells(&mut table, &[col], |raw| {
                let parsed = if native {
                    NaiveDateTime::parse_from_str(raw, ColumnKind::DATETIME_FORMAT)
                        .map(|dt| dt.date())
                        .ok()
                        .or_else(|| parse_date(raw))
                } else {
                    parse_date(raw)
                };
                match parsed {
                    Some(date) => CellOutcome::Normalized(date.format(DATE_FORMAT).to_string()),
                    None => CellOutcome::Flagged(IssueKind::UnparseableDate),
                }
            });
            if native {
                table.set_column_kind(col, ColumnKind::Text);
            }
            changed += count;
            issues.extend(found);
        }

        RuleOutcome::new(table)
            .with_counter(DATES_NORMALIZED, changed)
            .with_issues(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_parse_iso_and_stamps() {
        assert_eq!(parse_date("2024-01-02"), ymd(2024, 1, 2));
        assert_eq!(parse_date("2024-01-02T10:30:00Z"), ymd(2024, 1, 2));
        assert_eq!(parse_date("2024-01-02 10:30:00"), ymd(2024, 1, 2));
        assert_eq!(parse_date("2024-01-02T10:30"), ymd(2024, 1, 2));
        assert_eq!(parse_date("2024/03/15"), ymd(2024, 3, 15));
        assert_eq!(parse_date("20240102"), ymd(2024, 1, 2));
    }

    #[test]
    fn test_parse_month_first() {
        assert_eq!(parse_date("01/02/2024"), ymd(2024, 1, 2));
        assert_eq!(parse_date("1-2-24"), ymd(2024, 1, 2));
        assert_eq!(parse_date("31/01/2024"), ymd(2024, 1, 31));
        assert_eq!(parse_date("12.25.1999"), ymd(1999, 12, 25));
    }

    #[test]
    fn test_parse_month_names() {
        assert_eq!(parse_date("January 5th, 2024"), ymd(2024, 1, 5));
        assert_eq!(parse_date("5 Jan 2024"), ymd(2024, 1, 5));
        assert_eq!(parse_date("Tue, Sept 3 2024 at 10:30 pm"), ymd(2024, 9, 3));
        assert_eq!(parse_date("Mar 7 99"), ymd(1999, 3, 7));
    }

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(parse_date("01/02/68"), ymd(2068, 1, 2));
        assert_eq!(parse_date("01/02/69"), ymd(1969, 1, 2));
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(parse_date("32/13/2024"), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("March 2024"), None);
        assert_eq!(parse_date("01/02"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_overflowing_digit_run_rejects() {
        assert_eq!(parse_date("99999999999 01/02/2024"), None);
        assert_eq!(parse_date("01/02/2024 4294967296"), None);
    }

    #[test]
    fn test_normalize_dates_rule() {
        let table = Table::from_text_rows(
            ["Signup Date", "Note"],
            [
                ["01/02/2024", "01/02/2024"],
                ["32/13/2024", "x"],
                ["2024-03-04", "y"],
            ],
        );
        let outcome = NormalizeDates.apply(table);

        assert_eq!(outcome.table.get(0, 0), Some("2024-01-02"));
        assert_eq!(outcome.table.get(1, 0), Some("32/13/2024"));
        assert_eq!(outcome.table.get(2, 0), Some("2024-03-04"));
        // Non-date columns are left alone.
        assert_eq!(outcome.table.get(0, 1), Some("01/02/2024"));

        assert_eq!(outcome.counters[0].name, DATES_NORMALIZED);
        assert_eq!(outcome.counters[0].value, 1);
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].row, 1);
        assert_eq!(outcome.issues[0].issue, IssueKind::UnparseableDate);
        assert_eq!(outcome.issues[0].value, "32/13/2024");
    }

    #[test]
    fn test_native_datetime_column() {
        let mut table = Table::from_text_rows(["created"], [["2024-01-02 00:00:00"]]);
        table.set_column_kind(0, ColumnKind::DateTime);
        let outcome = NormalizeDates.apply(table);

        assert_eq!(outcome.table.get(0, 0), Some("2024-01-02"));
        assert_eq!(outcome.table.column_kind(0), Some(ColumnKind::Text));
        assert!(outcome.issues.is_empty());
    }
}
