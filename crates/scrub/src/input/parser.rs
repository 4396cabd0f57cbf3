//! Delimited text parser (CSV/TSV) with delimiter detection.

use std::io::{BufRead, BufReader};

use crate::config::LoaderConfig;
use crate::error::{Result, ScrubError};

use super::source::{ColumnKind, Table};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parses delimited text into a [`Table`].
pub struct DelimitedParser {
    config: LoaderConfig,
}

impl DelimitedParser {
    /// Create a parser with the given configuration.
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Resolve the delimiter: explicit config, then the extension hint, then detection.
    pub fn resolve_delimiter(&self, bytes: &[u8], hint: Option<u8>) -> Result<u8> {
        match self.config.delimiter.or(hint) {
            Some(d) => Ok(d),
            None => detect_delimiter(bytes),
        }
    }

    /// Parse bytes into a table. Empty fields load as missing.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.records();

        let headers: Vec<String> = if self.config.has_header {
            match records.next() {
                Some(record) => record?.iter().map(|s| s.to_string()).collect(),
                None => return Err(ScrubError::EmptyData("No header row found".to_string())),
            }
        } else {
            Vec::new()
        };

        let mut rows: Vec<Vec<Option<String>>> = Vec::new();
        for result in records {
            let record = result?;
            let row = record
                .iter()
                .map(|s| {
                    if s.is_empty() {
                        None
                    } else {
                        Some(s.to_string())
                    }
                })
                .collect();
            rows.push(row);
        }

        // Generate column names when the file has no header
        let headers = if self.config.has_header {
            headers
        } else {
            let width = rows.iter().map(Vec::len).max().unwrap_or(0);
            (0..width).map(|i| format!("column_{}", i + 1)).collect()
        };

        if headers.is_empty() {
            return Err(ScrubError::EmptyData("No columns found".to_string()));
        }

        let mut table = Table::new(headers, Vec::new(), rows);
        for idx in 0..table.column_count() {
            let kind = ColumnKind::infer(table.column_values(idx));
            table.set_column_kind(idx, kind);
        }

        Ok(table)
    }
}

impl Default for DelimitedParser {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

/// Lines sampled when guessing the delimiter.
const SAMPLE_LINES: usize = 10;

/// Guess the delimiter from the first non-blank lines.
///
/// A candidate must appear on the first sampled line. Candidates that split
/// every line into the same number of fields beat ones that don't, and tab
/// wins a tie. Falls back to comma when nothing splits the header.
pub fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let sample: Vec<String> = BufReader::new(bytes)
        .lines()
        .filter_map(|line| line.ok())
        .filter(|line| !line.trim().is_empty())
        .take(SAMPLE_LINES)
        .collect();

    if sample.is_empty() {
        return Err(ScrubError::EmptyData("No lines to analyze".to_string()));
    }

    let best = DELIMITERS
        .iter()
        .map(|&delim| (delim, delimiter_score(&sample, delim)))
        .filter(|&(_, score)| score > 0)
        .fold(None, |best: Option<(u8, usize)>, candidate| match best {
            Some(current) if current.1 >= candidate.1 => Some(current),
            _ => Some(candidate),
        });

    Ok(best.map_or(b',', |(delim, _)| delim))
}

/// Score one candidate over the sampled lines. Zero means "not a candidate".
fn delimiter_score(sample: &[String], delim: u8) -> usize {
    let counts: Vec<usize> = sample
        .iter()
        .map(|line| unquoted_occurrences(line, delim))
        .collect();

    let header = counts[0];
    if header == 0 {
        return 0;
    }

    if counts.iter().all(|&c| c == header) {
        let tab_bonus = if delim == b'\t' { 100 } else { 0 };
        return header * 1000 + tab_bonus;
    }

    let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
    let spread = counts
        .iter()
        .map(|&c| (c as f64 - mean).powi(2))
        .sum::<f64>()
        / counts.len() as f64;

    if spread < 1.0 { header * 100 } else { header }
}

/// How often `delim` occurs outside double-quoted spans.
fn unquoted_occurrences(line: &str, delim: u8) -> usize {
    let delim = delim as char;
    let mut quoted = false;

    line.chars()
        .filter(|&ch| {
            if ch == '"' {
                quoted = !quoted;
            }
            ch == delim && !quoted
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_ignores_quoted_commas() {
        let data = b"name;note\n\"Smith, J\";x\n\"Doe, A\";y";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_detect_delimiter_prefers_consistent_split() {
        // Pipes split every line evenly; the stray commas don't.
        let data = b"id|name\n1|Smith, J\n2|Doe";
        assert_eq!(detect_delimiter(data).unwrap(), b'|');
        assert_eq!(detect_delimiter(b"single\nvalue").unwrap(), b',');
    }

    #[test]
    fn test_parse_csv() {
        let parser = DelimitedParser::default();
        let data = b"name,age,city\nAlice,30,NYC\nBob,,LA";
        let table = parser.parse_bytes(data, b',').unwrap();

        assert_eq!(table.headers, vec!["name", "age", "city"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some("Alice"));
        assert_eq!(table.get(1, 1), None);
        assert_eq!(table.column_kind(1), Some(ColumnKind::Number));
        assert_eq!(table.column_kind(0), Some(ColumnKind::Text));
    }

    #[test]
    fn test_parse_header_only() {
        let parser = DelimitedParser::default();
        let table = parser.parse_bytes(b"a,b\n", b',').unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_parse_ragged_rows() {
        let parser = DelimitedParser::default();
        let table = parser.parse_bytes(b"a,b,c\n1\n1,2,3,4\n", b',').unwrap();
        assert!(table.rows.iter().all(|r| r.len() == 3));
        assert_eq!(table.get(0, 2), None);
    }

    #[test]
    fn test_parse_without_header() {
        let parser = DelimitedParser::new(LoaderConfig {
            has_header: false,
            ..LoaderConfig::default()
        });
        let table = parser.parse_bytes(b"x,y\nz,w\n", b',').unwrap();
        assert_eq!(table.headers, vec!["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_parse_empty_input() {
        let parser = DelimitedParser::default();
        assert!(matches!(
            parser.parse_bytes(b"", b','),
            Err(ScrubError::EmptyData(_))
        ));
    }
}
