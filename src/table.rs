//! Parameter table: two columns (name, value) after a header row
//!
//! Values are stored as raw text and parsed as literals on read: numbers,
//! quoted strings, `True`/`False`, and `[...]`/`(...)` sequences. Anything
//! that does not parse is kept as the trimmed text.

use crate::value::{ParValue, PresetData};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;

/// Row-oriented text table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with a `name`/`value` header row
    pub fn with_header() -> Self {
        let mut table = Self::new();
        table.push_row(["name", "value"]);
        table
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Build a table from preset data, values rendered as literals
    pub fn from_preset(data: &PresetData) -> Self {
        let mut table = Self::with_header();
        for (name, value) in data {
            let text = match value {
                ParValue::Str(s) if parse_literal(s) != *value => quote(s),
                other => other.to_string(),
            };
            table.push_row([name.clone(), text]);
        }
        table
    }

    /// Parse tab-separated text, one row per line
    pub fn from_tsv(text: &str) -> Self {
        let rows = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split('\t').map(str::to_string).collect())
            .collect();
        Self { rows }
    }

    #[must_use]
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&row.join("\t"));
            out.push('\n');
        }
        out
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Data rows, header skipped
    pub fn data_rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().skip(1).map(Vec::as_slice)
    }

    /// Trimmed, non-empty names from the first column of the data rows
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.data_rows()
            .filter_map(|row| row.first())
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
    }

    /// Read name/value pairs. Rows with fewer than two cells or an empty
    /// name are skipped.
    #[must_use]
    pub fn read_pars(&self) -> PresetData {
        if self.rows.len() <= 1 {
            warn!("Parameter table has no data rows (only header)");
            return PresetData::new();
        }

        let mut pars = PresetData::new();
        for row in self.data_rows() {
            if row.len() < 2 {
                continue;
            }
            let name = row[0].trim();
            if name.is_empty() {
                continue;
            }
            pars.insert(name.to_string(), parse_literal(row[1].trim()));
        }
        pars
    }
}

/// Source of the live parameter table.
pub trait TableSource {
    /// Current table contents, `None` if the table is missing.
    fn table(&self) -> Option<Table>;
}

impl TableSource for Table {
    fn table(&self) -> Option<Table> {
        Some(self.clone())
    }
}

impl TableSource for Rc<RefCell<Table>> {
    fn table(&self) -> Option<Table> {
        Some(self.borrow().clone())
    }
}

/// Parse a literal, falling back to the text itself.
///
/// Accepts ints (including `0x`/`0o`/`0b` and `_` separators), floats,
/// quoted strings, `True`/`False`, lists and tuples. There is no null
/// value, so `None` stays the text `"None"`.
#[must_use]
pub fn parse_literal(text: &str) -> ParValue {
    let mut parser = Parser::new(text);
    match parser.top_level() {
        Some(value) if parser.at_end() => value,
        _ => ParValue::Str(text.to_string()),
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    src: &'a str,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            chars: src.char_indices().peekable(),
            src,
        }
    }

    fn skip_ws(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn at_end(&mut self) -> bool {
        self.skip_ws();
        self.chars.peek().is_none()
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        self.chars.next_if(|(_, c)| *c == expected).is_some()
    }

    /// A bare `a, b` at top level is a tuple
    fn top_level(&mut self) -> Option<ParValue> {
        let first = self.value()?;
        if !self.eat(',') {
            return Some(first);
        }
        let mut items = vec![first];
        while !self.at_end() {
            items.push(self.value()?);
            if !self.eat(',') {
                break;
            }
        }
        Some(ParValue::List(items))
    }

    fn value(&mut self) -> Option<ParValue> {
        self.skip_ws();
        let &(_, c) = self.chars.peek()?;
        match c {
            '[' => self.sequence('[', ']'),
            '(' => self.sequence('(', ')'),
            '\'' | '"' => self.string(c),
            _ => self.atom(),
        }
    }

    fn sequence(&mut self, open: char, close: char) -> Option<ParValue> {
        if !self.eat(open) {
            return None;
        }
        let mut items = Vec::new();
        loop {
            if self.eat(close) {
                return Some(ParValue::List(items));
            }
            items.push(self.value()?);
            if !self.eat(',') {
                return self.eat(close).then_some(ParValue::List(items));
            }
        }
    }

    fn string(&mut self, quote: char) -> Option<ParValue> {
        self.chars.next();
        let mut out = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                '\\' => {
                    let (_, escaped) = self.chars.next()?;
                    out.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        other => other,
                    });
                }
                c if c == quote => return Some(ParValue::Str(out)),
                c => out.push(c),
            }
        }
        None
    }

    fn atom(&mut self) -> Option<ParValue> {
        let &(start, _) = self.chars.peek()?;
        let mut end = start;
        while let Some((i, c)) = self
            .chars
            .next_if(|(_, c)| !matches!(*c, ',' | ']' | ')' | '[' | '(') && !c.is_whitespace())
        {
            end = i + c.len_utf8();
        }
        let word = &self.src[start..end];
        match word {
            "True" => Some(ParValue::Bool(true)),
            "False" => Some(ParValue::Bool(false)),
            _ => parse_number(word),
        }
    }
}

fn parse_number(word: &str) -> Option<ParValue> {
    let (negative, body) = match word.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, word.strip_prefix('+').unwrap_or(word)),
    };
    if !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let radix = match body.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = strip_digit_separators(&body[1..])?;
        let digits = &digits[1..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        let magnitude = i64::from_str_radix(digits, radix).ok()?;
        return Some(ParValue::Int(if negative { -magnitude } else { magnitude }));
    }

    let digits = strip_digit_separators(body)?;
    if digits.bytes().all(|b| b.is_ascii_digit()) {
        // `010` is not an integer literal, `000` is
        if digits.len() > 1 && digits.starts_with('0') && digits.bytes().any(|b| b != b'0') {
            return None;
        }
        if let Ok(i) = digits.parse::<i64>() {
            return Some(ParValue::Int(if negative { -i } else { i }));
        }
    }
    let f = digits.parse::<f64>().ok()?;
    Some(ParValue::Float(if negative { -f } else { f }))
}

/// Drop `_` separators, each of which must sit between two digits.
fn strip_digit_separators(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let before = i.checked_sub(1).map(|j| bytes[j]);
        let after = bytes.get(i + 1).copied();
        let is_digit = |c: Option<u8>| c.is_some_and(|c| c.is_ascii_alphanumeric());
        if !is_digit(before) || !is_digit(after) {
            return None;
        }
    }
    Some(text.replace('_', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse_literal("1"), ParValue::Int(1));
        assert_eq!(parse_literal("-3"), ParValue::Int(-3));
        assert_eq!(parse_literal("1.5"), ParValue::Float(1.5));
        assert_eq!(parse_literal(".5"), ParValue::Float(0.5));
        assert_eq!(parse_literal("1e3"), ParValue::Float(1000.0));
        assert_eq!(parse_literal("+2"), ParValue::Int(2));
        assert_eq!(parse_literal("-0.25"), ParValue::Float(-0.25));
    }

    #[test]
    fn test_parse_int_prefixes_and_separators() {
        assert_eq!(parse_literal("0x10"), ParValue::Int(16));
        assert_eq!(parse_literal("-0XfF"), ParValue::Int(-255));
        assert_eq!(parse_literal("0o17"), ParValue::Int(15));
        assert_eq!(parse_literal("0b101"), ParValue::Int(5));
        assert_eq!(parse_literal("0x_ff"), ParValue::Int(255));
        assert_eq!(parse_literal("1_000"), ParValue::Int(1000));
        assert_eq!(parse_literal("1_000.5"), ParValue::Float(1000.5));
        assert_eq!(parse_literal("000"), ParValue::Int(0));
        assert_eq!(parse_literal("010.5"), ParValue::Float(10.5));
    }

    #[test]
    fn test_malformed_numbers_are_text() {
        assert_eq!(parse_literal("010"), ParValue::from("010"));
        assert_eq!(parse_literal("1__0"), ParValue::from("1__0"));
        assert_eq!(parse_literal("1_"), ParValue::from("1_"));
        assert_eq!(parse_literal("0x"), ParValue::from("0x"));
        assert_eq!(parse_literal("0b102"), ParValue::from("0b102"));
        assert_eq!(parse_literal("--5"), ParValue::from("--5"));
        assert_eq!(parse_literal("0x-5"), ParValue::from("0x-5"));
    }

    #[test]
    fn test_parse_sequences() {
        assert_eq!(
            parse_literal("[1, 2.5, 'x']"),
            ParValue::List(vec![
                ParValue::Int(1),
                ParValue::Float(2.5),
                ParValue::from("x")
            ])
        );
        assert_eq!(
            parse_literal("(0.1, 0.2, 0.3)"),
            ParValue::from(vec![0.1, 0.2, 0.3])
        );
        assert_eq!(parse_literal("1, 2"), ParValue::List(vec![ParValue::Int(1), ParValue::Int(2)]));
        assert_eq!(parse_literal("[]"), ParValue::List(vec![]));
        assert_eq!(parse_literal("[1, [2]]").type_name(), "list");
    }

    #[test]
    fn test_parse_strings_and_bools() {
        assert_eq!(parse_literal("'hello world'"), ParValue::from("hello world"));
        assert_eq!(parse_literal("\"it's\""), ParValue::from("it's"));
        assert_eq!(parse_literal("True"), ParValue::Bool(true));
    }

    #[test]
    fn test_unparsable_falls_back_to_text() {
        assert_eq!(parse_literal("add"), ParValue::from("add"));
        assert_eq!(parse_literal("inf"), ParValue::from("inf"));
        assert_eq!(parse_literal("None"), ParValue::from("None"));
        assert_eq!(parse_literal("[1, 2"), ParValue::from("[1, 2"));
        assert_eq!(parse_literal("/project1/geo1"), ParValue::from("/project1/geo1"));
        assert_eq!(parse_literal("1 2"), ParValue::from("1 2"));
    }

    #[test]
    fn test_read_pars_skips_header_and_bad_rows() {
        let table = Table::from_tsv("name\tvalue\nTx\t0.5\n\t3\nSolo\nMode\tadd\n");
        let pars = table.read_pars();
        assert_eq!(pars.len(), 2);
        assert_eq!(pars["Tx"], ParValue::Float(0.5));
        assert_eq!(pars["Mode"], ParValue::from("add"));
    }

    #[test]
    fn test_read_pars_header_only() {
        assert!(Table::with_header().read_pars().is_empty());
        assert!(Table::new().read_pars().is_empty());
    }

    #[test]
    fn test_from_preset_reads_back() {
        let mut data = PresetData::new();
        data.insert("Tx".into(), ParValue::Float(1.0));
        data.insert("Count".into(), ParValue::Int(4));
        data.insert("Label".into(), ParValue::from("12"));
        data.insert("Mode".into(), ParValue::from("add"));
        data.insert("Color".into(), ParValue::from(vec![1.0, 0.5, 0.0]));

        let table = Table::from_preset(&data);
        let tsv = table.to_tsv();
        assert_eq!(Table::from_tsv(&tsv).read_pars(), data);
    }

    #[test]
    fn test_names() {
        let table = Table::from_tsv("name\tvalue\n Tx \t1\n\t2\nTy\n");
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["Tx", "Ty"]);
    }
}
