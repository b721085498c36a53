//! Minimal CSV reader for dataset files.
//!
//! Dialect: `"` quoting with `""` as an escaped quote, quoted fields may span
//! lines, `\n`, `\r\n` and lone `\r` all end a record. A blank line yields an
//! empty row; a trailing line terminator does not add a row. Fields are never
//! trimmed and the first row gets no special treatment.
//!
//! Input that ends inside a quoted field is rejected with the line the quote
//! opened on. Lenient readers keep the partial field as the last value instead;
//! this one never returns a row built from a truncated file.

use std::fmt;
use std::mem;

use crate::Table;

/// Syntax failure with the 1-based line it was detected on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CsvSyntaxError {
    pub line: usize,
    pub detail: String,
}

impl fmt::Display for CsvSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.detail)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    StartField,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

struct Reader {
    rows: Table,
    row: Vec<String>,
    field: String,
    row_started: bool,
    state: State,
    line: usize,
}

impl Reader {
    fn end_field(&mut self) {
        self.row.push(mem::take(&mut self.field));
        self.state = State::StartField;
        self.row_started = true;
    }

    fn end_row(&mut self) {
        if self.row_started {
            self.row.push(mem::take(&mut self.field));
        }
        self.rows.push(mem::take(&mut self.row));
        self.row_started = false;
        self.state = State::StartField;
        self.line += 1;
    }
}

/// Parses `text` into rows of fields split on `delimiter`.
pub(crate) fn parse(text: &str, delimiter: char) -> Result<Table, CsvSyntaxError> {
    let mut reader = Reader {
        rows: Vec::new(),
        row: Vec::new(),
        field: String::new(),
        row_started: false,
        state: State::StartField,
        line: 1,
    };
    let mut quote_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(mut c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                continue;
            }
            c = '\n';
        }

        match reader.state {
            State::StartField => match c {
                '"' => {
                    reader.state = State::Quoted;
                    reader.row_started = true;
                    quote_line = reader.line;
                }
                '\n' => reader.end_row(),
                _ if c == delimiter => reader.end_field(),
                _ => {
                    reader.field.push(c);
                    reader.state = State::Unquoted;
                    reader.row_started = true;
                }
            },
            State::Unquoted => match c {
                '\n' => reader.end_row(),
                _ if c == delimiter => reader.end_field(),
                _ => reader.field.push(c),
            },
            State::Quoted => match c {
                '"' => reader.state = State::QuoteInQuoted,
                '\n' => {
                    reader.field.push('\n');
                    reader.line += 1;
                }
                _ => reader.field.push(c),
            },
            State::QuoteInQuoted => match c {
                '"' => {
                    reader.field.push('"');
                    reader.state = State::Quoted;
                }
                '\n' => reader.end_row(),
                _ if c == delimiter => reader.end_field(),
                // text after a closing quote is kept as-is
                _ => {
                    reader.field.push(c);
                    reader.state = State::Unquoted;
                }
            },
        }
    }

    if reader.state == State::Quoted {
        return Err(CsvSyntaxError {
            line: quote_line,
            detail: "unterminated quoted field".to_string(),
        });
    }
    if reader.row_started {
        reader.end_row();
    }

    Ok(reader.rows)
}
