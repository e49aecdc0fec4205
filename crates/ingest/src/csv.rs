//! RFC 4180 style CSV parsing
//!
//! A single left-to-right scan with one character of lookahead. Quoted fields
//! may carry commas, line breaks and doubled quotes, so the input is never
//! split on delimiters up front.

/// One parsed row: the ordered field values.
pub type Row = Vec<String>;

/// Parse raw CSV text into rows of fields.
///
/// Rows made only of empty fields (blank lines included) are dropped, and the
/// last row is kept even without a trailing line break.
pub fn parse_csv(text: &str) -> Vec<Row> {
  let mut rows = Vec::new();
  let mut row = Row::new();
  let mut field = String::new();
  let mut in_quotes = false;
  let mut chars = text.chars().peekable();

  while let Some(c) = chars.next() {
    if in_quotes {
      match c {
        '"' if chars.peek() == Some(&'"') => {
          chars.next();
          field.push('"');
        }
        '"' => in_quotes = false,
        _ => field.push(c),
      }
      continue;
    }

    match c {
      '"' => in_quotes = true,
      ',' => row.push(std::mem::take(&mut field)),
      '\r' => {
        if chars.peek() == Some(&'\n') {
          chars.next();
        }
        end_row(&mut rows, &mut row, &mut field);
      }
      '\n' => end_row(&mut rows, &mut row, &mut field),
      _ => field.push(c),
    }
  }

  end_row(&mut rows, &mut row, &mut field);
  rows
}

fn end_row(rows: &mut Vec<Row>, row: &mut Row, field: &mut String) {
  row.push(std::mem::take(field));
  let finished = std::mem::take(row);
  if finished.iter().any(|value| !value.is_empty()) {
    rows.push(finished);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row(fields: &[&str]) -> Row {
    fields.iter().map(|f| f.to_string()).collect()
  }

  #[test]
  fn test_single_unquoted_field() {
    assert_eq!(parse_csv("hello"), vec![row(&["hello"])]);
  }

  #[test]
  fn test_simple_rows_with_trailing_newline() {
    let rows = parse_csv("a,b,c\n1,2,3\n");
    assert_eq!(rows, vec![row(&["a", "b", "c"]), row(&["1", "2", "3"])]);
  }

  #[test]
  fn test_quoted_field_keeps_comma_and_newline() {
    let rows = parse_csv("id,text\n1,\"a,b\nc\"\n");
    assert_eq!(rows, vec![row(&["id", "text"]), row(&["1", "a,b\nc"])]);
  }

  #[test]
  fn test_doubled_quote_decodes_to_single_quote() {
    let rows = parse_csv("\"she said \"\"hi\"\"\",x");
    assert_eq!(rows, vec![row(&["she said \"hi\"", "x"])]);
  }

  #[test]
  fn test_crlf_counts_as_one_break() {
    let rows = parse_csv("a,b\r\nc,d\r\n");
    assert_eq!(rows, vec![row(&["a", "b"]), row(&["c", "d"])]);
  }

  #[test]
  fn test_blank_lines_are_dropped() {
    let rows = parse_csv("\n\na,b\n\n\r\n,\nc,d\n\n");
    assert_eq!(rows, vec![row(&["a", "b"]), row(&["c", "d"])]);
  }

  #[test]
  fn test_empty_input_has_no_rows() {
    assert!(parse_csv("").is_empty());
  }

  #[test]
  fn test_empty_fields_inside_a_row_are_kept() {
    let rows = parse_csv("a,,c\n");
    assert_eq!(rows, vec![row(&["a", "", "c"])]);
  }

  #[test]
  fn test_crlf_inside_quotes_is_literal() {
    let rows = parse_csv("\"line1\r\nline2\",z");
    assert_eq!(rows, vec![row(&["line1\r\nline2", "z"])]);
  }
}
