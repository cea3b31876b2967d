//! Streaming JSON5 recipe records
//!
//! Supports single-line JSONL, several objects on one line, and multi-line
//! JSON5 objects:
//!
//! ```text
//! {output: "torch", quantity: 4, grid: ["- - -", "- coal -", "- stick -"]}
//! {
//!   // comments and trailing commas are fine
//!   output: "planks", /* block comments too */
//!   quantity: 4,
//!   grid: ["- - -", "- - -", "log - -"],
//! }
//! ```

use std::io::{BufRead, BufReader, Read};

use crate::models::RecipeRecord;

use super::ImportError;

type Parsed = Result<(usize, RecipeRecord), ImportError>;

/// Split a stream into JSON5 objects and parse each one.
///
/// Objects are delimited by tracking brace and bracket depth outside of
/// strings and comments, so one malformed object does not hide the ones after
/// it. Each entry carries the line the object starts on.
pub fn read_records<R: Read>(reader: R) -> std::io::Result<Vec<Parsed>> {
    let mut scanner = Scanner::default();
    let mut records = Vec::new();

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        scanner.feed_line(&line?, index + 1, &mut records);
    }

    if !scanner.accumulator.trim().is_empty() {
        records.push(Err(ImportError::Malformed {
            line: scanner.start_line,
            message: "unterminated recipe object".to_string(),
        }));
    }

    Ok(records)
}

/// Object boundary state carried across lines.
#[derive(Debug, Default)]
struct Scanner {
    accumulator: String,
    start_line: usize,
    brace_depth: i32,
    bracket_depth: i32,
    in_string: Option<char>,
    escape_next: bool,
    in_block_comment: bool,
}

impl Scanner {
    fn feed_line(&mut self, line: &str, line_no: usize, records: &mut Vec<Parsed>) {
        if !self.accumulator.is_empty() {
            self.accumulator.push('\n');
            // A trailing backslash continues the string onto this line
            self.escape_next = false;
        }

        let mut chars = line.chars().peekable();
        while let Some(ch) = chars.next() {
            if self.in_block_comment {
                if ch == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    self.in_block_comment = false;
                    self.keep("*/");
                } else {
                    self.keep_char(ch);
                }
                continue;
            }

            if let Some(quote) = self.in_string {
                self.accumulator.push(ch);
                if self.escape_next {
                    self.escape_next = false;
                } else if ch == '\\' {
                    self.escape_next = true;
                } else if ch == quote {
                    self.in_string = None;
                }
                continue;
            }

            match (ch, chars.peek().copied()) {
                ('/', Some('/')) => {
                    let rest: String = std::iter::once(ch).chain(chars.by_ref()).collect();
                    self.keep(&rest);
                    break;
                }
                ('/', Some('*')) => {
                    chars.next();
                    self.in_block_comment = true;
                    self.keep("/*");
                    continue;
                }
                _ => {}
            }

            if self.accumulator.is_empty() {
                if ch.is_whitespace() {
                    continue;
                }
                self.start_line = line_no;
            }
            self.accumulator.push(ch);

            match ch {
                '"' | '\'' => self.in_string = Some(ch),
                '{' => self.brace_depth += 1,
                '}' => self.brace_depth -= 1,
                '[' => self.bracket_depth += 1,
                ']' => self.bracket_depth -= 1,
                _ => {}
            }

            if ch == '}' && self.at_top_level() {
                records.push(self.flush());
            }
        }

        // Stray text outside any object is reported on the line it ends
        if !self.accumulator.is_empty() && !self.in_block_comment && self.at_top_level() {
            records.push(self.flush());
        }
    }

    fn at_top_level(&self) -> bool {
        self.brace_depth <= 0 && self.bracket_depth <= 0
    }

    /// Keep comment text only when it sits inside an object.
    fn keep(&mut self, text: &str) {
        if !self.accumulator.is_empty() {
            self.accumulator.push_str(text);
        }
    }

    fn keep_char(&mut self, ch: char) {
        if !self.accumulator.is_empty() {
            self.accumulator.push(ch);
        }
    }

    fn flush(&mut self) -> Parsed {
        let parsed = parse_record(&self.accumulator, self.start_line);
        self.accumulator.clear();
        self.brace_depth = 0;
        self.bracket_depth = 0;
        self.in_string = None;
        self.escape_next = false;
        parsed
    }
}

fn parse_record(text: &str, line: usize) -> Parsed {
    json5::from_str::<RecipeRecord>(text)
        .map(|record| (line, record))
        .map_err(|e| ImportError::Malformed { line, message: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_single_line_records() {
        let input = r#"{"output": "torch", "quantity": 4, "grid": ["- - -", "- coal -", "- stick -"]}
{"output": "planks", "quantity": 4, "grid": ["- - -", "- - -", "log - -"]}"#;
        let records = read_records(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 2);
        let (line, torch) = records[0].as_ref().unwrap();
        assert_eq!(*line, 1);
        assert_eq!(torch.output, "torch");
        assert_eq!(records[1].as_ref().unwrap().0, 2);
    }

    #[test]
    fn test_multi_line_json5() {
        let input = r#"
// leading comment
{
  output: "planks", // trailing comment with { brace
  quantity: 4,
  grid: [
    "- - -",
    "- - -",
    "log - -",
  ],
}
"#;
        let records = read_records(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 1);
        let (line, record) = records[0].as_ref().unwrap();
        assert_eq!(*line, 3);
        assert_eq!(record.grid.len(), 3);
    }

    #[test]
    fn test_braces_inside_strings() {
        let input = r#"{output: "odd}name", grid: ["{ - -", "- - -", "- - ["]}"#;
        let records = read_records(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].as_ref().unwrap().1.output, "odd}name");
    }

    #[test]
    fn test_malformed_object_does_not_stop_stream() {
        let input = "{output: torch}\n{output: \"planks\", grid: [\"log\"]}\n";
        let records = read_records(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 2);
        assert!(matches!(records[0], Err(ImportError::Malformed { line: 1, .. })));
        assert!(records[1].is_ok());
    }

    #[test]
    fn test_block_comment_with_brace() {
        let input = "{output: \"torch\", quantity: 4, /* { */\n grid: [\"- - -\", \"- coal -\", \"- stick -\"]}\n{output: \"planks\", grid: [\"- - -\", \"- - -\", \"log - -\"]}\n";
        let records = read_records(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 2);
        let (line, torch) = records[0].as_ref().unwrap();
        assert_eq!(*line, 1);
        assert_eq!(torch.output, "torch");
        let (line, planks) = records[1].as_ref().unwrap();
        assert_eq!(*line, 3);
        assert_eq!(planks.output, "planks");
    }

    #[test]
    fn test_block_comment_between_objects() {
        let input = "/* header\n { \" unbalanced\n*/\n{output: \"stick\", grid: [\"a\"]}\n";
        let records = read_records(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 1);
        let (line, stick) = records[0].as_ref().unwrap();
        assert_eq!(*line, 4);
        assert_eq!(stick.output, "stick");
    }

    #[test]
    fn test_comment_markers_inside_strings() {
        let input = r#"{output: "a/*b", grid: ["// - -"]}"#;
        let records = read_records(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 1);
        let (_, record) = records[0].as_ref().unwrap();
        assert_eq!(record.output, "a/*b");
        assert_eq!(record.grid, vec!["// - -"]);
    }

    #[test]
    fn test_several_objects_on_one_line() {
        let input = r#"{output: "torch", grid: ["a"]} {output: "planks", grid: ["b"]}"#;
        let records = read_records(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_ref().unwrap().1.output, "torch");
        assert_eq!(records[1].as_ref().unwrap().1.output, "planks");
        assert_eq!(records[1].as_ref().unwrap().0, 1);
    }

    #[test]
    fn test_unterminated_object() {
        let input = "{output: \"torch\",\n quantity: 4,\n";
        let records = read_records(Cursor::new(input)).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_err());
    }
}
