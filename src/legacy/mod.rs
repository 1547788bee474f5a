//! Helpers for the older line-per-directive script dialect.
//!
//! Scripts in this dialect are read one normalized line at a time.  A line
//! is a command word followed by whitespace separated parameters, and
//! blocks are delimited by lines holding a lone `{` or `}`.
pub mod convert;

pub use convert::{
    HelperError, parse_bool, parse_color, parse_color_str, parse_float, parse_vector3,
    parse_vector4,
};

use std::io::{self, BufRead};

use log::warn;

use crate::model::ColorEx;

/// Reads the next line with tabs turned into spaces and the ends trimmed.
/// Runs of spaces are collapsed unless the line is a `//` comment.
/// Returns `None` at the end of the stream.
pub fn read_line(reader: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut raw = String::new();
    if reader.read_line(&mut raw)? == 0 {
        return Ok(None);
    }

    let line = raw.replace('\t', " ");
    let line = line.trim();

    if line.is_empty() || !line.contains(' ') || line.starts_with("//") {
        return Ok(Some(line.to_string()));
    }

    let collapsed = line
        .split(' ')
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Ok(Some(collapsed))
}

/// Splits a normalized line into its command and parameter words.
pub fn split_line(line: &str) -> Vec<&str> {
    line.split([' ', '\t']).filter(|s| !s.is_empty()).collect()
}

/// Everything after the command word.
pub fn get_params<'a>(values: &[&'a str]) -> Vec<&'a str> {
    values.iter().skip(1).copied().collect()
}

fn skip_to(reader: &mut impl BufRead, delimiter: &str) -> io::Result<()> {
    while let Some(line) = read_line(reader)? {
        if line == delimiter {
            break;
        }
    }
    Ok(())
}

/// Consumes lines up to and including the next `{`, or to the end.
pub fn skip_to_next_open_brace(reader: &mut impl BufRead) -> io::Result<()> {
    skip_to(reader, "{")
}

/// Consumes lines up to and including the next `}`, or to the end.
pub fn skip_to_next_close_brace(reader: &mut impl BufRead) -> io::Result<()> {
    skip_to(reader, "}")
}

/// Reports a directive that could not be applied.  Loading carries on.
pub fn log_parser_error(attribute: &str, context: &str, reason: &str) {
    warn!("bad attribute line: `{attribute}` in {context}. Reason: {reason}");
}

/// Colour argument of a directive such as `ambient 1 1 1` inside the
/// object named `context`.  The directive must carry 3 or 4 values; a bad
/// one is logged and yields `None`.
pub fn parse_color_directive(values: &[&str], context: &str) -> Option<ColorEx> {
    let attribute = values.first().copied().unwrap_or_default();
    let params = get_params(values);

    if params.len() != 3 && params.len() != 4 {
        log_parser_error(
            attribute,
            context,
            "wrong number of parameters (expected 3 or 4)",
        );
        return None;
    }

    match parse_color(&params) {
        Ok(color) => Some(color),
        Err(e) => {
            log_parser_error(attribute, context, &e.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn all_lines(src: &str) -> Vec<String> {
        let mut reader = Cursor::new(src);
        let mut lines = Vec::new();
        while let Some(line) = read_line(&mut reader).unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn test_read_line_normalizes() {
        let test_cases = vec![
            ("ambient  1   0.5\t0.25\n", "ambient 1 0.5 0.25"),
            ("\t\tdiffuse\t1 1 1 1\r\n", "diffuse 1 1 1 1"),
            ("   {   \n", "{"),
            ("\n", ""),
            ("//  keep   this   spacing\n", "//  keep   this   spacing"),
            ("lighting off", "lighting off"),
        ];

        for (src, expected) in test_cases {
            assert_eq!(all_lines(src), vec![expected.to_string()], "input: {src:?}");
        }
    }

    #[test]
    fn test_read_line_end_of_stream() {
        let mut reader = Cursor::new("one\ntwo");
        assert_eq!(read_line(&mut reader).unwrap().as_deref(), Some("one"));
        assert_eq!(read_line(&mut reader).unwrap().as_deref(), Some("two"));
        assert_eq!(read_line(&mut reader).unwrap(), None);
        assert_eq!(read_line(&mut reader).unwrap(), None);
    }

    #[test]
    fn test_skip_to_braces() {
        let src = "material Foo\n// comment\n  {  \n pass\n {\n }\n}\nmaterial Bar\n";
        let mut reader = Cursor::new(src);

        skip_to_next_open_brace(&mut reader).unwrap();
        assert_eq!(read_line(&mut reader).unwrap().as_deref(), Some("pass"));

        skip_to_next_close_brace(&mut reader).unwrap();
        skip_to_next_close_brace(&mut reader).unwrap();
        assert_eq!(read_line(&mut reader).unwrap().as_deref(), Some("material Bar"));

        // runs off the end without complaint
        skip_to_next_open_brace(&mut reader).unwrap();
        assert_eq!(read_line(&mut reader).unwrap(), None);
    }

    #[test]
    fn test_parse_color_directive() {
        let test_cases = vec![
            ("ambient 1 0.5 0.25", Some(ColorEx::new(1.0, 0.5, 0.25, 1.0))),
            ("diffuse 0 0 0 0.5", Some(ColorEx::new(0.0, 0.0, 0.0, 0.5))),
            ("ambient 1 1", None),
            ("ambient 1 1 1 1 1", None),
            ("specular 1 red 1", None),
            ("", None),
        ];

        for (line, expected) in test_cases {
            let values = split_line(line);
            assert_eq!(
                parse_color_directive(&values, "Examples/Rock"),
                expected,
                "line: {line:?}"
            );
        }
    }

    #[test]
    fn test_split_and_params() {
        let test_cases = vec![
            ("ambient 1 0.5 0.25", vec!["1", "0.5", "0.25"]),
            ("lighting", vec![]),
            ("texture  \"a b.png\"", vec!["\"a", "b.png\""]),
        ];

        for (line, expected) in test_cases {
            let values = split_line(line);
            assert_eq!(get_params(&values), expected, "line: {line:?}");
        }
    }
}
