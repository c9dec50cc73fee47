//! Parser for query-call expressions.
//!
//! Grammar: `op(arg, key=value, ...)`, one call, no nesting. Values are
//! quoted strings, bare words (names, ISO dates), or numbers. The parser
//! accepts positional and named arguments in any mix; the executor decides
//! what each operation requires.

use crate::error::{Result, RollcallError};

/// A parsed query call.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCall {
    /// Operation name.
    pub op: String,
    /// Arguments in written order.
    pub args: Vec<Arg>,
}

/// One argument of a query call.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    /// Keyword, for `key=value` arguments.
    pub name: Option<String>,
    pub value: String,
}

impl QueryCall {
    /// Parses a single call expression.
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input).parse_call()
    }

    /// Looks up an argument by keyword first, then by position among the
    /// unnamed arguments.
    pub fn arg(&self, name: &str, position: usize) -> Option<&str> {
        if let Some(arg) = self
            .args
            .iter()
            .find(|a| a.name.as_deref() == Some(name))
        {
            return Some(&arg.value);
        }
        self.args
            .iter()
            .filter(|a| a.name.is_none())
            .nth(position)
            .map(|a| a.value.as_str())
    }

    /// Like [`Self::arg`], but an error if missing.
    pub fn require(&self, name: &str, position: usize) -> Result<&str> {
        self.arg(name, position).ok_or_else(|| {
            RollcallError::query(format!("{}: missing argument '{}'", self.op, name))
        })
    }
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn parse_call(&mut self) -> Result<QueryCall> {
        self.skip_ws();
        let op = self.parse_ident()?;
        self.skip_ws();
        self.expect('(')?;

        let mut args = Vec::new();
        self.skip_ws();
        if self.peek() != Some(')') {
            loop {
                args.push(self.parse_arg()?);
                self.skip_ws();
                match self.peek() {
                    Some(',') => {
                        self.pos += 1;
                        self.skip_ws();
                    }
                    Some(')') => break,
                    _ => {
                        return Err(RollcallError::query(format!(
                            "Expected ',' or ')' in '{}'",
                            self.input
                        )))
                    }
                }
            }
        }
        self.expect(')')?;
        self.skip_ws();
        if self.pos != self.chars.len() {
            return Err(RollcallError::query(format!(
                "Unexpected trailing input in '{}'",
                self.input
            )));
        }

        Ok(QueryCall { op, args })
    }

    fn parse_arg(&mut self) -> Result<Arg> {
        if matches!(self.peek(), Some('"') | Some('\'')) {
            return Ok(Arg {
                name: None,
                value: self.parse_quoted()?,
            });
        }

        let token = self.parse_bare()?;
        self.skip_ws();
        if self.peek() == Some('=') {
            self.pos += 1;
            self.skip_ws();
            let value = if matches!(self.peek(), Some('"') | Some('\'')) {
                self.parse_quoted()?
            } else {
                self.parse_bare()?
            };
            return Ok(Arg {
                name: Some(token),
                value,
            });
        }

        Ok(Arg {
            name: None,
            value: token,
        })
    }

    fn parse_ident(&mut self) -> Result<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(RollcallError::query(format!(
                "Expected an operation name in '{}'",
                self.input
            )));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    /// A bare value: anything up to a delimiter. Covers names, ISO dates,
    /// and numbers.
    fn parse_bare(&mut self) -> Result<String> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == ',' || c == ')' || c == '=' || c.is_whitespace() {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(RollcallError::query(format!(
                "Expected a value in '{}'",
                self.input
            )));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn parse_quoted(&mut self) -> Result<String> {
        let quote = self.peek().expect("caller checked");
        self.pos += 1;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == quote {
                let value: String = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                return Ok(value);
            }
            self.pos += 1;
        }
        Err(RollcallError::query(format!(
            "Unterminated string in '{}'",
            self.input
        )))
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(RollcallError::query(format!(
                "Expected '{}' in '{}'",
                c, self.input
            )))
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_args() {
        let call = QueryCall::parse("list_students()").unwrap();
        assert_eq!(call.op, "list_students");
        assert!(call.args.is_empty());
    }

    #[test]
    fn test_parse_positional_quoted() {
        let call = QueryCall::parse("count_present(\"Bea\")").unwrap();
        assert_eq!(call.op, "count_present");
        assert_eq!(call.arg("student", 0), Some("Bea"));
    }

    #[test]
    fn test_parse_single_quotes() {
        let call = QueryCall::parse("count_present('Bea')").unwrap();
        assert_eq!(call.arg("student", 0), Some("Bea"));
    }

    #[test]
    fn test_parse_bare_values() {
        let call = QueryCall::parse("status(Alan, 2024-01-02)").unwrap();
        assert_eq!(call.arg("student", 0), Some("Alan"));
        assert_eq!(call.arg("date", 1), Some("2024-01-02"));
    }

    #[test]
    fn test_parse_named_args() {
        let call = QueryCall::parse("count_present(\"Bea\", from=2024-01-01, to=2024-01-02)")
            .unwrap();
        assert_eq!(call.arg("student", 0), Some("Bea"));
        assert_eq!(call.arg("from", 99), Some("2024-01-01"));
        assert_eq!(call.arg("to", 99), Some("2024-01-02"));
    }

    #[test]
    fn test_named_beats_positional() {
        let call = QueryCall::parse("below(percent=75)").unwrap();
        assert_eq!(call.arg("percent", 0), Some("75"));
    }

    #[test]
    fn test_require_missing_argument() {
        let call = QueryCall::parse("status(Alan)").unwrap();
        let err = call.require("date", 1).unwrap_err();
        assert!(err.to_string().contains("missing argument 'date'"));
    }

    #[test]
    fn test_surrounding_whitespace_ok() {
        let call = QueryCall::parse("  count_on( 2024-01-01 )  ").unwrap();
        assert_eq!(call.op, "count_on");
        assert_eq!(call.arg("date", 0), Some("2024-01-01"));
    }

    #[test]
    fn test_trailing_input_rejected() {
        assert!(QueryCall::parse("list_students(); rm -rf /").is_err());
    }

    #[test]
    fn test_unterminated_string_rejected() {
        assert!(QueryCall::parse("count_present(\"Bea)").is_err());
    }

    #[test]
    fn test_missing_parens_rejected() {
        assert!(QueryCall::parse("list_students").is_err());
        assert!(QueryCall::parse("count_on(2024-01-01").is_err());
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(QueryCall::parse("").is_err());
        assert!(QueryCall::parse("   ").is_err());
    }
}
