//! Path expression parser.

use crate::types::{Program, Selector};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty path expression")]
    Empty,
    #[error("multiple root selectors")]
    MultipleRoots,
    #[error("root selector must be followed by '.' or '['")]
    BadRootSuffix,
    #[error("'{0}' must be preceded by '$'")]
    MissingRoot(char),
    #[error("'.' must be followed by a member name or wildcard")]
    DanglingDot,
    #[error("'..' must be followed by a member name")]
    DanglingDeepScan,
    #[error("'[' must be followed by an index, a wildcard or a quoted name")]
    DanglingBracket,
    #[error("unterminated quoted name")]
    UnterminatedName,
    #[error("expected ']'")]
    ExpectedClose,
    #[error("expected ',' or ']'")]
    ExpectedCommaOrClose,
    #[error("expected a digit")]
    ExpectedDigit,
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
}

/// Characters that may appear in an unquoted member name. Everything except
/// the grammar's own metacharacters qualifies, so names may contain spaces,
/// digits and non-ASCII text.
fn is_name_char(c: char) -> bool {
    !matches!(c, '[' | ']' | '.' | '*' | '\'' | '$')
}

/// Path expression parser: a single left-to-right pass over the input.
pub struct PathParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> PathParser<'a> {
    /// Parse a path expression into a selector [`Program`].
    pub fn parse(input: &'a str) -> Result<Program, ParseError> {
        let mut parser = Self { input, pos: 0 };
        parser.parse_program()
    }

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut selectors = Vec::new();
        let mut has_root = false;

        while let Some(c) = self.peek() {
            match c {
                '$' => {
                    if has_root {
                        return Err(ParseError::MultipleRoots);
                    }
                    self.advance();
                    match self.peek() {
                        None | Some('.') | Some('[') => {}
                        Some(_) => return Err(ParseError::BadRootSuffix),
                    }
                    selectors.push(Selector::Root);
                    has_root = true;
                }
                '.' => {
                    if !has_root {
                        return Err(ParseError::MissingRoot('.'));
                    }
                    self.advance();
                    self.parse_dot_selector(&mut selectors)?;
                }
                '[' => {
                    if !has_root {
                        return Err(ParseError::MissingRoot('['));
                    }
                    self.advance();
                    self.parse_bracket_selector(&mut selectors)?;
                }
                other => return Err(ParseError::UnexpectedChar(other)),
            }
        }

        if selectors.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Program { selectors })
    }

    fn parse_dot_selector(&mut self, selectors: &mut Vec<Selector>) -> Result<(), ParseError> {
        match self.peek() {
            None => Err(ParseError::DanglingDot),
            Some('.') => {
                // Deep scan: the scanned-for member name is parsed here and
                // emitted as the selector immediately after the scan marker.
                self.advance();
                let name = self.take_name();
                if name.is_empty() {
                    return Err(ParseError::DanglingDeepScan);
                }
                selectors.push(Selector::DeepScan);
                selectors.push(Selector::Name(name));
                Ok(())
            }
            Some('*') => {
                self.advance();
                selectors.push(Selector::WildcardName);
                Ok(())
            }
            Some(_) => {
                let name = self.take_name();
                if name.is_empty() {
                    return Err(ParseError::DanglingDot);
                }
                selectors.push(Selector::Name(name));
                Ok(())
            }
        }
    }

    fn parse_bracket_selector(&mut self, selectors: &mut Vec<Selector>) -> Result<(), ParseError> {
        match self.peek() {
            None => Err(ParseError::DanglingBracket),
            Some('*') => {
                self.advance();
                self.expect(']')?;
                selectors.push(Selector::WildcardIndex);
                Ok(())
            }
            Some('\'') => {
                self.advance();
                self.parse_quoted_name(selectors)
            }
            Some(_) => self.parse_index_expr(selectors),
        }
    }

    fn parse_quoted_name(&mut self, selectors: &mut Vec<Selector>) -> Result<(), ParseError> {
        if self.peek() == Some('*') {
            // ['*'] is the by-name wildcard; any longer '*'-prefixed token
            // is malformed because '*' cannot start a member name.
            self.advance();
            if self.peek() == Some('\'') {
                self.advance();
                self.expect(']')?;
                selectors.push(Selector::WildcardName);
                return Ok(());
            }
            return Err(ParseError::ExpectedClose);
        }
        let name = self.take_name();
        match self.peek() {
            None => Err(ParseError::UnterminatedName),
            Some('\'') => {
                self.advance();
                self.expect(']')?;
                selectors.push(Selector::Name(name));
                Ok(())
            }
            Some(_) => Err(ParseError::ExpectedClose),
        }
    }

    fn parse_index_expr(&mut self, selectors: &mut Vec<Selector>) -> Result<(), ParseError> {
        let (first, digits) = self.take_signed_int();

        match self.peek() {
            Some(':') => {
                self.advance();
                let (end, _) = self.take_signed_int();
                self.expect(']')?;
                // An absent start is 0; an absent end stays 0 and the
                // evaluator reads a normalized 0 as "through end of array".
                let start = if digits > 0 { first } else { 0 };
                selectors.push(Selector::Slice { start, end });
                Ok(())
            }
            _ if digits == 0 => Err(ParseError::ExpectedDigit),
            Some(',') => {
                let mut indices = vec![first];
                loop {
                    match self.peek() {
                        Some(',') => {
                            self.advance();
                            let (value, digits) = self.take_signed_int();
                            if digits == 0 {
                                return Err(ParseError::ExpectedDigit);
                            }
                            indices.push(value);
                        }
                        Some(']') => {
                            self.advance();
                            break;
                        }
                        _ => return Err(ParseError::ExpectedCommaOrClose),
                    }
                }
                selectors.push(Selector::IndexSet(indices));
                Ok(())
            }
            Some(']') => {
                self.advance();
                selectors.push(Selector::Index(first));
                Ok(())
            }
            _ => Err(ParseError::ExpectedClose),
        }
    }

    /// Consume an optional minus sign and a run of digits. Returns the
    /// signed value and the number of digits consumed; a lone minus counts
    /// as zero digits (the caller decides whether that is an error).
    fn take_signed_int(&mut self) -> (i64, usize) {
        let mut sign = 1i64;
        if self.peek() == Some('-') {
            sign = -1;
            self.advance();
        }
        let mut value = 0i64;
        let mut digits = 0;
        while let Some(c) = self.peek() {
            if let Some(d) = c.to_digit(10) {
                value = value.saturating_mul(10).saturating_add(d as i64);
                digits += 1;
                self.advance();
            } else {
                break;
            }
        }
        (sign.saturating_mul(value), digits)
    }

    fn take_name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_name_char(c) {
                self.advance();
            } else {
                break;
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.advance();
            Ok(())
        } else {
            debug_assert_eq!(expected, ']');
            Err(ParseError::ExpectedClose)
        }
    }
}
