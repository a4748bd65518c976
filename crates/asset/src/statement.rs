//! Line splitting shared by the OBJ and MTL parsers.

use crate::error::ParseError;

/// One non-blank, comment-stripped source line split into its directive tag and
/// the remaining operand text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Statement<'a> {
    /// 1-based.
    pub line: usize,
    pub tag: &'a str,
    rest: &'a str,
}

/// Yield every statement of `text`. `#` starts a comment running to end of line.
pub(crate) fn statements(text: &str) -> impl Iterator<Item = Statement<'_>> {
    text.lines().enumerate().filter_map(|(line_no, raw)| {
        let content = match raw.find('#') {
            Some(at) => &raw[..at],
            None => raw,
        }
        .trim();
        if content.is_empty() {
            return None;
        }
        let (tag, rest) = content
            .split_once(char::is_whitespace)
            .unwrap_or((content, ""));
        Some(Statement {
            line: line_no + 1,
            tag,
            rest: rest.trim(),
        })
    })
}

impl<'a> Statement<'a> {
    pub fn operands(&self) -> std::str::SplitWhitespace<'a> {
        self.rest.split_whitespace()
    }

    /// Whole operand text, trimmed. Used for names that may contain spaces.
    pub fn name(&self) -> Result<&'a str, ParseError> {
        if self.rest.is_empty() {
            Err(self.missing())
        } else {
            Ok(self.rest)
        }
    }

    /// Parse every operand as `f32`, requiring at least `min` of them.
    pub fn floats(&self, min: usize) -> Result<Vec<f32>, ParseError> {
        let values = self
            .operands()
            .map(|token| self.float(token))
            .collect::<Result<Vec<_>, _>>()?;
        if values.len() < min {
            return Err(self.missing());
        }
        Ok(values)
    }

    pub fn vec3(&self) -> Result<[f32; 3], ParseError> {
        let v = self.floats(3)?;
        Ok([v[0], v[1], v[2]])
    }

    pub fn scalar(&self) -> Result<f32, ParseError> {
        Ok(self.floats(1)?[0])
    }

    pub fn float(&self, token: &str) -> Result<f32, ParseError> {
        token.parse::<f32>().map_err(|_| self.malformed(token))
    }

    pub fn malformed(&self, token: &str) -> ParseError {
        ParseError::MalformedNumber {
            line: self.line,
            directive: self.tag.to_owned(),
            token: token.to_owned(),
        }
    }

    pub fn missing(&self) -> ParseError {
        ParseError::MissingOperand {
            line: self.line,
            directive: self.tag.to_owned(),
        }
    }
}
