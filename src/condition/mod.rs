//! Boolean condition evaluator for stage gating
//!
//! Stage sets carry small boolean expressions over named switches, e.g.
//! `"intro & !(recon1 | recon2)"`. The grammar is evaluated in a single
//! left-to-right pass with no precedence beyond parentheses:
//!
//! - `|` ORs the next term into the accumulator, `^` XORs it; both bind
//!   at the same level and take effect in source order
//! - `&` combines terms, each term being an optional chain of `!`
//!   followed by a parenthesized group or a variable name
//! - whitespace is insignificant
//!
//! Variables resolve through a caller-supplied predicate that may
//! answer `None` for an unknown name. Malformed input never panics and
//! never aborts the campaign: evaluation finishes with a best-effort
//! value and reports the defect for the caller to log.

/// Ways an expression can be malformed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    /// A `(` group was never closed
    UnbalancedParen,
    /// The predicate did not know a variable name
    UnknownVariable(String),
    /// A complete expression was parsed but input remained
    TrailingInput,
}

impl std::fmt::Display for ConditionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionError::UnbalancedParen => write!(f, "')' expected"),
            ConditionError::UnknownVariable(name) => {
                write!(f, "variable '{}' not found", name)
            }
            ConditionError::TrailingInput => write!(f, "unexpected trailing input"),
        }
    }
}

impl std::error::Error for ConditionError {}

/// Result of evaluating an expression: always a usable boolean, plus
/// the first defect encountered, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub value: bool,
    pub error: Option<ConditionError>,
}

impl Evaluation {
    pub fn is_clean(&self) -> bool {
        self.error.is_none()
    }
}

/// Evaluate `expr` against a variable predicate.
///
/// On error the returned value is the degraded fallback: an unclosed
/// parenthesis yields `true`, an unknown variable yields `false`, and
/// trailing input keeps the result of the parsed prefix.
pub fn evaluate<F>(expr: &str, mut lookup: F) -> Evaluation
where
    F: FnMut(&str) -> Option<bool>,
{
    let mut parser = Parser {
        src: expr.as_bytes(),
        pos: 0,
        lookup: &mut lookup,
        error: None,
    };

    let value = parser.check_or();
    if parser.error.is_none() && parser.pos < parser.src.len() {
        parser.error = Some(ConditionError::TrailingInput);
    }

    let value = match parser.error {
        None | Some(ConditionError::TrailingInput) => value,
        Some(ConditionError::UnbalancedParen) => true,
        Some(ConditionError::UnknownVariable(_)) => false,
    };
    Evaluation {
        value,
        error: parser.error,
    }
}

struct Parser<'a, F> {
    src: &'a [u8],
    pos: usize,
    lookup: &'a mut F,
    error: Option<ConditionError>,
}

impl<F> Parser<'_, F>
where
    F: FnMut(&str) -> Option<bool>,
{
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Consume the current character and any whitespace after it
    fn next_char(&mut self) {
        if self.pos < self.src.len() {
            self.pos += 1;
        }
        self.skip_whitespace();
    }

    fn fail(&mut self, error: ConditionError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Read a variable name: everything up to whitespace, an operator
    /// or a parenthesis
    fn switch_name(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c <= b' ' || matches!(c, b'^' | b'|' | b'&' | b'!' | b'(' | b')') {
                break;
            }
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.src[start..self.pos]).into_owned()
    }

    /// `OR := AND (('|' | '^') AND)*`, folded left to right
    fn check_or(&mut self) -> bool {
        let mut result = false;
        let mut xor = false;
        self.skip_whitespace();
        loop {
            let term = self.check_and();
            if xor {
                result ^= term;
            } else {
                result |= term;
            }

            match self.peek() {
                Some(b'|') => {
                    xor = false;
                    self.next_char();
                }
                Some(b'^') => {
                    xor = true;
                    self.next_char();
                }
                _ => break,
            }
            if self.error.is_some() {
                break;
            }
        }
        result
    }

    /// `AND := NOT* ('(' OR ')' | VARIABLE) ('&' AND)*`
    fn check_and(&mut self) -> bool {
        let mut result = true;
        loop {
            let mut negate = false;
            while self.peek() == Some(b'!') {
                negate = !negate;
                self.next_char();
            }

            if self.peek() == Some(b'(') {
                self.next_char();
                let inner = self.check_or();
                result &= inner ^ negate;
                if self.peek() != Some(b')') {
                    self.fail(ConditionError::UnbalancedParen);
                }
                self.next_char();
            } else {
                let name = self.switch_name();
                match (self.lookup)(&name) {
                    Some(value) => result &= value ^ negate,
                    None => self.fail(ConditionError::UnknownVariable(name)),
                }
                self.skip_whitespace();
            }

            if self.peek() == Some(b'&') {
                self.next_char();
            } else {
                break;
            }
            if self.error.is_some() {
                break;
            }
        }
        result
    }
}
