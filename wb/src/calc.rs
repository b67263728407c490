//! Arithmetic expression evaluator for the `calculator` tool
//!
//! Only numeric literals, `+ - * / // % ^ **`, unary signs and parentheses
//! are accepted. Grammar, lowest precedence first:
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/' | '//' | '%') unary)*
//! unary := ('-' | '+') unary | power
//! power := atom (('^' | '**') unary)?
//! atom  := number | '(' expr ')'
//! ```
//!
//! Integers stay integers until an operation needs a float (`/`, a float
//! operand, a negative exponent).

use std::fmt;

use thiserror::Error;
use tracing::debug;

/// Evaluation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unexpected {found} at position {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("missing closing parenthesis for '(' at position {pos}")]
    UnclosedParen { pos: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("result is not a finite number")]
    NotFinite,

    #[error("expression nested deeper than {} levels", MAX_DEPTH)]
    TooDeep,
}

/// Maximum nesting of parentheses, unary signs and exponents
pub const MAX_DEPTH: usize = 256;

/// A computed value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}

/// Shortest round-trip digits; scientific notation outside `1e-4 <= |x| < 1e16`
///
/// `6.0` keeps its fractional part, `1e16` prints as `1e+16`, `0.00001` as `1e-05`.
fn format_float(x: f64) -> String {
    if !x.is_finite() {
        return x.to_string();
    }

    let scientific = format!("{:e}", x);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if (-4..16).contains(&exponent) {
        let fixed = x.to_string();
        if fixed.contains('.') { fixed } else { format!("{}.0", fixed) }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(Number),
    Plus,
    Minus,
    Star,
    Slash,
    DoubleSlash,
    Percent,
    Pow,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Num(n) => write!(f, "number {}", n),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::DoubleSlash => write!(f, "'//'"),
            Token::Percent => write!(f, "'%'"),
            Token::Pow => write!(f, "'^'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
        }
    }
}

/// Evaluate an arithmetic expression
pub fn evaluate(expression: &str) -> Result<Number, ExprError> {
    debug!(%expression, "evaluate: called");
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;

    if let Some((token, pos)) = parser.peek() {
        debug!(%token, %pos, "evaluate: trailing input");
        return Err(ExprError::UnexpectedToken {
            found: token.to_string(),
            pos,
        });
    }

    match value {
        Number::Float(f) if !f.is_finite() => Err(ExprError::NotFinite),
        value => Ok(value),
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, ExprError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;
        let token = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let (number, next) = scan_number(&chars, i)?;
                i = next;
                tokens.push((Token::Num(number), start));
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' if chars.get(i + 1) == Some(&'*') => {
                i += 1;
                Token::Pow
            }
            '*' => Token::Star,
            '/' if chars.get(i + 1) == Some(&'/') => {
                i += 1;
                Token::DoubleSlash
            }
            '/' => Token::Slash,
            '%' => Token::Percent,
            '^' => Token::Pow,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => return Err(ExprError::UnexpectedChar { ch: other, pos: i }),
        };
        tokens.push((token, start));
        i += 1;
    }

    Ok(tokens)
}

fn scan_number(chars: &[char], start: usize) -> Result<(Number, usize), ExprError> {
    let mut i = start;
    let mut is_float = false;

    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        is_float = true;
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        is_float = true;
        i += 1;
        if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
            i += 1;
        }
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }

    let text: String = chars[start..i].iter().collect();
    let number = if is_float {
        text.parse::<f64>()
            .map(Number::Float)
            .map_err(|_| ExprError::InvalidNumber(text.clone()))?
    } else {
        text.parse::<i64>().map(Number::Int).map_err(|_| ExprError::Overflow)?
    };

    Ok((number, i))
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    /// Current recursion depth through `unary`
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<(Token, usize)> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<Number, ExprError> {
        let mut value = self.term()?;
        while let Some((token, _)) = self.peek() {
            match token {
                Token::Plus | Token::Minus => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    value = apply(token, value, rhs)?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<Number, ExprError> {
        let mut value = self.unary()?;
        while let Some((token, _)) = self.peek() {
            match token {
                Token::Star | Token::Slash | Token::DoubleSlash | Token::Percent => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    value = apply(token, value, rhs)?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    /// Every nested construct recurses through here, so this bounds the stack
    fn unary(&mut self) -> Result<Number, ExprError> {
        if self.depth >= MAX_DEPTH {
            debug!(depth = self.depth, "Parser::unary: nesting limit reached");
            return Err(ExprError::TooDeep);
        }
        self.depth += 1;
        let result = self.signed();
        self.depth -= 1;
        result
    }

    fn signed(&mut self) -> Result<Number, ExprError> {
        match self.peek() {
            Some((Token::Minus, _)) => {
                self.pos += 1;
                match self.unary()? {
                    Number::Int(i) => i.checked_neg().map(Number::Int).ok_or(ExprError::Overflow),
                    Number::Float(f) => Ok(Number::Float(-f)),
                }
            }
            Some((Token::Plus, _)) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Number, ExprError> {
        let base = self.atom()?;
        if let Some((Token::Pow, _)) = self.peek() {
            self.pos += 1;
            // Right associative: 2^3^2 == 2^(3^2)
            let exponent = self.unary()?;
            return apply(Token::Pow, base, exponent);
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Number, ExprError> {
        match self.next() {
            Some((Token::Num(n), _)) => Ok(n),
            Some((Token::LParen, open)) => {
                let value = self.expr()?;
                match self.next() {
                    Some((Token::RParen, _)) => Ok(value),
                    Some((token, pos)) => Err(ExprError::UnexpectedToken {
                        found: token.to_string(),
                        pos,
                    }),
                    None => Err(ExprError::UnclosedParen { pos: open }),
                }
            }
            Some((token, pos)) => Err(ExprError::UnexpectedToken {
                found: token.to_string(),
                pos,
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

fn apply(op: Token, lhs: Number, rhs: Number) -> Result<Number, ExprError> {
    use Number::{Float, Int};

    match op {
        Token::Slash | Token::DoubleSlash | Token::Percent if rhs.is_zero() => return Err(ExprError::DivisionByZero),
        _ => {}
    }

    let result = match (op, lhs, rhs) {
        (Token::Plus, Int(a), Int(b)) => Int(a.checked_add(b).ok_or(ExprError::Overflow)?),
        (Token::Minus, Int(a), Int(b)) => Int(a.checked_sub(b).ok_or(ExprError::Overflow)?),
        (Token::Star, Int(a), Int(b)) => Int(a.checked_mul(b).ok_or(ExprError::Overflow)?),
        (Token::DoubleSlash, Int(a), Int(b)) => Int(floor_div(a, b)?),
        (Token::Percent, Int(a), Int(b)) => Int(floor_mod(a, b)?),
        (Token::Pow, Int(a), Int(b)) if b >= 0 => {
            let exp = u32::try_from(b).map_err(|_| ExprError::Overflow)?;
            Int(a.checked_pow(exp).ok_or(ExprError::Overflow)?)
        }
        (op, a, b) => {
            let (a, b) = (a.as_f64(), b.as_f64());
            Float(match op {
                Token::Plus => a + b,
                Token::Minus => a - b,
                Token::Star => a * b,
                Token::Slash => a / b,
                Token::DoubleSlash => (a / b).floor(),
                Token::Percent => a - b * (a / b).floor(),
                Token::Pow => a.powf(b),
                other => {
                    return Err(ExprError::UnexpectedToken {
                        found: other.to_string(),
                        pos: 0,
                    });
                }
            })
        }
    };

    Ok(result)
}

/// Integer division rounding toward negative infinity
fn floor_div(a: i64, b: i64) -> Result<i64, ExprError> {
    let q = a.checked_div(b).ok_or(ExprError::Overflow)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Remainder carrying the sign of the divisor
fn floor_mod(a: i64, b: i64) -> Result<i64, ExprError> {
    let r = a.checked_rem(b).ok_or(ExprError::Overflow)?;
    if r != 0 && ((r < 0) != (b < 0)) { Ok(r + b) } else { Ok(r) }
}
