//! Core data model types for vocalmath.
//!
//! Difficulty tiers, operators and the immutable expression triple that the
//! generator produces and verification evaluates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ExpressionParseError, GenerateError};

/// Difficulty tier controlling operand magnitude and operator variety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DifficultyLevel(u32);

impl DifficultyLevel {
    /// Highest supported level; `10^MAX * 10^MAX` still fits in an `i64`.
    pub const MAX: u32 = 9;

    pub const EASY: DifficultyLevel = DifficultyLevel(1);
    pub const MEDIUM: DifficultyLevel = DifficultyLevel(2);
    pub const HARD: DifficultyLevel = DifficultyLevel(3);

    /// Create a difficulty level, rejecting `0` and anything above [`Self::MAX`].
    pub fn new(level: u32) -> Result<Self, GenerateError> {
        if (1..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(GenerateError::InvalidDifficulty(level))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Inclusive operand range `[10^(level-1), 10^level]`.
    pub fn magnitude_range(self) -> (i64, i64) {
        (10_i64.pow(self.0 - 1), 10_i64.pow(self.0))
    }

    /// Operators unlocked at this level.
    ///
    /// Level 1 exposes add and subtract; each further level unlocks the next
    /// operator until all four are available.
    pub fn operators(self) -> &'static [Operator] {
        let count = (self.0 as usize + 1).min(Operator::ALL.len());
        &Operator::ALL[..count]
    }
}

impl Default for DifficultyLevel {
    fn default() -> Self {
        Self::EASY
    }
}

impl TryFrom<u32> for DifficultyLevel {
    type Error = GenerateError;

    fn try_from(level: u32) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<DifficultyLevel> for u32 {
    fn from(level: DifficultyLevel) -> Self {
        level.0
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// All operators in unlock order.
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    /// Canonical ASCII token used for verification and storage.
    pub fn token(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// Human-friendly symbol used for display.
    pub fn display_symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '×',
            Operator::Divide => '÷',
        }
    }

    /// Word used when the operator is read aloud.
    pub fn spoken(self) -> &'static str {
        match self {
            Operator::Add => "plus",
            Operator::Subtract => "minus",
            Operator::Multiply => "times",
            Operator::Divide => "divided by",
        }
    }

    /// Map either a canonical token or a display symbol back to an operator.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Operator::Add),
            '-' | '−' => Some(Operator::Subtract),
            '*' | '×' => Some(Operator::Multiply),
            '/' | '÷' => Some(Operator::Divide),
            _ => None,
        }
    }

    /// Apply the operator, returning `None` on overflow, division by zero or
    /// a non-integral quotient.
    pub fn apply(self, a: i64, b: i64) -> Option<i64> {
        match self {
            Operator::Add => a.checked_add(b),
            Operator::Subtract => a.checked_sub(b),
            Operator::Multiply => a.checked_mul(b),
            Operator::Divide => {
                if b == 0 || a.checked_rem(b)? != 0 {
                    None
                } else {
                    a.checked_div(b)
                }
            }
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_symbol())
    }
}

/// An immutable two-operand arithmetic problem.
///
/// Construction validates that the value is computable: no overflow, no
/// division by zero and an exact quotient for division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ExpressionRepr", into = "ExpressionRepr")]
pub struct Expression {
    operand_a: i64,
    operator: Operator,
    operand_b: i64,
    value: i64,
}

impl Expression {
    pub fn new(
        operand_a: i64,
        operator: Operator,
        operand_b: i64,
    ) -> Result<Self, ExpressionParseError> {
        if operator == Operator::Divide {
            if operand_b == 0 {
                return Err(ExpressionParseError::DivisionByZero);
            }
            if operand_a.checked_rem(operand_b) != Some(0) {
                return Err(ExpressionParseError::InexactDivision {
                    a: operand_a,
                    b: operand_b,
                });
            }
        }
        let value = operator.apply(operand_a, operand_b).ok_or_else(|| {
            ExpressionParseError::Overflow(format!(
                "{operand_a} {} {operand_b}",
                operator.token()
            ))
        })?;

        Ok(Self {
            operand_a,
            operator,
            operand_b,
            value,
        })
    }

    pub fn operand_a(&self) -> i64 {
        self.operand_a
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand_b(&self) -> i64 {
        self.operand_b
    }

    /// The true value of the expression.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Canonical form with ASCII operator tokens, e.g. `84 / 7`.
    pub fn canonical(&self) -> String {
        format!(
            "{} {} {}",
            self.operand_a,
            self.operator.token(),
            self.operand_b
        )
    }

    /// Display form with human-friendly symbols, e.g. `84 ÷ 7`.
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.operand_a,
            self.operator.display_symbol(),
            self.operand_b
        )
    }
}

impl FromStr for Expression {
    type Err = ExpressionParseError;

    /// Parse `<a> <op> <b>` in canonical or display form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        // A leading sign belongs to the first operand, not the operator.
        let skip = text
            .char_indices()
            .nth(1)
            .map(|(i, _)| i)
            .unwrap_or(text.len());

        let (op_pos, operator, op_char) = text[skip..]
            .char_indices()
            .find_map(|(i, c)| Operator::from_symbol(c).map(|op| (skip + i, op, c)))
            .ok_or_else(|| ExpressionParseError::Malformed(text.to_string()))?;

        let left = text[..op_pos].trim();
        let right = text[op_pos + op_char.len_utf8()..].trim();
        if left.is_empty() || right.is_empty() {
            return Err(ExpressionParseError::Malformed(text.to_string()));
        }

        let parse_operand = |raw: &str| {
            raw.parse::<i64>()
                .map_err(|_| ExpressionParseError::InvalidOperand(raw.to_string()))
        };

        Expression::new(parse_operand(left)?, operator, parse_operand(right)?)
    }
}

#[derive(Serialize, Deserialize)]
struct ExpressionRepr {
    operand_a: i64,
    operator: Operator,
    operand_b: i64,
}

impl TryFrom<ExpressionRepr> for Expression {
    type Error = ExpressionParseError;

    fn try_from(repr: ExpressionRepr) -> Result<Self, Self::Error> {
        Expression::new(repr.operand_a, repr.operator, repr.operand_b)
    }
}

impl From<Expression> for ExpressionRepr {
    fn from(expr: Expression) -> Self {
        Self {
            operand_a: expr.operand_a,
            operator: expr.operator,
            operand_b: expr.operand_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_rejects_out_of_range() {
        assert_eq!(
            DifficultyLevel::new(0),
            Err(GenerateError::InvalidDifficulty(0))
        );
        assert!(DifficultyLevel::new(DifficultyLevel::MAX).is_ok());
        assert!(DifficultyLevel::new(DifficultyLevel::MAX + 1).is_err());
    }

    #[test]
    fn operator_unlock_order() {
        assert_eq!(
            DifficultyLevel::EASY.operators(),
            &[Operator::Add, Operator::Subtract]
        );
        assert_eq!(DifficultyLevel::MEDIUM.operators().len(), 3);
        assert_eq!(DifficultyLevel::HARD.operators(), &Operator::ALL);
        // Never exceeds the operator set.
        assert_eq!(
            DifficultyLevel::new(7).unwrap().operators(),
            &Operator::ALL
        );
    }

    #[test]
    fn magnitude_range_by_level() {
        assert_eq!(DifficultyLevel::EASY.magnitude_range(), (1, 10));
        assert_eq!(DifficultyLevel::MEDIUM.magnitude_range(), (10, 100));
        assert_eq!(DifficultyLevel::HARD.magnitude_range(), (100, 1000));
    }

    #[test]
    fn display_uses_friendly_symbols() {
        let div = Expression::new(84, Operator::Divide, 7).unwrap();
        assert_eq!(div.display(), "84 ÷ 7");
        assert_eq!(div.canonical(), "84 / 7");
        assert_eq!(div.value(), 12);

        let mul = Expression::new(6, Operator::Multiply, 7).unwrap();
        assert_eq!(mul.to_string(), "6 × 7");
    }

    #[test]
    fn new_rejects_invalid_division() {
        assert_eq!(
            Expression::new(10, Operator::Divide, 0),
            Err(ExpressionParseError::DivisionByZero)
        );
        assert_eq!(
            Expression::new(10, Operator::Divide, 3),
            Err(ExpressionParseError::InexactDivision { a: 10, b: 3 })
        );
    }

    #[test]
    fn new_rejects_overflow() {
        assert!(matches!(
            Expression::new(i64::MAX, Operator::Add, 1),
            Err(ExpressionParseError::Overflow(_))
        ));
    }

    #[test]
    fn parse_canonical_and_display_forms() {
        let a: Expression = "84 / 7".parse().unwrap();
        let b: Expression = "84 ÷ 7".parse().unwrap();
        assert_eq!(a, b);

        let c: Expression = "7+3".parse().unwrap();
        assert_eq!(c.value(), 10);

        let d: Expression = "-4 - -6".parse().unwrap();
        assert_eq!(d.operand_a(), -4);
        assert_eq!(d.operand_b(), -6);
        assert_eq!(d.value(), 2);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            "7".parse::<Expression>(),
            Err(ExpressionParseError::Malformed(_))
        ));
        assert!(matches!(
            "seven + 3".parse::<Expression>(),
            Err(ExpressionParseError::InvalidOperand(_))
        ));
        assert!(matches!(
            "7 +".parse::<Expression>(),
            Err(ExpressionParseError::Malformed(_))
        ));
        assert!(matches!(
            "9 ÷ 2".parse::<Expression>(),
            Err(ExpressionParseError::InexactDivision { .. })
        ));
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let expr = Expression::new(12, Operator::Subtract, 5).unwrap();
        let json = serde_json::to_string(&expr).unwrap();
        assert_eq!(
            json,
            r#"{"operand_a":12,"operator":"subtract","operand_b":5}"#
        );
        let back: Expression = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expr);

        let bad = r#"{"operand_a":9,"operator":"divide","operand_b":2}"#;
        assert!(serde_json::from_str::<Expression>(bad).is_err());
    }

    #[test]
    fn difficulty_serializes_as_integer() {
        let json = serde_json::to_string(&DifficultyLevel::HARD).unwrap();
        assert_eq!(json, "3");
        assert!(serde_json::from_str::<DifficultyLevel>("0").is_err());
    }
}
