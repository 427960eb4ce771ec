//! Numeric answer normalization.
//!
//! Turns the loosely formatted answers students type ("1,234.5", "3/4",
//! "1 1/2", "75%") into a single finite `f64`. Notations are tried from the
//! most specific to the least specific, so "75%" is never read as 75 and
//! "1 1/2" never loses its whole part.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// An answer as supplied by a caller: already a number, or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAnswer {
    Number(f64),
    Text(String),
}

impl From<f64> for RawAnswer {
    fn from(value: f64) -> Self {
        RawAnswer::Number(value)
    }
}

impl From<&str> for RawAnswer {
    fn from(value: &str) -> Self {
        RawAnswer::Text(value.to_string())
    }
}

impl From<String> for RawAnswer {
    fn from(value: String) -> Self {
        RawAnswer::Text(value)
    }
}

impl fmt::Display for RawAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawAnswer::Number(n) => write!(f, "{n}"),
            RawAnswer::Text(s) => f.write_str(s),
        }
    }
}

/// The notation an answer was recognised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notation {
    /// Supplied as a number, no text parsing involved.
    Number,
    Percentage,
    MixedNumber,
    Fraction,
    Plain,
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notation::Number => write!(f, "number"),
            Notation::Percentage => write!(f, "percentage"),
            Notation::MixedNumber => write!(f, "mixed number"),
            Notation::Fraction => write!(f, "fraction"),
            Notation::Plain => write!(f, "plain"),
        }
    }
}

/// A successfully normalized answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedAnswer {
    /// Canonical value. Always finite.
    pub value: f64,
    /// Which notation produced it.
    pub notation: Notation,
}

/// Result of trying one notation against an input.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Attempt {
    /// The notation matched and produced a finite value.
    Parsed(f64),
    /// The notation matched but the value is unusable (zero denominator,
    /// overflow). Parsing stops here.
    Rejected,
    /// Not this notation; try the next one.
    NoMatch,
}

// Integer digits with optional `,` grouping, e.g. "1,234".
const INT: &str = r"\d+(?:,\d+)*";

static PERCENTAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^([-+]?(?:{INT}(?:\.\d*)?|\.\d+))\s*%$")).unwrap()
});

static MIXED_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^([-+]?)({INT})\s+({INT})[\s/]+({INT})$")).unwrap()
});

static FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^([-+]?{INT})\s*/\s*({INT})$")).unwrap());

/// Text notations in priority order. The plain fallback runs after these.
const NOTATIONS: [(Notation, fn(&str) -> Attempt); 3] = [
    (Notation::Percentage, parse_percentage),
    (Notation::MixedNumber, parse_mixed_number),
    (Notation::Fraction, parse_fraction),
];

/// Normalize an answer to a finite number, or `None` if it is not
/// understood as one.
pub fn parse_numeric(raw: &RawAnswer) -> Option<f64> {
    parse_answer(raw).map(|parsed| parsed.value)
}

/// Normalize an answer and report which notation it was written in.
pub fn parse_answer(raw: &RawAnswer) -> Option<ParsedAnswer> {
    match raw {
        RawAnswer::Number(n) => n.is_finite().then_some(ParsedAnswer {
            value: *n,
            notation: Notation::Number,
        }),
        RawAnswer::Text(s) => parse_text(s),
    }
}

/// Normalize a text answer.
pub fn parse_text(input: &str) -> Option<ParsedAnswer> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    for (notation, attempt) in NOTATIONS {
        match attempt(s) {
            Attempt::Parsed(value) => return Some(ParsedAnswer { value, notation }),
            Attempt::Rejected => {
                tracing::debug!(input = s, %notation, "answer rejected");
                return None;
            }
            Attempt::NoMatch => {}
        }
    }

    parse_plain(s).map(|value| ParsedAnswer {
        value,
        notation: Notation::Plain,
    })
}

fn parse_percentage(s: &str) -> Attempt {
    let Some(caps) = PERCENTAGE.captures(s) else {
        return Attempt::NoMatch;
    };
    match decimal(&caps[1]) {
        Some(n) => finite(n / 100.0),
        None => Attempt::Rejected,
    }
}

fn parse_mixed_number(s: &str) -> Attempt {
    let Some(caps) = MIXED_NUMBER.captures(s) else {
        return Attempt::NoMatch;
    };
    let Some((whole, numerator, denominator)) = integer_parts(&caps, [2, 3, 4]) else {
        return Attempt::Rejected;
    };
    if denominator == 0.0 {
        return Attempt::Rejected;
    }
    // The sign belongs to the whole expression: "-1 1/2" is -1.5, not -0.5.
    let magnitude = whole + numerator / denominator;
    if &caps[1] == "-" {
        finite(-magnitude)
    } else {
        finite(magnitude)
    }
}

fn parse_fraction(s: &str) -> Attempt {
    let Some(caps) = FRACTION.captures(s) else {
        return Attempt::NoMatch;
    };
    let (Some(numerator), Some(denominator)) = (decimal(&caps[1]), decimal(&caps[2])) else {
        return Attempt::Rejected;
    };
    if denominator == 0.0 {
        return Attempt::Rejected;
    }
    finite(numerator / denominator)
}

/// Last resort: keep digits, one leading sign, and one decimal point.
///
/// Units and currency symbols around a number are dropped ("$12", "5 cm").
/// A second sign, a second decimal point, or a sign after the digits start
/// makes the input ambiguous and fails the parse.
fn parse_plain(s: &str) -> Option<f64> {
    let mut kept = String::with_capacity(s.len());
    let mut seen_digit = false;
    let mut seen_point = false;
    let mut seen_sign = false;

    for c in s.chars() {
        match c {
            '0'..='9' => {
                seen_digit = true;
                kept.push(c);
            }
            '.' if seen_point => return None,
            '.' => {
                seen_point = true;
                kept.push(c);
            }
            '-' | '+' if seen_sign || seen_digit || seen_point => return None,
            '-' | '+' => {
                seen_sign = true;
                kept.push(c);
            }
            _ => {}
        }
    }

    if !seen_digit {
        return None;
    }
    kept.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn integer_parts(caps: &Captures<'_>, groups: [usize; 3]) -> Option<(f64, f64, f64)> {
    Some((
        decimal(&caps[groups[0]])?,
        decimal(&caps[groups[1]])?,
        decimal(&caps[groups[2]])?,
    ))
}

/// Parse a decimal literal after dropping `,` separators.
fn decimal(s: &str) -> Option<f64> {
    s.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

fn finite(value: f64) -> Attempt {
    if value.is_finite() {
        Attempt::Parsed(value)
    } else {
        Attempt::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<f64> {
        parse_numeric(&RawAnswer::from(s))
    }

    #[test]
    fn numbers_pass_through() {
        assert_eq!(parse_numeric(&RawAnswer::Number(42.0)), Some(42.0));
        assert_eq!(parse_numeric(&RawAnswer::Number(-0.125)), Some(-0.125));
        assert_eq!(parse_numeric(&RawAnswer::Number(0.0)), Some(0.0));
    }

    #[test]
    fn non_finite_numbers_fail() {
        assert_eq!(parse_numeric(&RawAnswer::Number(f64::NAN)), None);
        assert_eq!(parse_numeric(&RawAnswer::Number(f64::INFINITY)), None);
        assert_eq!(parse_numeric(&RawAnswer::Number(f64::NEG_INFINITY)), None);
    }

    #[test]
    fn blank_and_garbage_fail() {
        assert_eq!(text(""), None);
        assert_eq!(text("   "), None);
        assert_eq!(text("abc"), None);
        assert_eq!(text("-"), None);
        assert_eq!(text("+"), None);
        assert_eq!(text("."), None);
    }

    #[test]
    fn percentages() {
        assert_eq!(text("75%"), Some(0.75));
        assert_eq!(text("7.5%"), Some(0.075));
        assert_eq!(text("75 %"), Some(0.75));
        assert_eq!(text("-20%"), Some(-0.2));
        assert_eq!(text("1,250%"), Some(12.5));
        assert_eq!(text("%"), None);
        assert_eq!(text("-%"), None);
    }

    #[test]
    fn mixed_numbers() {
        assert_eq!(text("1 1/2"), Some(1.5));
        assert_eq!(text("-1 1/2"), Some(-1.5));
        assert_eq!(text("+2 3/4"), Some(2.75));
        assert_eq!(text("1,000 1/4"), Some(1000.25));
        assert_eq!(text("  3   1 / 4  "), Some(3.25));
        assert_eq!(text("-0 1/2"), Some(-0.5));
    }

    #[test]
    fn zero_denominator_fails_in_every_fraction_form() {
        assert_eq!(text("3/0"), None);
        assert_eq!(text("1 1/0"), None);
        assert_eq!(text("-2 3 / 0"), None);
    }

    #[test]
    fn simple_fractions() {
        assert_eq!(text("3/4"), Some(0.75));
        assert_eq!(text("3 / 4"), Some(0.75));
        assert_eq!(text("-3/4"), Some(-0.75));
        assert_eq!(text("0/5"), Some(0.0));
    }

    #[test]
    fn plain_numbers() {
        assert_eq!(text("1,234.5"), Some(1234.5));
        assert_eq!(text("  42  "), Some(42.0));
        assert_eq!(text("-17"), Some(-17.0));
        assert_eq!(text(".5"), Some(0.5));
        assert_eq!(text("$12.50"), Some(12.5));
        assert_eq!(text("5 cm"), Some(5.0));
        assert_eq!(text("-$5"), Some(-5.0));
    }

    #[test]
    fn ambiguous_plain_numbers_fail() {
        assert_eq!(text("1.2.3"), None);
        assert_eq!(text("12-3"), None);
        assert_eq!(text("+-5"), None);
        assert_eq!(text("--5"), None);
        assert_eq!(text("- -5"), None);
        assert_eq!(text("-$5"), Some(-5.0));
    }

    #[test]
    fn notation_is_reported() {
        let parsed = parse_answer(&RawAnswer::from("75%")).unwrap();
        assert_eq!(parsed.notation, Notation::Percentage);
        let parsed = parse_answer(&RawAnswer::from("1 1/2")).unwrap();
        assert_eq!(parsed.notation, Notation::MixedNumber);
        let parsed = parse_answer(&RawAnswer::from("3/4")).unwrap();
        assert_eq!(parsed.notation, Notation::Fraction);
        let parsed = parse_answer(&RawAnswer::from("12 apples")).unwrap();
        assert_eq!(parsed.notation, Notation::Plain);
        let parsed = parse_answer(&RawAnswer::Number(3.0)).unwrap();
        assert_eq!(parsed.notation, Notation::Number);
    }

    #[test]
    fn raw_answer_deserializes_untagged() {
        let n: RawAnswer = serde_json::from_str("2.5").unwrap();
        assert_eq!(n, RawAnswer::Number(2.5));
        let s: RawAnswer = serde_json::from_str(r#""1 1/2""#).unwrap();
        assert_eq!(s, RawAnswer::Text("1 1/2".into()));
    }

    mod proptests {
        use super::*;
        use crate::equivalence::is_nearly_equal;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_finite_numbers_pass_through(n in -1.0e15f64..1.0e15) {
                prop_assert_eq!(parse_numeric(&RawAnswer::Number(n)), Some(n));
            }

            #[test]
            fn prop_reparse_is_equivalent(n in -1.0e9f64..1.0e9) {
                let first = parse_numeric(&RawAnswer::Number(n)).unwrap();
                let again = parse_numeric(&RawAnswer::Text(first.to_string()));
                prop_assert!(again.is_some());
                prop_assert!(is_nearly_equal(first, again.unwrap()));
            }

            #[test]
            fn prop_never_panics(s in "\\PC{0,24}") {
                if let Some(v) = parse_numeric(&RawAnswer::Text(s)) {
                    prop_assert!(v.is_finite());
                }
            }
        }
    }
}
