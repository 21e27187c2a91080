//! Text-notation model parser.
//!
//! The format is whitespace-tokenised, one logical statement per line:
//!
//! ```text
//! max +3 +5
//! +1 +0 <= 4
//! +0 +2 <= 12
//! +3 +2 <= 18
//! + +
//! ```
//!
//! Line 1 is `max` or `min` followed by the cost coefficients; each middle
//! line is a constraint row ending in a relation (`<=`, `>=`, `=`) and the
//! right-hand side; the final non-empty line gives one sign token per
//! variable from `{+, -, urs, int, bin}`. Blank lines are ignored.

use solver_core::{Constraint, Model, Relation, Sense, SignRestriction};
use thiserror::Error;

/// Errors produced while parsing the text notation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Fewer than two non-empty lines
    #[error("input needs an objective line and a sign line")]
    TooShort,

    /// First token is neither `max` nor `min`
    #[error("line {line}: expected 'max' or 'min', found '{token}'")]
    BadSense {
        /// 1-based source line
        line: usize,
        /// Offending token
        token: String,
    },

    /// A numeric token failed to parse
    #[error("line {line}: invalid number '{token}'")]
    BadNumber {
        /// 1-based source line
        line: usize,
        /// Offending token
        token: String,
    },

    /// Unknown relation token in a constraint row
    #[error("line {line}: unknown relation '{token}'")]
    BadRelation {
        /// 1-based source line
        line: usize,
        /// Offending token
        token: String,
    },

    /// Unknown sign token on the final line
    #[error("line {line}: unknown sign token '{token}'")]
    BadSign {
        /// 1-based source line
        line: usize,
        /// Offending token
        token: String,
    },

    /// A line has the wrong number of tokens
    #[error("line {line}: expected {expected} tokens, found {found}")]
    WrongCount {
        /// 1-based source line
        line: usize,
        /// Tokens required
        expected: usize,
        /// Tokens present
        found: usize,
    },
}

/// Parse a model from the text notation.
pub fn parse_model(input: &str) -> Result<Model, ParseError> {
    let lines: Vec<(usize, Vec<&str>)> = input
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.split_whitespace().collect::<Vec<_>>()))
        .filter(|(_, tokens)| !tokens.is_empty())
        .collect();
    if lines.len() < 2 {
        return Err(ParseError::TooShort);
    }

    let (obj_line, obj_tokens) = &lines[0];
    let sense = match obj_tokens[0] {
        "max" => Sense::Maximize,
        "min" => Sense::Minimize,
        other => {
            return Err(ParseError::BadSense {
                line: *obj_line,
                token: other.to_string(),
            })
        }
    };
    let costs = parse_numbers(*obj_line, &obj_tokens[1..])?;
    let n = costs.len();
    if n == 0 {
        return Err(ParseError::WrongCount {
            line: *obj_line,
            expected: 2,
            found: 1,
        });
    }

    let (sign_line, sign_tokens) = lines.last().expect("at least two lines");
    if sign_tokens.len() != n {
        return Err(ParseError::WrongCount {
            line: *sign_line,
            expected: n,
            found: sign_tokens.len(),
        });
    }
    let signs = sign_tokens
        .iter()
        .map(|token| match *token {
            "+" => Ok(SignRestriction::NonNeg),
            "-" => Ok(SignRestriction::NonPos),
            "urs" => Ok(SignRestriction::Free),
            "int" => Ok(SignRestriction::Integer),
            "bin" => Ok(SignRestriction::Binary),
            other => Err(ParseError::BadSign {
                line: *sign_line,
                token: other.to_string(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut constraints = Vec::with_capacity(lines.len() - 2);
    for (line, tokens) in &lines[1..lines.len() - 1] {
        if tokens.len() != n + 2 {
            return Err(ParseError::WrongCount {
                line: *line,
                expected: n + 2,
                found: tokens.len(),
            });
        }
        let coeffs = parse_numbers(*line, &tokens[..n])?;
        let relation = match tokens[n] {
            "<=" => Relation::Le,
            ">=" => Relation::Ge,
            "=" => Relation::Eq,
            other => {
                return Err(ParseError::BadRelation {
                    line: *line,
                    token: other.to_string(),
                })
            }
        };
        let rhs = parse_number(*line, tokens[n + 1])?;
        constraints.push(Constraint {
            coeffs,
            relation,
            rhs,
        });
    }

    Ok(Model {
        sense,
        costs,
        constraints,
        signs,
    })
}

fn parse_numbers(line: usize, tokens: &[&str]) -> Result<Vec<f64>, ParseError> {
    tokens.iter().map(|t| parse_number(line, t)).collect()
}

fn parse_number(line: usize, token: &str) -> Result<f64, ParseError> {
    token.parse::<f64>().map_err(|_| ParseError::BadNumber {
        line,
        token: token.to_string(),
    })
}
