/*
 *     Licensed under the Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at
 *
 *         http://www.apache.org/licenses/LICENSE-2.0
 *
 *     Unless required by applicable law or agreed to in writing, software
 *     distributed under the License is distributed on an "AS IS" BASIS,
 *     WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *     See the License for the specific language governing permissions and
 *     limitations under the License.
 */

//! Evaluation of arithmetic expressions with dice notation.
//!
//! `raw text → tokenize → validate_tokens → to_postfix → evaluate_postfix`
//!
//! ```
//! let outcome = dicemancer_roll::evaluate("1+(4*6)/2").unwrap();
//! assert_eq!(outcome.value, 13);
//! assert!(outcome.rolls.is_empty());
//! ```

pub mod dice_roll;
pub mod dice_types;
pub mod error;
pub mod limits;
pub mod macros;
pub mod parser;
pub mod postfix;

pub use dice_types::*;
pub use error::{Bound, EvalError};
pub use limits::{DiceLimits, RollLimits};
pub use macros::{
    evaluate_macro, evaluate_macro_with, fill_macro, validate_macro, validate_macro_with,
};

use rand::Rng;

/// Tokenizes, validates and converts `expression` to postfix order without rolling anything.
pub fn parse<'a>(expression: &'a str, limits: &RollLimits) -> Result<Vec<Token<'a>>, EvalError> {
    let tokens = parser::tokenize(expression);
    parser::validate_tokens(expression, &tokens)?;
    limits.check_all(&tokens)?;
    postfix::to_postfix(&tokens)
}

pub fn evaluate_with<R: Rng>(
    expression: &str,
    limits: &RollLimits,
    rng: &mut R,
) -> Result<EvaluationOutcome, EvalError> {
    let postfix = parse(expression, limits)?;
    dice_roll::evaluate_postfix(&postfix, rng)
}

/// Evaluates `expression` without roll limits, using the thread local generator.
pub fn evaluate(expression: &str) -> Result<EvaluationOutcome, EvalError> {
    evaluate_with(expression, &RollLimits::UNLIMITED, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_basic_roll() {
        let outcome = evaluate("2d20").unwrap();
        assert_eq!(outcome.rolls.len(), 1);
        assert_eq!(outcome.rolls[0].expression, "2d20");
        assert_eq!(outcome.rolls[0].results.len(), 2);
        assert!(outcome.rolls[0].results.iter().all(|r| (1..=20).contains(r)));
        let sum: i64 = outcome.rolls[0].results.iter().map(|r| i64::from(*r)).sum();
        assert_eq!(outcome.value, sum);
    }

    #[test]
    fn test_arithmetic_expression() {
        assert_eq!(
            evaluate("1+(4*6)/2"),
            Ok(EvaluationOutcome {
                value: 13,
                rolls: vec![]
            })
        );
    }

    #[test]
    fn test_advantage() {
        for _ in 0..10 {
            let outcome = evaluate("2d20!").unwrap();
            assert_eq!(outcome.rolls.len(), 1);
            assert_eq!(outcome.rolls[0].expression, "2d20!");
            let results = &outcome.rolls[0].results;
            assert_eq!(results.len(), 2);
            assert_eq!(outcome.value, i64::from(results[0].max(results[1])));
        }
    }

    #[test]
    fn test_disadvantage() {
        for _ in 0..10 {
            let outcome = evaluate("2d20?").unwrap();
            assert_eq!(outcome.rolls.len(), 1);
            assert_eq!(outcome.rolls[0].expression, "2d20?");
            let results = &outcome.rolls[0].results;
            assert_eq!(results.len(), 2);
            assert_eq!(outcome.value, i64::from(results[0].min(results[1])));
        }
    }

    #[test]
    fn test_dice_with_math() {
        for _ in 0..20 {
            let outcome = evaluate("1d20 + 5").unwrap();
            assert_eq!(outcome.rolls.len(), 1);
            assert_eq!(outcome.rolls[0].expression, "1d20");
            let roll = outcome.rolls[0].results[0];
            assert!((1..=20).contains(&roll));
            assert_eq!(outcome.value, i64::from(roll) + 5);
        }
    }

    #[test]
    fn test_errors() {
        assert_eq!(evaluate("(1+2"), Err(EvalError::MismatchedParen));
        assert_eq!(evaluate("1+2)"), Err(EvalError::MismatchedParen));
        assert_eq!(
            evaluate("5 + x"),
            Err(EvalError::InvalidToken("5 + x".to_string()))
        );
        assert_eq!(
            evaluate("0d6"),
            Err(EvalError::InvalidToken("0d6".to_string()))
        );
        assert_eq!(evaluate("3 * * 4"), Err(EvalError::MalformedExpression));
        assert_eq!(evaluate("10 / (5 - 5)"), Err(EvalError::DivisionByZero));
        assert_eq!(
            evaluate("9223372036854775807 + 1"),
            Err(EvalError::Overflow)
        );
    }

    #[test]
    fn test_limits_checked_before_rolling() {
        let mut rng = rand::thread_rng();
        let limits = RollLimits::new(20, 200);
        assert!(evaluate_with("20d200 + 4d10!", &limits, &mut rng).is_ok());
        assert_eq!(
            evaluate_with("21d6", &limits, &mut rng),
            Err(EvalError::RangeExceeded {
                term: "21d6".to_string(),
                bound: Bound::Repeats,
                limit: 20,
                found: 21
            })
        );
        assert!(matches!(
            evaluate_with("1d201 + 1", &limits, &mut rng),
            Err(EvalError::RangeExceeded {
                bound: Bound::Sides,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_does_not_roll() {
        let postfix = parse("(2d6 + 3) * 4", &RollLimits::UNLIMITED).unwrap();
        let texts: Vec<&str> = postfix.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["2d6", "3", "+", "4", "*"]);
    }
}
