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

//! Macro templates: uppercase placeholders `A`, `B`, `C`, ... filled in with
//! caller supplied text before the result is evaluated like any other expression.

use crate::{dice_types::EvaluationOutcome, error::EvalError, limits::RollLimits};
use rand::Rng;

#[cfg(feature = "logging")]
use log::debug;

pub const MAX_PLACEHOLDERS: usize = 26;

/// Replaces placeholder `A` with `args[0]`, `B` with `args[1]` and so on.
///
/// Replacement is plain text substitution in placeholder order on the already
/// filled text, so an argument containing a later placeholder letter gets that
/// letter replaced as well. Arguments past `Z` are ignored.
pub fn fill_macro<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    args.iter()
        .zip('A'..='Z')
        .fold(template.to_owned(), |filled, (arg, placeholder)| {
            filled.replace(placeholder, arg.as_ref())
        })
}

pub fn evaluate_macro<S: AsRef<str>>(
    template: &str,
    args: &[S],
) -> Result<EvaluationOutcome, EvalError> {
    crate::evaluate(&fill_macro(template, args))
}

pub fn evaluate_macro_with<S: AsRef<str>, R: Rng>(
    template: &str,
    args: &[S],
    limits: &RollLimits,
    rng: &mut R,
) -> Result<EvaluationOutcome, EvalError> {
    crate::evaluate_with(&fill_macro(template, args), limits, rng)
}

/// Checks that `template` is well formed by evaluating it with `1` for every placeholder.
pub fn validate_macro(template: &str) -> Result<(), EvalError> {
    validate_macro_with(template, &RollLimits::UNLIMITED, &mut rand::thread_rng())
}

/// Like `validate_macro`, but a template that could not be rolled within `limits` is rejected too.
pub fn validate_macro_with<R: Rng>(
    template: &str,
    limits: &RollLimits,
    rng: &mut R,
) -> Result<(), EvalError> {
    let result =
        evaluate_macro_with(template, &["1"; MAX_PLACEHOLDERS], limits, rng).map(|_| ());
    #[cfg(feature = "logging")]
    {
        debug!("validated macro {:?}: {:?}", template, &result);
    }
    result
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{error::Bound, parser::tokenize};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_fill_macro() {
        assert_eq!(
            fill_macro("A + (B / 2)", &["2d20", "10"]),
            "2d20 + (10 / 2)"
        );
        assert_eq!(fill_macro("A*A", &["3"]), "3*3");
        assert_eq!(fill_macro("4 * (A + B)", &["10", "4d6"]), "4 * (10 + 4d6)");
    }

    #[test]
    fn test_fill_macro_missing_args() {
        assert_eq!(fill_macro("A + B", &["1"]), "1 + B");
        assert_eq!(fill_macro::<&str>("A + B", &[]), "A + B");
    }

    #[test]
    fn test_fill_macro_ignores_extra_args() {
        let mut args: Vec<String> = (1..=30).map(|i| i.to_string()).collect();
        assert_eq!(fill_macro("Z", &args), "26");
        args.truncate(26);
        assert_eq!(fill_macro("A+Z", &args), "1+26");
    }

    #[test]
    fn test_fill_macro_rescans() {
        // text inserted for A is seen again when B is replaced
        assert_eq!(fill_macro("A + 1", &["B", "2d6"]), "2d6 + 1");
        // lowercase d is never a placeholder
        assert_eq!(fill_macro("Ad6", &["2"]), "2d6");
    }

    #[test]
    fn test_fill_without_placeholders_is_noop() {
        let filled = fill_macro("A + (B / 2)", &["2d20", "10"]);
        let tokens: String = tokenize(&filled).iter().map(|t| t.text).collect();
        assert_eq!(fill_macro(&filled, &["999", "999"]), filled);
        assert_eq!(tokens, "2d20+(10/2)");
    }

    #[test]
    fn test_evaluate_macro() {
        let outcome = evaluate_macro("A + (B / 2)", &["2d20", "10"]).unwrap();
        assert_eq!(outcome.rolls.len(), 1);
        assert_eq!(outcome.rolls[0].expression, "2d20");
        let sum: i64 = outcome.rolls[0].results.iter().map(|r| i64::from(*r)).sum();
        assert_eq!(outcome.value, sum + 5);
    }

    #[test]
    fn test_validate_macro() {
        assert_eq!(validate_macro("A + B"), Ok(()));
        assert_eq!(validate_macro("4 * (A + B)"), Ok(()));
        assert_eq!(validate_macro("Ad20 + B"), Ok(()));
        assert_eq!(validate_macro("2d6"), Ok(()));
        assert_eq!(validate_macro("(A + B"), Err(EvalError::MismatchedParen));
        assert_eq!(validate_macro("A +"), Err(EvalError::MalformedExpression));
        assert_eq!(validate_macro("A / (B - 1)"), Err(EvalError::DivisionByZero));
        assert_eq!(
            validate_macro("A + x"),
            Err(EvalError::InvalidToken("1 + x".to_string()))
        );
    }

    #[test]
    fn test_validate_macro_with_limits() {
        let limits = RollLimits::new(20, 200);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        assert_eq!(validate_macro_with("20d200 + A", &limits, &mut rng), Ok(()));
        assert_eq!(validate_macro_with("Ad200!", &limits, &mut rng), Ok(()));
        assert_eq!(
            validate_macro_with("A + 21d6", &limits, &mut rng),
            Err(EvalError::RangeExceeded {
                term: "21d6".to_string(),
                bound: Bound::Repeats,
                limit: 20,
                found: 21
            })
        );
        assert_eq!(
            validate_macro_with("4000000000d4000000000", &limits, &mut rng),
            Err(EvalError::RangeExceeded {
                term: "4000000000d4000000000".to_string(),
                bound: Bound::Repeats,
                limit: 20,
                found: 4_000_000_000
            })
        );
        assert_eq!(
            validate_macro_with("1d500", &limits, &mut rng),
            Err(EvalError::RangeExceeded {
                term: "1d500".to_string(),
                bound: Bound::Sides,
                limit: 200,
                found: 500
            })
        );
        // same template passes without limits
        assert_eq!(validate_macro("A + 21d6"), Ok(()));
    }

    #[test]
    fn test_validate_matches_evaluation_with_ones() {
        let ones = ["1"; MAX_PLACEHOLDERS];
        for template in &[
            "A + B",
            "A +",
            "(A",
            "A / (B - C)",
            "Zd6! * Y",
            "hello",
            "",
            "A d B",
        ] {
            assert_eq!(
                validate_macro(template).is_ok(),
                evaluate_macro(template, &ones).is_ok(),
                "{}",
                template
            );
        }
    }
}
