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

use crate::{
    dice_types::{DiceRoll, DiceTerm, EvaluationOutcome, Modifier, Operator, Token, TokenKind},
    error::EvalError,
};
use rand::{distributions::Uniform, Rng};

#[cfg(feature = "logging")]
use log::debug;

pub trait DiceEvaluate {
    /// Rolls the dice and returns the combined value together with every single die.
    fn evaluate<R: Rng>(&self, rng: &mut R) -> Result<(i64, Vec<u32>), EvalError>;
}

impl DiceEvaluate for DiceTerm {
    fn evaluate<R: Rng>(&self, rng: &mut R) -> Result<(i64, Vec<u32>), EvalError> {
        if self.repeats == 0 || self.sides == 0 {
            return Err(EvalError::InvalidToken(self.to_string()));
        }
        let dist = Uniform::new_inclusive(1, self.sides);
        let mut rolls: Vec<u32> = Vec::with_capacity(self.repeats as usize);
        for _ in 0..self.repeats {
            rolls.push(rng.sample(dist));
        }

        let result = match self.modifier {
            Modifier::None => rolls
                .iter()
                .try_fold(0i64, |sum, roll| sum.checked_add(i64::from(*roll)))
                .ok_or(EvalError::Overflow)?,
            Modifier::Highest => rolls.iter().max().map_or(0, |roll| i64::from(*roll)),
            Modifier::Lowest => rolls.iter().min().map_or(0, |roll| i64::from(*roll)),
        };

        #[cfg(feature = "logging")]
        {
            debug!("Dice roll result for {} is {} from {:?}", &self, result, &rolls);
        }

        Ok((result, rolls))
    }
}

impl Operator {
    /// `a op b`, division truncates toward zero.
    pub fn apply(self, a: i64, b: i64) -> Result<i64, EvalError> {
        match self {
            Operator::Add => a.checked_add(b).ok_or(EvalError::Overflow),
            Operator::Sub => a.checked_sub(b).ok_or(EvalError::Overflow),
            Operator::Mul => a.checked_mul(b).ok_or(EvalError::Overflow),
            Operator::Div => {
                if b == 0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    a.checked_div(b).ok_or(EvalError::Overflow)
                }
            }
        }
    }
}

/// Runs the postfix token stream on a value stack, rolling dice as they come up.
pub fn evaluate_postfix<R: Rng>(
    postfix: &[Token<'_>],
    rng: &mut R,
) -> Result<EvaluationOutcome, EvalError> {
    let mut stack: Vec<i64> = Vec::with_capacity(postfix.len());
    let mut rolls: Vec<DiceRoll> = Vec::new();

    for token in postfix {
        match token.kind {
            TokenKind::Dice(term) => {
                let (value, results) = term.evaluate(rng)?;
                rolls.push(DiceRoll {
                    expression: token.text.to_owned(),
                    results,
                });
                stack.push(value);
            }
            TokenKind::Integer(value) => stack.push(value),
            TokenKind::Operator(op) => {
                let (b, a) = match (stack.pop(), stack.pop()) {
                    (Some(b), Some(a)) => (b, a),
                    _ => return Err(EvalError::MalformedExpression),
                };
                stack.push(op.apply(a, b)?);
            }
            TokenKind::LeftParen | TokenKind::RightParen => {
                return Err(EvalError::MalformedExpression)
            }
        }
    }

    match stack.as_slice() {
        [value] => Ok(EvaluationOutcome {
            value: *value,
            rolls,
        }),
        _ => Err(EvalError::MalformedExpression),
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::{parser::tokenize, postfix::to_postfix};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn rng() -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(0x5eed)
    }

    fn run(input: &str) -> Result<EvaluationOutcome, EvalError> {
        let tokens = tokenize(input);
        evaluate_postfix(&to_postfix(&tokens)?, &mut rng())
    }

    fn term(repeats: u32, sides: u32, modifier: Modifier) -> DiceTerm {
        DiceTerm {
            repeats,
            sides,
            modifier,
        }
    }

    #[test]
    fn test_sum() {
        let mut rng = rng();
        for sides in &[1, 2, 6, 20, 200] {
            for repeats in 1..=20 {
                let (value, rolls) = term(repeats, *sides, Modifier::None)
                    .evaluate(&mut rng)
                    .unwrap();
                assert_eq!(rolls.len(), repeats as usize);
                assert!(rolls.iter().all(|r| *r >= 1 && r <= sides));
                assert_eq!(value, rolls.iter().map(|r| i64::from(*r)).sum::<i64>());
            }
        }
    }

    #[test]
    fn test_highest_and_lowest() {
        let mut rng = rng();
        for _ in 0..100 {
            let (high, rolls) = term(4, 10, Modifier::Highest).evaluate(&mut rng).unwrap();
            assert_eq!(rolls.len(), 4);
            assert_eq!(high, i64::from(*rolls.iter().max().unwrap()));

            let (low, rolls) = term(3, 6, Modifier::Lowest).evaluate(&mut rng).unwrap();
            assert_eq!(rolls.len(), 3);
            assert_eq!(low, i64::from(*rolls.iter().min().unwrap()));
        }
    }

    #[test]
    fn test_single_sided() {
        assert_eq!(
            term(5, 1, Modifier::None).evaluate(&mut rng()),
            Ok((5, vec![1; 5]))
        );
    }

    #[test]
    fn test_zero_dice_rejected() {
        assert_eq!(
            term(0, 6, Modifier::None).evaluate(&mut rng()),
            Err(EvalError::InvalidToken("0d6".to_string()))
        );
        assert_eq!(
            term(2, 0, Modifier::Highest).evaluate(&mut rng()),
            Err(EvalError::InvalidToken("2d0!".to_string()))
        );
    }

    #[test]
    fn test_apply() {
        assert_eq!(Operator::Add.apply(2, 3), Ok(5));
        assert_eq!(Operator::Sub.apply(2, 3), Ok(-1));
        assert_eq!(Operator::Mul.apply(-2, 3), Ok(-6));
        assert_eq!(Operator::Div.apply(7, 2), Ok(3));
        assert_eq!(Operator::Div.apply(-7, 2), Ok(-3));
        assert_eq!(Operator::Div.apply(1, 0), Err(EvalError::DivisionByZero));
        assert_eq!(Operator::Add.apply(i64::MAX, 1), Err(EvalError::Overflow));
        assert_eq!(Operator::Mul.apply(i64::MIN, -1), Err(EvalError::Overflow));
        assert_eq!(Operator::Div.apply(i64::MIN, -1), Err(EvalError::Overflow));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(
            run("1+(4*6)/2"),
            Ok(EvaluationOutcome {
                value: 13,
                rolls: vec![]
            })
        );
        assert_eq!(run("8-4-2").map(|o| o.value), Ok(2));
        assert_eq!(run("2*3+4*5").map(|o| o.value), Ok(26));
        assert_eq!(run("1-10").map(|o| o.value), Ok(-9));
        assert_eq!(run("(1-10)/2").map(|o| o.value), Ok(-4));
        assert_eq!(run("42").map(|o| o.value), Ok(42));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(run("1 +"), Err(EvalError::MalformedExpression));
        assert_eq!(run("+"), Err(EvalError::MalformedExpression));
        assert_eq!(run("1 2"), Err(EvalError::MalformedExpression));
        assert_eq!(run(""), Err(EvalError::MalformedExpression));
        assert_eq!(run("()"), Err(EvalError::MalformedExpression));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(run("5/0"), Err(EvalError::DivisionByZero));
        assert_eq!(run("5/(2-2)"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_roll_trail_follows_evaluation_order() {
        let outcome = run("1d4 * (2d6 + 3d8)").unwrap();
        let expressions: Vec<&str> = outcome
            .rolls
            .iter()
            .map(|r| r.expression.as_str())
            .collect();
        assert_eq!(expressions, vec!["1d4", "2d6", "3d8"]);
        let values: Vec<i64> = outcome
            .rolls
            .iter()
            .map(|r| r.results.iter().map(|v| i64::from(*v)).sum())
            .collect();
        assert_eq!(outcome.value, values[0] * (values[1] + values[2]));
    }

    #[test]
    fn test_dice_with_math() {
        let mut rng = rng();
        let tokens = tokenize("1d20 + 5");
        let postfix = to_postfix(&tokens).unwrap();
        for _ in 0..50 {
            let outcome = evaluate_postfix(&postfix, &mut rng).unwrap();
            assert_eq!(outcome.rolls.len(), 1);
            assert_eq!(outcome.rolls[0].expression, "1d20");
            assert_eq!(outcome.rolls[0].results.len(), 1);
            let roll = outcome.rolls[0].results[0];
            assert!((1..=20).contains(&roll));
            assert_eq!(outcome.value, i64::from(roll) + 5);
        }
    }
}
