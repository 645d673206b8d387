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
    dice_types::{DiceTerm, Modifier, Token, TokenKind},
    error::{Bound, EvalError},
};

pub trait DiceLimits {
    fn min(&self) -> i64;
    fn max(&self) -> i64;
}

impl DiceLimits for DiceTerm {
    fn min(&self) -> i64 {
        match self.modifier {
            Modifier::None => i64::from(self.repeats),
            Modifier::Highest | Modifier::Lowest => 1,
        }
    }

    fn max(&self) -> i64 {
        match self.modifier {
            Modifier::None => i64::from(self.repeats).saturating_mul(i64::from(self.sides)),
            Modifier::Highest | Modifier::Lowest => i64::from(self.sides),
        }
    }
}

/// Upper bounds for dice terms, checked before anything is rolled.
/// `None` leaves that bound unchecked.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct RollLimits {
    pub max_repeats: Option<u32>,
    pub max_sides: Option<u32>,
}

impl RollLimits {
    pub const UNLIMITED: RollLimits = RollLimits {
        max_repeats: None,
        max_sides: None,
    };

    pub fn new(max_repeats: u32, max_sides: u32) -> RollLimits {
        RollLimits {
            max_repeats: Some(max_repeats),
            max_sides: Some(max_sides),
        }
    }

    /// Largest value a single dice term can total within these limits.
    pub fn max_total(&self) -> Option<i64> {
        match (self.max_repeats, self.max_sides) {
            (Some(repeats), Some(sides)) => Some(
                DiceTerm {
                    repeats,
                    sides,
                    modifier: Modifier::None,
                }
                .max(),
            ),
            _ => None,
        }
    }

    pub fn check(&self, term: &DiceTerm, text: &str) -> Result<(), EvalError> {
        let exceeded = |bound: Bound, limit: Option<u32>, found: u32| match limit {
            Some(limit) if found > limit => Err(EvalError::RangeExceeded {
                term: text.to_owned(),
                bound,
                limit,
                found,
            }),
            _ => Ok(()),
        };
        exceeded(Bound::Repeats, self.max_repeats, term.repeats)?;
        exceeded(Bound::Sides, self.max_sides, term.sides)
    }

    pub fn check_all(&self, tokens: &[Token<'_>]) -> Result<(), EvalError> {
        tokens.iter().try_for_each(|token| match token.kind {
            TokenKind::Dice(term) => self.check(&term, token.text),
            _ => Ok(()),
        })
    }
}
