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

use std::fmt;
use thiserror::Error;

/// Which part of a dice term ran into a [`crate::RollLimits`] bound.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Bound {
    Repeats,
    Sides,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Bound::Repeats => "dice",
            Bound::Sides => "sides",
        })
    }
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum EvalError {
    #[error("Invalid tokens found in {0:?}")]
    InvalidToken(String),
    #[error("Unable to parse: mismatched parens")]
    MismatchedParen,
    #[error("Unable to parse malformed input")]
    MalformedExpression,
    #[error("Unable to evaluate: division by zero")]
    DivisionByZero,
    #[error("{term} is out of range: at most {limit} {bound} allowed")]
    RangeExceeded {
        term: String,
        bound: Bound,
        limit: u32,
        found: u32,
    },
    #[error("Unable to evaluate: integer overflow")]
    Overflow,
}
