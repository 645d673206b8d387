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
    dice_types::{DiceTerm, Modifier, Operator, Token, TokenKind},
    error::EvalError,
};

use nom::{
    branch::alt,
    character::complete::{char, digit1},
    combinator::{map, map_res, opt, verify},
    sequence::{preceded, tuple},
    IResult,
};

#[cfg(feature = "logging")]
use log::debug;

pub fn parse_u32(input: &str) -> IResult<&str, u32> {
    verify(
        map_res(digit1, |s: &str| s.parse::<u32>()),
        |value: &u32| value > &0,
    )(input)
}

pub fn parse_integer(input: &str) -> IResult<&str, i64> {
    map_res(digit1, |s: &str| s.parse::<i64>())(input)
}

pub fn parse_modifier(input: &str) -> IResult<&str, Modifier> {
    map(
        opt(alt((
            map(char('!'), |_| Modifier::Highest),
            map(char('?'), |_| Modifier::Lowest),
        ))),
        |modifier| modifier.unwrap_or(Modifier::None),
    )(input)
}

pub fn parse_dice_term(input: &str) -> IResult<&str, DiceTerm> {
    map(
        tuple((parse_u32, preceded(char('d'), parse_u32), parse_modifier)),
        |(repeats, sides, modifier)| DiceTerm {
            repeats,
            sides,
            modifier,
        },
    )(input)
}

pub fn parse_operator(input: &str) -> IResult<&str, Operator> {
    alt((
        map(char('+'), |_| Operator::Add),
        map(char('-'), |_| Operator::Sub),
        map(char('*'), |_| Operator::Mul),
        map(char('/'), |_| Operator::Div),
    ))(input)
}

pub fn parse_token(input: &str) -> IResult<&str, TokenKind> {
    alt((
        map(parse_dice_term, TokenKind::Dice),
        map(parse_integer, TokenKind::Integer),
        map(parse_operator, TokenKind::Operator),
        map(char('('), |_| TokenKind::LeftParen),
        map(char(')'), |_| TokenKind::RightParen),
    ))(input)
}

/// Scans `input` for tokens. Characters that do not start a token are skipped,
/// so the result has to go through [`validate_tokens`] before it is trusted.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = input;
    while let Some(next) = rest.chars().next() {
        match parse_token(rest) {
            Ok((remaining, kind)) => {
                tokens.push(Token {
                    kind,
                    text: &rest[..rest.len() - remaining.len()],
                });
                rest = remaining;
            }
            Err(_) => rest = &rest[next.len_utf8()..],
        }
    }
    #[cfg(feature = "logging")]
    {
        debug!("tokenized {:?} into {:?}", input, &tokens);
    }
    tokens
}

pub fn validate_tokens(input: &str, tokens: &[Token<'_>]) -> Result<(), EvalError> {
    let expected: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let found: String = tokens.iter().map(|token| token.text).collect();
    if expected == found {
        Ok(())
    } else {
        Err(EvalError::InvalidToken(input.to_owned()))
    }
}
