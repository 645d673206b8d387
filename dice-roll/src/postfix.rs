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
    dice_types::{Token, TokenKind},
    error::EvalError,
};

#[cfg(feature = "logging")]
use log::debug;

/// Reorders infix tokens into postfix order (shunting yard).
///
/// `*` and `/` bind tighter than `+` and `-`, all four are left associative.
/// The output never contains parentheses.
pub fn to_postfix<'a>(tokens: &[Token<'a>]) -> Result<Vec<Token<'a>>, EvalError> {
    let mut output: Vec<Token<'a>> = Vec::with_capacity(tokens.len());
    // only operators and left parens
    let mut stack: Vec<Token<'a>> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Integer(_) | TokenKind::Dice(_) => output.push(*token),
            TokenKind::Operator(op) => {
                while let Some(top) = stack.last() {
                    match top.kind {
                        TokenKind::Operator(top_op) if top_op.precedence() >= op.precedence() => {
                            output.push(*top);
                            stack.pop();
                        }
                        _ => break,
                    }
                }
                stack.push(*token);
            }
            TokenKind::LeftParen => stack.push(*token),
            TokenKind::RightParen => loop {
                match stack.pop() {
                    Some(Token {
                        kind: TokenKind::LeftParen,
                        ..
                    }) => break,
                    Some(top) => output.push(top),
                    None => return Err(EvalError::MismatchedParen),
                }
            },
        }
    }

    while let Some(top) = stack.pop() {
        if top.kind == TokenKind::LeftParen {
            return Err(EvalError::MismatchedParen);
        }
        output.push(top);
    }

    #[cfg(feature = "logging")]
    {
        debug!(
            "postfix order: {}",
            output
                .iter()
                .map(|t| t.text)
                .collect::<Vec<&str>>()
                .join(" ")
        );
    }
    Ok(output)
}
