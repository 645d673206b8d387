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


use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{multispace0, multispace1, satisfy},
    combinator::{eof, map, recognize, rest, success, verify},
    multi::many1,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};
use unicode_categories::UnicodeCategories;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Roll(String),
    MakeMacro(String, String),
    RollMacro(String, Vec<String>),
    ListMacros,
    ViewMacro(String),
    DeleteMacro(String),
    EditMacro(String, String),
}

fn chars_set(input: &str) -> IResult<&str, char> {
    satisfy(|c| !(c.is_separator() || c.is_other()))(input)
}

fn parse_name(input: &str) -> IResult<&str, String> {
    map(recognize(many1(chars_set)), |s: &str| s.to_owned())(input)
}

/// Everything up to the end of the message, must not be blank.
fn parse_text(input: &str) -> IResult<&str, String> {
    map(verify(rest, |s: &str| !s.trim().is_empty()), |s: &str| {
        s.trim().to_owned()
    })(input)
}

fn parse_help(input: &str) -> IResult<&str, Command> {
    map(tag_no_case("help-me-roll"), |_| Command::Help)(input)
}

fn parse_roll(input: &str) -> IResult<&str, Command> {
    map(
        preceded(pair(tag_no_case("roll"), multispace1), parse_text),
        Command::Roll,
    )(input)
}

fn parse_make_macro(input: &str) -> IResult<&str, Command> {
    map(
        preceded(
            pair(tag_no_case("make-macro"), multispace1),
            pair(terminated(parse_name, multispace1), parse_text),
        ),
        |(name, expression)| Command::MakeMacro(name, expression),
    )(input)
}

fn parse_edit_macro(input: &str) -> IResult<&str, Command> {
    map(
        preceded(
            pair(tag_no_case("edit-macro"), multispace1),
            pair(terminated(parse_name, multispace1), parse_text),
        ),
        |(name, expression)| Command::EditMacro(name, expression),
    )(input)
}

fn parse_roll_macro(input: &str) -> IResult<&str, Command> {
    map(
        preceded(
            pair(tag_no_case("roll-macro"), multispace1),
            pair(parse_name, rest),
        ),
        |(name, inputs): (String, &str)| {
            Command::RollMacro(
                name,
                inputs.split_whitespace().map(|s| s.to_owned()).collect(),
            )
        },
    )(input)
}

fn parse_list_macros(input: &str) -> IResult<&str, Command> {
    map(tag_no_case("list-macros"), |_| Command::ListMacros)(input)
}

fn parse_view_macro(input: &str) -> IResult<&str, Command> {
    map(
        preceded(pair(tag_no_case("view-macro"), multispace1), parse_name),
        Command::ViewMacro,
    )(input)
}

fn parse_delete_macro(input: &str) -> IResult<&str, Command> {
    map(
        preceded(pair(tag_no_case("delete-macro"), multispace1), parse_name),
        Command::DeleteMacro,
    )(input)
}

fn parse_command<'a>(input: &'a str, prefix: &str) -> IResult<&'a str, Command> {
    preceded(
        pair(multispace0, tag(prefix)),
        alt((
            delimited(
                multispace0,
                alt((
                    parse_help,
                    parse_make_macro,
                    parse_edit_macro,
                    parse_roll_macro,
                    parse_list_macros,
                    parse_view_macro,
                    parse_delete_macro,
                    parse_roll,
                )),
                pair(multispace0, eof),
            ),
            success(Command::Help),
        )),
    )(input)
}

/// Anything carrying the prefix is a command, unknown ones fall back to help.
pub fn parse(message: &str, prefix: &str) -> Option<Command> {
    match parse_command(message, prefix) {
        Ok((_, command)) => Some(command),
        Err(_) => None,
    }
}

pub fn parse_logging(message: &str, prefix: &str) -> Option<Command> {
    let command = parse(message, prefix);
    if let Some(command) = &command {
        log::info!("parsed {:?} from {:?}", command, message);
    }
    command
}
