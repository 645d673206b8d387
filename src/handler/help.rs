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


use dicemancer_utils::{storage::MAX_NAME_LENGTH, RollLimits};

fn limit_text(limit: Option<u32>, unit: &str) -> String {
    match limit {
        Some(limit) => format!("up to {} {}", limit, unit),
        None => format!("any number of {}", unit),
    }
}

pub(crate) fn help(prefix: &str, limits: &RollLimits) -> String {
    format!(
        "**DiceMancer Bot Available Commands**

🎲 Basic Usage  🎲
**{p}roll** <expression>
- Example usage: `{p}roll 4d10 + 5`
- You can give it any arithmetic expression with both numbers and dice notation.
- Dice notation must be in the form XdY, where X and Y are integers.
- For advantage and disadvantage, you can write ! or ? after your dice notation to get the highest and lowest roll respectively. For example, 4d10! will get the highest of the four rolls, while 4d10? will get the lowest.
- You can roll dice with {sides} and {repeats} at once.{total}

🎲 Macros  🎲
A macro is an expression you can re-use again and again. Macros can have inputs, which must be written as uppercase letters starting from A. If the macro only has one input, it must be named A; two, must be named A and B, and so on.

For example, you can have a macro: `4 * (A + B)`
You will be able to roll this macro substituting anything you'd like for the variables A and B.

**{p}make-macro** <name> <expression>
- This is used to create a macro. For example: `{p}make-macro my-macro 4 * (A + B)`
- Macro names cannot contain whitespace and have a maximum of {name_length} characters.

**{p}roll-macro** <name> <inputs separated by spaces>
- This is how you roll a macro once it's created. Specify the name of the macro, following by what you want the A, B, C, etc to be separated by spaces. (They can be either numbers or dice notation.)
- For example: `{p}roll-macro my-macro 10 4d6`

There are several other commands to help you view, edit, and delete macros:
**{p}list-macros** | Lists all macros available.
**{p}view-macro** <name> | Displays the macro with the given name.
**{p}delete-macro** <name> | Deletes the macro with the given name.
**{p}edit-macro** <name> <expression> | Updates the existing macro.

Macros are tied to the server and macros created by this server can only be used in this server.
",
        p = prefix,
        sides = limit_text(limits.max_sides, "sides"),
        repeats = limit_text(limits.max_repeats, "rolls"),
        total = match limits.max_total() {
            Some(total) => format!(" A single dice term totals at most {}.", total),
            None => String::new(),
        },
        name_length = MAX_NAME_LENGTH,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_and_limits() {
        let text = help("!", &RollLimits::new(20, 200));
        assert!(text.contains("**!roll** <expression>"));
        assert!(text.contains("`!roll-macro my-macro 10 4d6`"));
        assert!(text.contains("up to 200 sides and up to 20 rolls at once"));
        assert!(text.contains("A single dice term totals at most 4000."));
        assert!(!text.contains("/roll"));
    }

    #[test]
    fn test_unlimited() {
        let text = help("/", &RollLimits::UNLIMITED);
        assert!(text.contains("any number of sides and any number of rolls at once.\n"));
        assert!(!text.contains("totals at most"));
    }
}
