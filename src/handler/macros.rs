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


use dicemancer_utils::{storage::MAX_NAME_LENGTH, EvalError};

pub(crate) fn macro_created(name: &str, expression: &str) -> String {
    format!("Macro '{}' created!\nMacro expression: {}", name, expression)
}

pub(crate) fn macro_exists(name: &str) -> String {
    format!("A macro with the name '{}' already exists.", name)
}

pub(crate) fn invalid_macro(err: &EvalError) -> String {
    format!("Invalid macro expression: {}", err)
}

pub(crate) fn invalid_macro_name() -> String {
    format!(
        "Macro names must be between 1 and {} characters long.",
        MAX_NAME_LENGTH
    )
}

pub(crate) fn macro_not_found(name: &str) -> String {
    format!("No macro with the name '{}' was found.", name)
}

pub(crate) fn list_macros(macros: &[(String, String)], prefix: &str) -> String {
    if macros.is_empty() {
        format!(
            "No macros found. Create some with the {}make-macro command.",
            prefix
        )
    } else {
        macros.iter().fold(
            "Macros found: \n".to_string(),
            |mut message, (name, expression)| {
                message.push_str(&format!("**{}**: {}\n", name, expression));
                message
            },
        )
    }
}

pub(crate) fn view_macro(name: &str, expression: &str) -> String {
    format!("Macro '{}' found: {}", name, expression)
}

pub(crate) fn macro_deleted(name: &str) -> String {
    format!("Macro '{}' was deleted.", name)
}

pub(crate) fn macro_updated(name: &str, expression: &str) -> String {
    format!("Macro '{}' was updated: {}", name, expression)
}
