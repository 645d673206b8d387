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


use dicemancer_utils::{CommandResult, RollLimits};

mod access;
use access::{access_denied, access_unavailable};
mod help;
use help::help;
mod macros;
use macros::{
    invalid_macro, invalid_macro_name, list_macros, macro_created, macro_deleted, macro_exists,
    macro_not_found, macro_updated, view_macro,
};
mod roll;
use roll::roll;

/// Renders a command result as a chat message.
pub(crate) fn respond(response: CommandResult, prefix: &str, limits: &RollLimits) -> String {
    match response {
        CommandResult::Help => help(prefix, limits),
        CommandResult::Roll {
            expression,
            outcome,
        } => roll(&expression, outcome),
        CommandResult::MacroCreated { name, expression } => macro_created(&name, &expression),
        CommandResult::MacroExists(name) => macro_exists(&name),
        CommandResult::InvalidMacro(err) => invalid_macro(&err),
        CommandResult::InvalidMacroName(_) => invalid_macro_name(),
        CommandResult::MacroNotFound(name) => macro_not_found(&name),
        CommandResult::ListMacros(macros) => list_macros(&macros, prefix),
        CommandResult::ViewMacro { name, expression } => view_macro(&name, &expression),
        CommandResult::MacroDeleted(name) => macro_deleted(&name),
        CommandResult::MacroUpdated { name, expression } => macro_updated(&name, &expression),
        CommandResult::AccessDenied => access_denied(),
        CommandResult::AccessUnavailable => access_unavailable(),
        CommandResult::Failure => "Something went wrong. Please try again later.".to_string(),
    }
}
