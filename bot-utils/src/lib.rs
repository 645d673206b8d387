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


#[macro_use]
extern crate diesel;

pub mod access;
pub mod commands;
pub mod config;
pub mod rolls;
pub mod storage;

use access::AccessCheck;
use commands::Command;
use dicemancer_roll::fill_macro;
pub use dicemancer_roll::{DiceRoll, EvalError, EvaluationOutcome, RollLimits};
use rolls::RollExecutor;
use std::sync::Arc;
use storage::MacroStore;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("unable to open database: {0}")]
    Connection(#[from] diesel::ConnectionError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("worker queue closed")]
    WorkerClosed,
}

/// What a command did, left to the front end to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Help,
    Roll {
        expression: String,
        outcome: Result<EvaluationOutcome, EvalError>,
    },
    MacroCreated {
        name: String,
        expression: String,
    },
    MacroExists(String),
    InvalidMacro(EvalError),
    InvalidMacroName(String),
    MacroNotFound(String),
    ListMacros(Vec<(String, String)>),
    ViewMacro {
        name: String,
        expression: String,
    },
    MacroDeleted(String),
    MacroUpdated {
        name: String,
        expression: String,
    },
    AccessDenied,
    AccessUnavailable,
    Failure,
}

pub struct ClientUtils {
    roller: Arc<RollExecutor>,
    store: Arc<dyn MacroStore>,
    access: Arc<dyn AccessCheck>,
    command_prefix: String,
}

impl ClientUtils {
    pub fn new(
        roller: Arc<RollExecutor>,
        store: Arc<dyn MacroStore>,
        access: Arc<dyn AccessCheck>,
        command_prefix: String,
    ) -> ClientUtils {
        ClientUtils {
            roller,
            store,
            access,
            command_prefix,
        }
    }

    pub fn command_prefix(&self) -> &str {
        &self.command_prefix
    }

    /// Returns `None` when the message is not addressed to us.
    pub async fn eval(&self, group: &str, message: &str) -> Option<CommandResult> {
        let command = commands::parse_logging(message, &self.command_prefix)?;
        Some(match self.access.has_access(group).await {
            Ok(true) => match self.run(group, command).await {
                Ok(result) => result,
                Err(err) => {
                    log::error!("command for {} failed: {}", group, err);
                    CommandResult::Failure
                }
            },
            Ok(false) => {
                log::info!("{} is not on the allowlist", group);
                CommandResult::AccessDenied
            }
            Err(err) => {
                log::warn!("unable to check access for {}: {}", group, err);
                CommandResult::AccessUnavailable
            }
        })
    }

    async fn run(&self, group: &str, command: Command) -> Result<CommandResult, Error> {
        Ok(match command {
            Command::Help => CommandResult::Help,
            Command::Roll(expression) => self.roll_expression(expression).await?,
            Command::MakeMacro(name, expression) => {
                if !storage::is_valid_name(&name) {
                    CommandResult::InvalidMacroName(name)
                } else if self.store.find(group, &name).await?.is_some() {
                    CommandResult::MacroExists(name)
                } else {
                    match self.validate(&expression).await? {
                        Some(err) => CommandResult::InvalidMacro(err),
                        None if self.store.create(group, &name, &expression).await? => {
                            CommandResult::MacroCreated { name, expression }
                        }
                        None => CommandResult::MacroExists(name),
                    }
                }
            }
            Command::RollMacro(name, inputs) => match self.store.find(group, &name).await? {
                Some(found) => {
                    self.roll_expression(fill_macro(&found.expression, &inputs))
                        .await?
                }
                None => CommandResult::MacroNotFound(name),
            },
            Command::ListMacros => CommandResult::ListMacros(
                self.store
                    .list(group)
                    .await?
                    .into_iter()
                    .map(|m| (m.name, m.expression))
                    .collect(),
            ),
            Command::ViewMacro(name) => match self.store.find(group, &name).await? {
                Some(found) => CommandResult::ViewMacro {
                    name: found.name,
                    expression: found.expression,
                },
                None => CommandResult::MacroNotFound(name),
            },
            Command::DeleteMacro(name) => {
                if self.store.delete(group, &name).await? {
                    CommandResult::MacroDeleted(name)
                } else {
                    CommandResult::MacroNotFound(name)
                }
            }
            Command::EditMacro(name, expression) => match self.validate(&expression).await? {
                Some(err) => CommandResult::InvalidMacro(err),
                None if self.store.update(group, &name, &expression).await? => {
                    CommandResult::MacroUpdated { name, expression }
                }
                None => CommandResult::MacroNotFound(name),
            },
        })
    }

    async fn roll_expression(&self, expression: String) -> Result<CommandResult, Error> {
        match self.roller.roll(expression.clone()).await {
            Ok(outcome) => Ok(CommandResult::Roll {
                expression,
                outcome: Ok(outcome),
            }),
            Err(Error::Eval(err)) => Ok(CommandResult::Roll {
                expression,
                outcome: Err(err),
            }),
            Err(err) => Err(err),
        }
    }

    /// `Ok(Some(_))` carries the reason a macro template was rejected.
    async fn validate(&self, expression: &str) -> Result<Option<EvalError>, Error> {
        match self.roller.validate_macro(expression.to_owned()).await {
            Ok(()) => Ok(None),
            // name the template as written, not the text filled in for validation
            Err(Error::Eval(EvalError::InvalidToken(_))) => {
                Ok(Some(EvalError::InvalidToken(expression.to_owned())))
            }
            Err(Error::Eval(err)) => Ok(Some(err)),
            Err(err) => Err(err),
        }
    }
}
