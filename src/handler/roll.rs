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


use dicemancer_utils::{EvalError, EvaluationOutcome};

pub(crate) fn roll(expression: &str, outcome: Result<EvaluationOutcome, EvalError>) -> String {
    match outcome {
        Ok(outcome) => {
            let roll_results: String = outcome
                .rolls
                .iter()
                .map(|roll| {
                    format!(
                        "> 🎲 **{}** [{}]\n",
                        roll.expression,
                        roll.results
                            .iter()
                            .map(|r| r.to_string())
                            .collect::<Vec<_>>()
                            .join(" ")
                    )
                })
                .collect();
            format!(
                "You asked me to roll: {}\nYou rolled a **{}**!\n> *ROLL RESULTS*\n{}",
                expression, outcome.value, roll_results
            )
        }
        Err(err) => format!(
            "**Uh-oh!** Error occurred parsing: {} \n{}",
            expression, err
        ),
    }
}
