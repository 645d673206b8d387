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


use crate::Error;
use dicemancer_roll::{EvaluationOutcome, RollLimits};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rusty_pool::{Builder, ThreadPool};
use std::time::Duration;
use tokio::{
    sync::{mpsc, oneshot},
    task::spawn,
    time::{interval_at, Instant},
};

#[derive(Debug)]
enum RngProviderOps {
    GetRng(oneshot::Sender<Xoshiro256PlusPlus>),
    SetCryptoRng(ChaCha20Rng),
}

/// Hands out fast generators seeded from a periodically reseeded crypto generator.
struct RngProvider {
    rng: ChaCha20Rng,
    receiver: mpsc::Receiver<RngProviderOps>,
}

impl RngProvider {
    async fn run(mut self) {
        while let Some(op) = self.receiver.recv().await {
            match op {
                RngProviderOps::GetRng(channel) => {
                    let mut seed: <Xoshiro256PlusPlus as SeedableRng>::Seed = Default::default();
                    self.rng.fill(&mut seed);
                    // requester gone, nothing to hand out
                    let _ = channel.send(Xoshiro256PlusPlus::from_seed(seed));
                }
                RngProviderOps::SetCryptoRng(rng) => self.rng = rng,
            }
        }
        log::debug!("rng provider stopped");
    }
}

fn start_rng_provider(
    rng_reseed: Duration,
) -> (mpsc::Sender<RngProviderOps>, oneshot::Sender<()>) {
    let (sender, receiver) = mpsc::channel(32);
    spawn(
        RngProvider {
            rng: ChaCha20Rng::from_entropy(),
            receiver,
        }
        .run(),
    );
    let rng_reseed = rng_reseed.max(Duration::from_secs(1));
    let (stop_sender, mut stop) = oneshot::channel::<()>();
    let reseed_sender = sender.clone();
    spawn(async move {
        let mut interval = interval_at(Instant::now() + rng_reseed, rng_reseed);
        loop {
            tokio::select! {
                _ = &mut stop => break,
                _ = interval.tick() => {
                    if reseed_sender
                        .send(RngProviderOps::SetCryptoRng(ChaCha20Rng::from_entropy()))
                        .await
                        .is_err()
                    {
                        break;
                    }
                    log::debug!("reseeded rng provider");
                }
            }
        }
    });
    (sender, stop_sender)
}

/// Evaluates expressions on a dedicated thread pool so rolling never blocks the runtime.
pub struct RollExecutor {
    pool: ThreadPool,
    limits: RollLimits,
    rng_gen: mpsc::Sender<RngProviderOps>,
    _stop_reseed: oneshot::Sender<()>,
}

impl RollExecutor {
    /// Must be called from within a tokio runtime.
    pub fn new(size: u32, rng_reseed: Duration, limits: RollLimits) -> RollExecutor {
        let (rng_gen, stop_reseed) = start_rng_provider(rng_reseed);
        RollExecutor {
            pool: Builder::new()
                .core_size(1)
                .max_size(size.max(1))
                .name("Roll Worker".to_string())
                .build(),
            limits,
            rng_gen,
            _stop_reseed: stop_reseed,
        }
    }

    pub fn limits(&self) -> &RollLimits {
        &self.limits
    }

    async fn execute<T, F>(&self, job: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&mut Xoshiro256PlusPlus) -> T + Send + 'static,
    {
        let (rng_send, rng_receive) = oneshot::channel();
        self.rng_gen
            .send(RngProviderOps::GetRng(rng_send))
            .await
            .map_err(|_| Error::WorkerClosed)?;
        let mut rng = rng_receive.await.map_err(|_| Error::WorkerClosed)?;
        let (result_sender, result_receiver) = oneshot::channel();
        self.pool.execute(move || {
            let _ = result_sender.send(job(&mut rng));
        });
        result_receiver.await.map_err(|_| Error::WorkerClosed)
    }

    /// Evaluates `expression` within the configured limits.
    pub async fn roll(&self, expression: String) -> Result<EvaluationOutcome, Error> {
        let limits = self.limits;
        Ok(self
            .execute(move |rng| dicemancer_roll::evaluate_with(&expression, &limits, rng))
            .await??)
    }

    /// Rejects templates that are malformed or could not be rolled within the configured limits.
    pub async fn validate_macro(&self, template: String) -> Result<(), Error> {
        let limits = self.limits;
        Ok(self
            .execute(move |rng| dicemancer_roll::validate_macro_with(&template, &limits, rng))
            .await??)
    }
}
