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


mod handler;

use dicemancer_utils::{
    access::{AccessCheck, AllowAll, AllowlistFile},
    config::Config,
    rolls::RollExecutor,
    storage::SqliteMacroStore,
    ClientUtils,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() {
    pretty_env_logger::init();
    log::info!("logger created");
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "dicemancer.toml".to_string());
    let config = Config::load(&config_path);

    let (store, db_worker) = match SqliteMacroStore::open(
        config.db_path.clone(),
        config.db_queue_size,
        config.cache_size,
    ) {
        Ok(store) => store,
        Err(err) => {
            log::error!("unable to open macro database {}: {}", &config.db_path, err);
            std::process::exit(1);
        }
    };
    let access: Arc<dyn AccessCheck> = match &config.allowlist_path {
        Some(path) => Arc::new(AllowlistFile::new(path.clone())),
        None => Arc::new(AllowAll),
    };
    let utils = ClientUtils::new(
        Arc::new(RollExecutor::new(
            config.rng_workers,
            config.rng_reseed,
            config.limits,
        )),
        Arc::new(store),
        access,
        config.command_prefix.clone(),
    );

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                log::info!("shutting down");
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if let Some(response) = utils.eval(&config.console_group, &line).await {
                        println!(
                            "{}",
                            handler::respond(response, utils.command_prefix(), &config.limits)
                        );
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    log::error!("unable to read from stdin: {}", err);
                    break;
                }
            },
        }
    }

    drop(utils);
    if db_worker.join().is_err() {
        log::error!("db worker panicked");
    }
}

async fn shutdown_signal() {
    #[cfg(target_family = "unix")]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::hangup()) {
            Ok(mut hangup) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = hangup.recv() => {}
                }
            }
            Err(err) => {
                log::warn!("unable to listen for SIGHUP: {}", err);
                wait_ctrl_c().await;
            }
        }
    }
    #[cfg(not(target_family = "unix"))]
    wait_ctrl_c().await;
}

async fn wait_ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("unable to listen for ctrl-c: {}", err);
        std::future::pending::<()>().await;
    }
}
