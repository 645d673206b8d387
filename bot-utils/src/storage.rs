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
use async_trait::async_trait;
use cached::{Cached, SizedCache};
use diesel::{connection::SimpleConnection, prelude::*};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

mod schema;
use schema::macros;
use schema::macros::dsl;

pub const MAX_NAME_LENGTH: usize = 128;

const CREATE_MACROS: &str = "CREATE TABLE IF NOT EXISTS macros (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    group_id TEXT NOT NULL,
    name TEXT NOT NULL,
    expression TEXT NOT NULL,
    UNIQUE (group_id, name)
);";

#[derive(Debug, Queryable, Clone, PartialEq, Eq)]
pub struct Macro {
    pub id: i32,
    pub group_id: String,
    pub name: String,
    pub expression: String,
}

#[derive(Debug, Insertable)]
#[table_name = "macros"]
struct NewMacro<'a> {
    group_id: &'a str,
    name: &'a str,
    expression: &'a str,
}

/// Macro names hold between 1 and `MAX_NAME_LENGTH` characters.
pub fn is_valid_name(name: &str) -> bool {
    (1..=MAX_NAME_LENGTH).contains(&name.chars().count())
}

/// Persistent macros, keyed by group and name.
#[async_trait]
pub trait MacroStore: Send + Sync {
    async fn find(&self, group: &str, name: &str) -> Result<Option<Macro>, Error>;
    /// `false` if the group already has a macro with that name.
    async fn create(&self, group: &str, name: &str, expression: &str) -> Result<bool, Error>;
    /// `false` if there was nothing to update.
    async fn update(&self, group: &str, name: &str, expression: &str) -> Result<bool, Error>;
    /// `false` if there was nothing to delete.
    async fn delete(&self, group: &str, name: &str) -> Result<bool, Error>;
    /// All macros of a group, ordered by name.
    async fn list(&self, group: &str) -> Result<Vec<Macro>, Error>;
}

type DbJob = Box<dyn Send + FnOnce(&SqliteConnection)>;
type MacroCache = Arc<Mutex<SizedCache<(String, String), Macro>>>;

pub struct SqliteMacroStore {
    db_submit: mpsc::Sender<DbJob>,
    cache: MacroCache,
}

fn connect(db_url: &str) -> Result<SqliteConnection, Error> {
    let db = SqliteConnection::establish(db_url)?;
    db.batch_execute(CREATE_MACROS)?;
    Ok(db)
}

impl SqliteMacroStore {
    /// Opens the database on a dedicated worker thread.
    ///
    /// The worker stops once the store is dropped and its queue drained.
    pub fn open(
        db_url: String,
        channel_size: usize,
        cache_size: usize,
    ) -> Result<(SqliteMacroStore, std::thread::JoinHandle<()>), Error> {
        let (sender, mut receiver) = mpsc::channel::<DbJob>(channel_size.max(1));
        let (ready_sender, ready_receiver) = std::sync::mpsc::channel();
        let handle = std::thread::Builder::new()
            .name("db_worker".to_string())
            .spawn(move || {
                let db = match connect(&db_url) {
                    Ok(db) => {
                        log::info!("opened macro database {}", &db_url);
                        let _ = ready_sender.send(Ok(()));
                        db
                    }
                    Err(err) => {
                        let _ = ready_sender.send(Err(err));
                        return;
                    }
                };
                while let Some(job) = receiver.blocking_recv() {
                    job(&db);
                }
                log::info!("db worker for {} stopped", &db_url);
            })?;
        ready_receiver.recv().map_err(|_| Error::WorkerClosed)??;
        Ok((
            SqliteMacroStore {
                db_submit: sender,
                cache: Arc::new(Mutex::new(SizedCache::with_size(cache_size.max(1)))),
            },
            handle,
        ))
    }

    async fn submit<T, F>(&self, job: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: Send + 'static + FnOnce(&SqliteConnection) -> QueryResult<T>,
    {
        let (sender, receiver) = oneshot::channel();
        self.db_submit
            .send(Box::new(move |db: &SqliteConnection| {
                let _ = sender.send(job(db));
            }))
            .await
            .map_err(|_| Error::WorkerClosed)?;
        Ok(receiver.await.map_err(|_| Error::WorkerClosed)??)
    }
}

#[async_trait]
impl MacroStore for SqliteMacroStore {
    async fn find(&self, group: &str, name: &str) -> Result<Option<Macro>, Error> {
        let key = (group.to_owned(), name.to_owned());
        let cached = self.cache.lock().cache_get(&key).cloned();
        if cached.is_some() {
            return Ok(cached);
        }
        let cache = self.cache.clone();
        self.submit(move |db| {
            let found = dsl::macros
                .filter(dsl::group_id.eq(key.0.as_str()))
                .filter(dsl::name.eq(key.1.as_str()))
                .first::<Macro>(db)
                .optional()?;
            if let Some(found) = &found {
                cache.lock().cache_set(key, found.clone());
            }
            Ok(found)
        })
        .await
    }

    async fn create(&self, group: &str, name: &str, expression: &str) -> Result<bool, Error> {
        let (group, name, expression) = (group.to_owned(), name.to_owned(), expression.to_owned());
        self.submit(move |db| {
            let existing = dsl::macros
                .filter(dsl::group_id.eq(group.as_str()))
                .filter(dsl::name.eq(name.as_str()))
                .select(dsl::id)
                .first::<i32>(db)
                .optional()?;
            if existing.is_some() {
                return Ok(false);
            }
            diesel::insert_into(dsl::macros)
                .values(&NewMacro {
                    group_id: &group,
                    name: &name,
                    expression: &expression,
                })
                .execute(db)?;
            Ok(true)
        })
        .await
    }

    async fn update(&self, group: &str, name: &str, expression: &str) -> Result<bool, Error> {
        let (group, name, expression) = (group.to_owned(), name.to_owned(), expression.to_owned());
        let cache = self.cache.clone();
        self.submit(move |db| {
            let updated = diesel::update(
                dsl::macros
                    .filter(dsl::group_id.eq(group.as_str()))
                    .filter(dsl::name.eq(name.as_str())),
            )
            .set(dsl::expression.eq(expression.as_str()))
            .execute(db)?;
            cache.lock().cache_remove(&(group, name));
            Ok(updated > 0)
        })
        .await
    }

    async fn delete(&self, group: &str, name: &str) -> Result<bool, Error> {
        let (group, name) = (group.to_owned(), name.to_owned());
        let cache = self.cache.clone();
        self.submit(move |db| {
            let deleted = diesel::delete(
                dsl::macros
                    .filter(dsl::group_id.eq(group.as_str()))
                    .filter(dsl::name.eq(name.as_str())),
            )
            .execute(db)?;
            cache.lock().cache_remove(&(group, name));
            Ok(deleted > 0)
        })
        .await
    }

    async fn list(&self, group: &str) -> Result<Vec<Macro>, Error> {
        let group = group.to_owned();
        self.submit(move |db| {
            dsl::macros
                .filter(dsl::group_id.eq(group.as_str()))
                .order(dsl::name.asc())
                .load::<Macro>(db)
        })
        .await
    }
}
