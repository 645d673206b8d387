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
use serde::Deserialize;
use std::path::PathBuf;
use tokio::fs;

/// Decides whether a group may use the bot at all.
#[async_trait]
pub trait AccessCheck: Send + Sync {
    async fn has_access(&self, group: &str) -> Result<bool, Error>;
}

pub struct AllowAll;

#[async_trait]
impl AccessCheck for AllowAll {
    async fn has_access(&self, _group: &str) -> Result<bool, Error> {
        Ok(true)
    }
}

#[derive(Debug, Deserialize)]
struct AllowedServers {
    #[serde(rename = "allowedServers")]
    allowed_servers: Vec<String>,
}

/// JSON allowlist of the form `{"allowedServers": ["..."]}`.
///
/// The file is read again on every check, so edits apply without a restart.
pub struct AllowlistFile {
    path: PathBuf,
}

impl AllowlistFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> AllowlistFile {
        AllowlistFile { path: path.into() }
    }
}

#[async_trait]
impl AccessCheck for AllowlistFile {
    async fn has_access(&self, group: &str) -> Result<bool, Error> {
        let content = fs::read(&self.path).await?;
        let allowed: AllowedServers = serde_json::from_slice(&content)?;
        Ok(allowed.allowed_servers.iter().any(|g| g == group))
    }
}
