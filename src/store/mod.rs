use std::future::Future;

use anyhow::Result;

use crate::db::Database;

mod baseline;
pub mod keys;
mod memory;

pub use baseline::{BaselineCommit, BaselineStore};
pub use memory::MemoryStore;

/// String-keyed persistence used for the baseline and history log.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;
}

impl KeyValueStore for Database {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_value(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value).await
    }
}
