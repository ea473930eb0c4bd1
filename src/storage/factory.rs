//! 存储工厂模块
//!
//! 根据配置创建相应的画像存储实例。

use std::sync::Arc;

use crate::config::config::{ApiConfig, StoreBackend};
use crate::error::Result;
use crate::storage::http::HttpProfileStore;
use crate::storage::memory::InMemoryProfileStore;
use crate::storage::repository::ProfileStore;

/// 根据配置创建画像存储
pub fn create_profile_store(config: &ApiConfig) -> Result<Arc<dyn ProfileStore>> {
    match config.backend {
        StoreBackend::Http => {
            let store = HttpProfileStore::new(config)?;
            tracing::info!("Using HTTP profile store at {}", store.collection_url());
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::info!("Using in-memory profile store");
            Ok(Arc::new(InMemoryProfileStore::new()))
        }
    }
}
