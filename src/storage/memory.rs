//! 进程内画像存储
//!
//! 直通式存储：按插入顺序保存记录，写入后原样返回。

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::models::profile::Profile;
use crate::storage::repository::{ProfileStore, StoreResult};

/// 内存画像存储
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<Vec<Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用初始记录创建
    pub fn with_profiles(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
        }
    }

    /// 当前记录快照
    pub fn profiles(&self) -> Vec<Profile> {
        self.profiles.read().clone()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn list(&self) -> StoreResult<Vec<Profile>> {
        Ok(self.profiles.read().clone())
    }

    async fn create(&self, profile: &Profile) -> StoreResult<Profile> {
        let mut profiles = self.profiles.write();
        if profiles.iter().any(|p| p.id == profile.id) {
            return Err(StoreError::Create {
                reason: format!("profile {} already exists", profile.id),
            });
        }
        profiles.push(profile.clone());
        Ok(profile.clone())
    }

    async fn update(&self, profile: &Profile) -> StoreResult<Profile> {
        let mut profiles = self.profiles.write();
        match profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(slot) => {
                *slot = profile.clone();
                Ok(profile.clone())
            }
            None => Err(StoreError::Update {
                id: profile.id.clone(),
                reason: "not found".to_string(),
            }),
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut profiles = self.profiles.write();
        let before = profiles.len();
        profiles.retain(|p| p.id != id);
        if profiles.len() == before {
            return Err(StoreError::Delete {
                id: id.to_string(),
                reason: "not found".to_string(),
            });
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
