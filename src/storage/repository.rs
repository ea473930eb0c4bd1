use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::profile::Profile;

/// 存储结果类型
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// 远程画像集合 trait
///
/// 四个操作相互独立、各自可能失败；本层不做重试，失败时不假设远端发生了部分修改。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// 获取全部画像
    async fn list(&self) -> StoreResult<Vec<Profile>>;

    /// 创建画像（包含客户端生成的 ID），返回存储后的权威记录
    async fn create(&self, profile: &Profile) -> StoreResult<Profile>;

    /// 按 ID 更新画像，返回存储后的权威记录
    async fn update(&self, profile: &Profile) -> StoreResult<Profile>;

    /// 按 ID 删除画像
    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// 后端名称，用于日志
    fn backend_name(&self) -> &'static str;
}
