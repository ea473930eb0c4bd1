//! 编辑会话与删除意图
//!
//! 两者都是瞬态值：只存在于内存中，取消或完成后即被丢弃，从不持久化。

use serde::{Deserialize, Serialize};

use super::profile::Profile;

/// 编辑会话
///
/// 打开新增/编辑表单时创建，逐字段修改草稿，取消或保存成功后销毁。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSession {
    /// 草稿
    pub draft: Profile,

    /// 是否为新建画像
    pub is_new: bool,

    /// 打开后是否有字段被修改
    pub is_dirty: bool,

    /// 面向用户的错误消息
    pub error: Option<String>,

    /// 保存请求是否在途
    pub is_saving: bool,

    /// 会话票据，用于识别过期的远程结果
    pub ticket: u64,
}

impl EditSession {
    /// 编辑已有画像
    pub fn for_existing(profile: &Profile, ticket: u64) -> Self {
        Self {
            draft: profile.clone(),
            is_new: false,
            is_dirty: false,
            error: None,
            is_saving: false,
            ticket,
        }
    }

    /// 新建画像，草稿使用新生成的 ID
    pub fn for_new(ticket: u64) -> Self {
        Self {
            draft: Profile::blank(),
            is_new: true,
            is_dirty: false,
            error: None,
            is_saving: false,
            ticket,
        }
    }

    /// 保存按钮是否可用
    ///
    /// 新建时始终可用；编辑已有画像时需至少修改过一个字段。
    pub fn can_save(&self) -> bool {
        !self.is_saving && (self.is_new || self.is_dirty)
    }
}

/// 待确认的删除意图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteIntent {
    /// 目标画像 ID
    pub id: String,

    /// 目标画像名称（用于确认提示）
    pub name: String,

    /// 删除请求是否在途
    pub is_deleting: bool,

    /// 意图票据
    pub ticket: u64,
}

impl DeleteIntent {
    /// 记录删除意图
    pub fn new(id: impl Into<String>, name: impl Into<String>, ticket: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_deleting: false,
            ticket,
        }
    }

    /// 确认提示文本
    pub fn prompt(&self) -> String {
        format!("Are you sure you want to delete {}?", self.name)
    }
}
