//! 核心数据模型模块
//!
//! 定义画像记录、编辑会话与删除意图。

pub mod profile;
pub mod session;

pub use profile::*;
pub use session::*;
