//! Profile Desk - 画像列表管理客户端
//!
//! 维护与远程画像集合保持一致的内存列表，管理编辑会话与删除确认，
//! 所有本地变更都在远程写入确认之后才生效。

pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
pub mod validation;
