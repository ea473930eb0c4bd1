//! 存储层模块
//!
//! 远程画像集合的访问接口，支持 REST 后端与进程内后端。

pub mod factory;
pub mod http;
pub mod memory;
pub mod repository;

pub use factory::create_profile_store;
pub use http::HttpProfileStore;
pub use memory::InMemoryProfileStore;
pub use repository::{ProfileStore, StoreResult};
