//! 服务模块

pub mod delete_flow;
pub mod desk;
pub mod edit_session;
pub mod profile_list;

pub use delete_flow::{DeleteFlow, DeleteRequest, PreparedDelete};
pub use desk::{
    DeleteOutcome, DeskIntent, DeskObserver, DeskSnapshot, DispatchOutcome, ListStatus,
    LoadOutcome, Navigator, NoopNavigator, ProfileDesk, SaveOutcome, TracingObserver,
};
pub use edit_session::{EditSessionController, EditState, FieldChange, PreparedSave, SaveRequest};
pub use profile_list::{ListEffect, ListState, ProfileListController};
