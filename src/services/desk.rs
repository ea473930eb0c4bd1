//! Profile Desk
//!
//! Single dispatching controller over the list, the edit session and the
//! delete flow. Remote calls run without holding the state lock, so the user
//! can keep issuing intents (e.g. cancel) while a save or delete is in flight.
//! Results are reconciled when they arrive:
//! - a confirmed write always lands in the collection while the list is loaded
//! - session and intent effects apply only if the same session/intent is
//!   still current; otherwise they are discarded

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::StoreError;
use crate::models::profile::{FieldValue, Profile, ProfileField};
use crate::models::session::{DeleteIntent, EditSession};
use crate::services::delete_flow::{DELETE_ERROR_MESSAGE, DeleteFlow, PreparedDelete};
use crate::services::edit_session::{EditSessionController, FieldChange, PreparedSave};
use crate::services::profile_list::{ListEffect, ListState, ProfileListController};
use crate::storage::repository::ProfileStore;
use crate::validation::ValidationError;

/// Hook invoked whenever the collection becomes empty
pub trait Navigator: Send + Sync {
    /// Redirect to the profile-creation surface
    fn show_create_surface(&self);
}

/// Observer notified after every committed state transition
pub trait DeskObserver: Send + Sync {
    fn on_change(&self, snapshot: &DeskSnapshot);
}

/// Navigator that does nothing
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn show_create_surface(&self) {}
}

/// Observer that logs every snapshot at debug level
pub struct TracingObserver;

impl DeskObserver for TracingObserver {
    fn on_change(&self, snapshot: &DeskSnapshot) {
        tracing::debug!(
            status = ?snapshot.status,
            profiles = snapshot.collection.len(),
            modal_open = snapshot.is_modal_open,
            delete_pending = snapshot.delete_intent.is_some(),
            error = ?snapshot.error,
            "desk state changed"
        );
    }
}

/// Coarse list status for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStatus {
    Loading,
    Ready,
    Failed,
}

/// Read-only view of the desk for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskSnapshot {
    pub status: ListStatus,
    pub collection: Vec<Profile>,
    pub is_modal_open: bool,
    pub session: Option<EditSession>,
    pub delete_intent: Option<DeleteIntent>,
    /// List-level message (load or delete failure)
    pub error: Option<String>,
    pub save_enabled: bool,
}

/// Intents accepted by [`ProfileDesk::dispatch`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskIntent {
    Load,
    /// Open the editor on the profile with `id`, or on a blank draft
    OpenEditor { id: Option<String> },
    SetField { field: ProfileField, value: FieldValue },
    CancelEdit,
    Save,
    RequestDelete { id: String, name: String },
    ConfirmDelete,
    CancelDelete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Failed(StoreError),
    /// A newer load was started before this one finished
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No open session, or nothing to save
    Disabled,
    /// The collection is loading or failed to load, so uniqueness cannot be checked
    ListUnavailable,
    /// A save for this session is already in flight
    InFlight,
    Rejected(ValidationError),
    Failed(StoreError),
    /// Confirmed record as returned by the store
    Saved(Profile),
    /// The session was closed or replaced while the request was in flight
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    NoIntent,
    InFlight,
    Deleted(String),
    Failed(StoreError),
    /// The intent was cleared or replaced while the request was in flight
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Load(LoadOutcome),
    Editor(bool),
    Field(FieldChange),
    Save(SaveOutcome),
    Delete(DeleteOutcome),
    Done,
}

#[derive(Default)]
struct DeskState {
    list: ProfileListController,
    editor: EditSessionController,
    deletes: DeleteFlow,
    error: Option<String>,
    load_ticket: u64,
}

/// Profile desk controller
pub struct ProfileDesk {
    store: Arc<dyn ProfileStore>,
    navigator: Arc<dyn Navigator>,
    observers: Vec<Arc<dyn DeskObserver>>,
    state: Mutex<DeskState>,
}

impl ProfileDesk {
    pub fn new(store: Arc<dyn ProfileStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            observers: Vec::new(),
            state: Mutex::new(DeskState::default()),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn DeskObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Immutable snapshot of the current state
    pub fn snapshot(&self) -> DeskSnapshot {
        let state = self.state.lock();
        let status = match state.list.state() {
            ListState::Loading => ListStatus::Loading,
            ListState::Ready(_) => ListStatus::Ready,
            ListState::Failed(_) => ListStatus::Failed,
        };
        DeskSnapshot {
            status,
            collection: state.list.profiles().to_vec(),
            is_modal_open: state.editor.is_open(),
            session: state.editor.session().cloned(),
            delete_intent: state.deletes.intent().cloned(),
            error: state.error.clone(),
            save_enabled: state.editor.can_save(),
        }
    }

    fn notify(&self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &self.observers {
            observer.on_change(&snapshot);
        }
    }

    fn apply_effect(&self, effect: ListEffect) {
        if effect == ListEffect::NoProfiles {
            tracing::info!("No profiles left, redirecting to the creation surface");
            self.navigator.show_create_surface();
        }
    }

    /// Route an intent to the matching operation
    pub async fn dispatch(&self, intent: DeskIntent) -> DispatchOutcome {
        match intent {
            DeskIntent::Load => DispatchOutcome::Load(self.load().await),
            DeskIntent::OpenEditor { id: Some(id) } => {
                DispatchOutcome::Editor(self.open_editor_by_id(&id))
            }
            DeskIntent::OpenEditor { id: None } => {
                self.open_editor(None);
                DispatchOutcome::Editor(true)
            }
            DeskIntent::SetField { field, value } => {
                DispatchOutcome::Field(self.set_field(field, value))
            }
            DeskIntent::CancelEdit => {
                self.cancel_edit();
                DispatchOutcome::Done
            }
            DeskIntent::Save => DispatchOutcome::Save(self.save().await),
            DeskIntent::RequestDelete { id, name } => {
                self.request_delete(id, name);
                DispatchOutcome::Done
            }
            DeskIntent::ConfirmDelete => DispatchOutcome::Delete(self.confirm_delete().await),
            DeskIntent::CancelDelete => {
                self.cancel_delete();
                DispatchOutcome::Done
            }
        }
    }

    /// Fetch the collection. No automatic retry on failure.
    pub async fn load(&self) -> LoadOutcome {
        let ticket = {
            let mut state = self.state.lock();
            state.load_ticket += 1;
            state.list.begin_load();
            state.error = None;
            state.load_ticket
        };
        self.notify();

        tracing::info!("Loading profiles from {} store", self.store.backend_name());
        let result = self.store.list().await;

        let (outcome, effect) = {
            let mut state = self.state.lock();
            if state.load_ticket != ticket {
                tracing::warn!("Discarding superseded profile list response");
                (LoadOutcome::Superseded, ListEffect::None)
            } else {
                match result {
                    Ok(profiles) => {
                        let count = profiles.len();
                        let effect = state.list.finish_load(profiles);
                        (LoadOutcome::Loaded(count), effect)
                    }
                    Err(err) => {
                        tracing::error!("{}: {}", err, err.reason());
                        state.list.fail_load(err.to_string());
                        state.error = Some(err.to_string());
                        (LoadOutcome::Failed(err), ListEffect::None)
                    }
                }
            }
        };

        self.apply_effect(effect);
        self.notify();
        outcome
    }

    /// Re-run the load path on user request
    pub async fn reload(&self) -> LoadOutcome {
        tracing::info!("Reloading profiles");
        self.load().await
    }

    /// Open the editor on a copy of `existing`, or on a blank draft
    pub fn open_editor(&self, existing: Option<&Profile>) -> EditSession {
        let session = self.state.lock().editor.open(existing);
        self.notify();
        session
    }

    /// Open the editor on the collection entry with `id`
    pub fn open_editor_by_id(&self, id: &str) -> bool {
        let opened = {
            let mut state = self.state.lock();
            let DeskState { list, editor, .. } = &mut *state;
            match list.find(id) {
                Some(profile) => {
                    editor.open(Some(profile));
                    true
                }
                None => {
                    tracing::warn!("Cannot edit unknown profile {}", id);
                    false
                }
            }
        };
        if opened {
            self.notify();
        }
        opened
    }

    pub fn set_field(&self, field: ProfileField, value: FieldValue) -> FieldChange {
        let change = self.state.lock().editor.set_field(field, value);
        if change == FieldChange::Applied {
            self.notify();
        }
        change
    }

    pub fn cancel_edit(&self) {
        self.state.lock().editor.cancel();
        self.notify();
    }

    /// Validate the draft and, if it passes, write it to the store
    pub async fn save(&self) -> SaveOutcome {
        let prepared = {
            let mut state = self.state.lock();
            let DeskState { list, editor, .. } = &mut *state;
            if editor.can_save() && !list.is_ready() {
                tracing::warn!("Refusing to save while the profile list is not loaded");
                return SaveOutcome::ListUnavailable;
            }
            editor.prepare_save(list.profiles())
        };

        let request = match prepared {
            PreparedSave::Ready(request) => request,
            PreparedSave::Disabled => return SaveOutcome::Disabled,
            PreparedSave::InFlight => return SaveOutcome::InFlight,
            PreparedSave::Rejected(err) => {
                self.notify();
                return SaveOutcome::Rejected(err);
            }
        };
        self.notify();

        let result = if request.is_new {
            self.store.create(&request.draft).await
        } else {
            self.store.update(&request.draft).await
        };

        let outcome = {
            let mut state = self.state.lock();
            let DeskState { list, editor, .. } = &mut *state;
            match result {
                Ok(confirmed) => {
                    let current = editor.finish_save(request.ticket, Ok(()));
                    if request.is_new {
                        list.apply_create(confirmed.clone());
                    } else {
                        list.apply_update(confirmed.clone());
                    }
                    if current {
                        SaveOutcome::Saved(confirmed)
                    } else {
                        tracing::warn!(
                            "Editor for profile {} closed before its save completed",
                            confirmed.id
                        );
                        SaveOutcome::Superseded
                    }
                }
                Err(err) => {
                    if editor.finish_save(request.ticket, Err(&err)) {
                        SaveOutcome::Failed(err)
                    } else {
                        tracing::warn!(
                            "Discarding failed save of {} for a closed editor",
                            request.draft.id
                        );
                        SaveOutcome::Superseded
                    }
                }
            }
        };

        self.notify();
        outcome
    }

    /// Record a pending deletion; no network call
    pub fn request_delete(&self, id: impl Into<String>, name: impl Into<String>) {
        {
            let mut state = self.state.lock();
            state.deletes.request(id, name);
            state.error = None;
        }
        self.notify();
    }

    /// Delete the pending profile from the store, then from the collection
    pub async fn confirm_delete(&self) -> DeleteOutcome {
        let prepared = self.state.lock().deletes.confirm();
        let request = match prepared {
            PreparedDelete::Ready(request) => request,
            PreparedDelete::NoIntent => return DeleteOutcome::NoIntent,
            PreparedDelete::InFlight => return DeleteOutcome::InFlight,
        };
        self.notify();

        let result = self.store.delete(&request.id).await;

        let (outcome, effect) = {
            let mut state = self.state.lock();
            match result {
                Ok(()) => {
                    let effect = state.list.apply_delete(&request.id);
                    if state.deletes.finish(request.ticket, true) {
                        (DeleteOutcome::Deleted(request.id), effect)
                    } else {
                        tracing::warn!("Delete of {} completed after its intent changed", request.id);
                        (DeleteOutcome::Superseded, effect)
                    }
                }
                Err(err) => {
                    if state.deletes.finish(request.ticket, false) {
                        state.error = Some(DELETE_ERROR_MESSAGE.to_string());
                        (DeleteOutcome::Failed(err), ListEffect::None)
                    } else {
                        tracing::warn!("Discarding failed delete of {}", request.id);
                        (DeleteOutcome::Superseded, ListEffect::None)
                    }
                }
            }
        };

        self.apply_effect(effect);
        self.notify();
        outcome
    }

    pub fn cancel_delete(&self) {
        self.state.lock().deletes.cancel();
        self.notify();
    }
}
