//! Edit Session Controller
//!
//! Lifecycle of a single in-progress edit: open, field edits with dirty
//! tracking, validation-gated save, cancel.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::profile::{FieldValue, Profile, ProfileField};
use crate::models::session::EditSession;
use crate::validation::{self, ValidationError};

/// Message shown when the remote write behind a save fails
pub const SAVE_ERROR_MESSAGE: &str = "Error saving profile";

/// Edit surface state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditState {
    Closed,
    Open(EditSession),
}

/// Result of a single field edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldChange {
    /// Draft updated and marked dirty
    Applied,
    /// Input rejected silently; the previous value is kept
    Rejected,
    /// Nothing to edit (closed session, save in flight or read-only field)
    Ignored,
}

/// Validated request ready to go to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub ticket: u64,
    pub draft: Profile,
    pub is_new: bool,
}

/// Outcome of the local half of a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedSave {
    /// No open session, or the save button is disabled
    Disabled,
    /// A save for this session is already in flight
    InFlight,
    /// Local validation failed; the error is stored on the session
    Rejected(ValidationError),
    Ready(SaveRequest),
}

/// Edit session state machine
#[derive(Debug, Clone)]
pub struct EditSessionController {
    state: EditState,
    next_ticket: u64,
}

impl Default for EditSessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSessionController {
    pub fn new() -> Self {
        Self {
            state: EditState::Closed,
            next_ticket: 1,
        }
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn session(&self) -> Option<&EditSession> {
        match &self.state {
            EditState::Open(session) => Some(session),
            EditState::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, EditState::Open(_))
    }

    /// Whether the save control is enabled
    pub fn can_save(&self) -> bool {
        self.session().is_some_and(EditSession::can_save)
    }

    /// Open the editor on a copy of `existing`, or on a blank draft with a
    /// freshly generated id. Replaces any session already open.
    pub fn open(&mut self, existing: Option<&Profile>) -> EditSession {
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        let session = match existing {
            Some(profile) => {
                tracing::debug!("Opening editor for profile {}", profile.id);
                EditSession::for_existing(profile, ticket)
            }
            None => {
                let session = EditSession::for_new(ticket);
                tracing::debug!("Opening editor for new profile {}", session.draft.id);
                session
            }
        };

        self.state = EditState::Open(session.clone());
        session
    }

    /// Apply one field edit to the draft
    pub fn set_field(&mut self, field: ProfileField, value: FieldValue) -> FieldChange {
        let EditState::Open(session) = &mut self.state else {
            return FieldChange::Ignored;
        };
        if session.is_saving {
            tracing::debug!("Ignoring {} edit while profile {} is saving", field, session.draft.id);
            return FieldChange::Ignored;
        }

        match field {
            ProfileField::Name => session.draft.name = value.as_text(),
            ProfileField::Email => {
                if !session.is_new {
                    tracing::debug!("Email of profile {} is read-only", session.draft.id);
                    return FieldChange::Ignored;
                }
                session.draft.email = value.as_text();
            }
            ProfileField::Age => match parse_age(&value) {
                AgeInput::Set(age) => session.draft.age = Some(age),
                AgeInput::Clear => session.draft.age = None,
                AgeInput::Rejected => return FieldChange::Rejected,
            },
        }

        session.is_dirty = true;
        session.error = None;
        FieldChange::Applied
    }

    /// Discard the draft. Safe to call when already closed.
    pub fn cancel(&mut self) {
        if let EditState::Open(session) = &self.state {
            tracing::debug!("Editor for profile {} cancelled", session.draft.id);
        }
        self.state = EditState::Closed;
    }

    /// Validate the draft against `collection` and, on success, mark the
    /// session as saving and hand back the request to send.
    pub fn prepare_save(&mut self, collection: &[Profile]) -> PreparedSave {
        let EditState::Open(session) = &mut self.state else {
            return PreparedSave::Disabled;
        };
        if session.is_saving {
            return PreparedSave::InFlight;
        }
        if !session.can_save() {
            return PreparedSave::Disabled;
        }

        if let Err(err) = validation::validate_draft(&session.draft, session.is_new, collection) {
            tracing::info!("Save of profile {} rejected: {}", session.draft.id, err);
            session.error = Some(err.to_string());
            return PreparedSave::Rejected(err);
        }

        session.error = None;
        session.is_saving = true;
        PreparedSave::Ready(SaveRequest {
            ticket: session.ticket,
            draft: session.draft.clone(),
            is_new: session.is_new,
        })
    }

    /// Record the remote outcome of a save.
    ///
    /// Returns `false` when the session that issued `ticket` is gone; the
    /// outcome is then discarded.
    pub fn finish_save(&mut self, ticket: u64, outcome: Result<(), &StoreError>) -> bool {
        let EditState::Open(session) = &mut self.state else {
            return false;
        };
        if session.ticket != ticket {
            return false;
        }

        match outcome {
            Ok(()) => self.state = EditState::Closed,
            Err(_) => {
                session.is_saving = false;
                session.error = Some(SAVE_ERROR_MESSAGE.to_string());
            }
        }
        true
    }
}

enum AgeInput {
    Set(u8),
    Clear,
    Rejected,
}

fn parse_age(value: &FieldValue) -> AgeInput {
    let raw = match value {
        FieldValue::Number(number) => *number,
        FieldValue::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return AgeInput::Clear;
            }
            match text.parse::<i64>() {
                Ok(number) => number,
                Err(_) => return AgeInput::Rejected,
            }
        }
    };

    match validation::clamp_age(raw) {
        Some(age) => AgeInput::Set(age),
        None => AgeInput::Rejected,
    }
}
