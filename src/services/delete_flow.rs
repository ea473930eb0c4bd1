//! Delete Confirmation Flow
//!
//! Two-step commit: a request only records intent, the network call happens
//! on confirmation.

use crate::models::session::DeleteIntent;

/// Message shown when a confirmed delete fails remotely
pub const DELETE_ERROR_MESSAGE: &str = "Error deleting profile";

/// Delete request ready to go to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub ticket: u64,
    pub id: String,
}

/// Outcome of a confirmation attempt before the network call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedDelete {
    /// No pending intent
    NoIntent,
    /// The confirmed delete is already in flight
    InFlight,
    Ready(DeleteRequest),
}

#[derive(Debug, Clone, Default)]
pub struct DeleteFlow {
    intent: Option<DeleteIntent>,
    next_ticket: u64,
}

impl DeleteFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intent(&self) -> Option<&DeleteIntent> {
        self.intent.as_ref()
    }

    /// Record a pending deletion; no side effects
    pub fn request(&mut self, id: impl Into<String>, name: impl Into<String>) -> &DeleteIntent {
        self.next_ticket += 1;
        let intent = self
            .intent
            .insert(DeleteIntent::new(id, name, self.next_ticket));
        tracing::debug!("Delete requested for profile {}", intent.id);
        intent
    }

    /// Mark the pending intent as in flight and hand back the request
    pub fn confirm(&mut self) -> PreparedDelete {
        let Some(intent) = self.intent.as_mut() else {
            return PreparedDelete::NoIntent;
        };
        if intent.is_deleting {
            return PreparedDelete::InFlight;
        }

        intent.is_deleting = true;
        PreparedDelete::Ready(DeleteRequest {
            ticket: intent.ticket,
            id: intent.id.clone(),
        })
    }

    /// Clear the pending intent. Safe to call with no intent.
    pub fn cancel(&mut self) {
        if self.intent.take().is_some() {
            tracing::debug!("Delete cancelled");
        }
    }

    /// Record the remote outcome for `ticket`.
    ///
    /// Success clears the intent; failure keeps it so the user can retry or
    /// cancel. Returns `false` when the intent was replaced or cleared meanwhile.
    pub fn finish(&mut self, ticket: u64, succeeded: bool) -> bool {
        if !self.intent.as_ref().is_some_and(|intent| intent.ticket == ticket) {
            return false;
        }

        if succeeded {
            self.intent = None;
        } else if let Some(intent) = self.intent.as_mut() {
            intent.is_deleting = false;
        }
        true
    }
}
