//! Navigation state of the assigned clients screen.
//!
//! A single [`PortalState`] value replaces independent "selected client",
//! "selected month", "selected task" and "preview open" flags. A month can
//! only be focused inside a client selection and a preview only inside a
//! focused month.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::assignment::{MonthKey, TaskKind};
use crate::domain::document::DocumentRef;
use crate::domain::types::ClientId;
use crate::index::AssignmentIndex;

/// Session key the state is stored under.
pub const PORTAL_STATE_KEY: &str = "portal_state";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthFocus {
    pub period: MonthKey,
    pub task: Option<TaskKind>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Selection {
    pub client_id: ClientId,
    pub focus: Option<MonthFocus>,
}

impl Selection {
    pub fn client(client_id: ClientId) -> Self {
        Self {
            client_id,
            focus: None,
        }
    }

    pub fn period(&self) -> Option<MonthKey> {
        self.focus.as_ref().map(|focus| focus.period)
    }

    pub fn task(&self) -> Option<&TaskKind> {
        self.focus.as_ref().and_then(|focus| focus.task.as_ref())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PortalState {
    #[default]
    Idle,
    ClientSelected {
        selection: Selection,
    },
    PreviewOpen {
        selection: Selection,
        document: DocumentRef,
    },
}

impl PortalState {
    fn name(&self) -> &'static str {
        match self {
            PortalState::Idle => "idle",
            PortalState::ClientSelected { .. } => "a client is selected",
            PortalState::PreviewOpen { .. } => "a preview is open",
        }
    }

    fn invalid(&self, action: &'static str) -> StateError {
        StateError::InvalidTransition {
            state: self.name(),
            action,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            PortalState::Idle => None,
            PortalState::ClientSelected { selection } | PortalState::PreviewOpen { selection, .. } => {
                Some(selection)
            }
        }
    }

    pub fn preview(&self) -> Option<&DocumentRef> {
        match self {
            PortalState::PreviewOpen { document, .. } => Some(document),
            _ => None,
        }
    }

    fn into_selection(self) -> Option<Selection> {
        match self {
            PortalState::Idle => None,
            PortalState::ClientSelected { selection } | PortalState::PreviewOpen { selection, .. } => {
                Some(selection)
            }
        }
    }

    /// Selecting a client is allowed from every state and drops any focus.
    #[must_use]
    pub fn select_client(self, client_id: ClientId) -> Self {
        PortalState::ClientSelected {
            selection: Selection::client(client_id),
        }
    }

    pub fn select_month(self, period: MonthKey) -> Result<Self, StateError> {
        let error = self.invalid("select a month without a client");
        let mut selection = self.into_selection().ok_or(error)?;
        selection.focus = Some(MonthFocus { period, task: None });
        Ok(PortalState::ClientSelected { selection })
    }

    pub fn select_task(self, task: TaskKind) -> Result<Self, StateError> {
        let error = self.invalid("select a task without a month");
        let mut selection = self.into_selection().ok_or_else(|| error.clone())?;
        let focus = selection.focus.as_mut().ok_or(error)?;
        focus.task = Some(task);
        Ok(PortalState::ClientSelected { selection })
    }

    /// Opens a document of the focused client month.
    pub fn open_preview(self, document: DocumentRef) -> Result<Self, StateError> {
        let error = self.invalid("open a preview without a month");
        match self.into_selection() {
            Some(selection) if selection.focus.is_some() => {
                Ok(PortalState::PreviewOpen { selection, document })
            }
            _ => Err(error),
        }
    }

    pub fn close_preview(self) -> Result<Self, StateError> {
        match self {
            PortalState::PreviewOpen { selection, .. } => {
                Ok(PortalState::ClientSelected { selection })
            }
            other => Err(other.invalid("close a preview")),
        }
    }

    #[must_use]
    pub fn clear(self) -> Self {
        PortalState::Idle
    }

    /// Drops parts of the selection that the latest index no longer contains.
    #[must_use]
    pub fn reconcile(self, index: &AssignmentIndex) -> Self {
        let Some(selection) = self.selection() else {
            return self;
        };

        if index.client(&selection.client_id).is_none() {
            log::info!(
                "Selected client {} is no longer assigned; clearing selection",
                selection.client_id
            );
            return PortalState::Idle;
        }

        match selection.period() {
            Some(period) if !index.has_month(&selection.client_id, period) => {
                let client_id = selection.client_id.clone();
                self.select_client(client_id)
            }
            _ => self,
        }
    }
}
