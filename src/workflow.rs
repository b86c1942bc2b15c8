use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use crate::error::SnapshotError;
use crate::manager::SnapshotManager;
use crate::snapshot::{Snapshot, SnapshotDraft};

/// Answer to a confirmation prompt. Anything but [`Confirmation::Yes`]
/// aborts the pending operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    Cancel,
}

/// Asks the user to confirm a destructive or overwriting action.
///
/// The injectable stand-in for a modal message service: implementations may
/// show a dialog, consult a policy, or answer from a script in tests.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    async fn confirm(&self, message: &str) -> Confirmation;
}

/// Whether a command mutated the store or was declined by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Declined,
}

/// Create/edit/remove/restore command semantics for one scope's manager.
///
/// Mutating commands persist via [`SnapshotManager::save`] after every
/// applied change; declined commands leave both the store and persistence
/// untouched.
pub struct SnapshotWorkflows {
    manager: Arc<SnapshotManager>,
    prompt: Arc<dyn ConfirmationPrompt>,
}

impl SnapshotWorkflows {
    pub fn new(manager: Arc<SnapshotManager>, prompt: Arc<dyn ConfirmationPrompt>) -> Self {
        SnapshotWorkflows { manager, prompt }
    }

    pub fn manager(&self) -> &Arc<SnapshotManager> {
        &self.manager
    }

    /// Create a snapshot from a confirmed draft. A duplicate title never
    /// silently overwrites: the user is asked first, and anything but yes
    /// aborts with no state change.
    pub async fn create(&self, draft: SnapshotDraft) -> Result<CommandOutcome, SnapshotError> {
        let snapshot = Snapshot::from_draft(draft)?;

        if let Some(existing) = self.manager.find_snapshot(snapshot.title())? {
            let message = format!(
                "Snapshot '{}' already exists. Are you sure you want to overwrite the existing snapshot?",
                existing.title()
            );
            if self.prompt.confirm(&message).await != Confirmation::Yes {
                debug!("overwrite of snapshot '{}' declined", existing.title());
                return Ok(CommandOutcome::Declined);
            }
            self.manager.replace(snapshot)?;
        } else {
            self.manager.add(snapshot)?;
        }

        self.manager.save().await?;
        Ok(CommandOutcome::Applied)
    }

    /// Apply an edited draft to the snapshot currently titled
    /// `original_title`. Renaming onto a title used by a different snapshot
    /// fails validation with [`SnapshotError::DuplicateTitle`]; nothing is
    /// prompted and nothing changes.
    pub async fn edit(
        &self,
        original_title: &str,
        draft: SnapshotDraft,
    ) -> Result<CommandOutcome, SnapshotError> {
        let original =
            self.manager
                .find_snapshot(original_title)?
                .ok_or_else(|| SnapshotError::NotFound {
                    title: original_title.to_string(),
                })?;

        let updated = original.apply_draft(draft)?;
        self.manager.update(original_title, updated)?;
        self.manager.save().await?;
        Ok(CommandOutcome::Applied)
    }

    /// Remove a snapshot after an affirmative confirmation; declining leaves
    /// the store unchanged.
    pub async fn remove(&self, title: &str) -> Result<CommandOutcome, SnapshotError> {
        let snapshot = self
            .manager
            .find_snapshot(title)?
            .ok_or_else(|| SnapshotError::NotFound {
                title: title.to_string(),
            })?;

        let message = format!(
            "Are you sure you want to remove the snapshot '{}'?",
            snapshot.title()
        );
        if self.prompt.confirm(&message).await != Confirmation::Yes {
            debug!("removal of snapshot '{}' declined", snapshot.title());
            return Ok(CommandOutcome::Declined);
        }

        self.manager.remove(title)?;
        self.manager.save().await?;
        Ok(CommandOutcome::Applied)
    }

    /// Fetch a snapshot's payload for the caller to apply to its own state.
    pub async fn restore(&self, title: &str) -> Result<Vec<u8>, SnapshotError> {
        let snapshot = self
            .manager
            .find_snapshot(title)?
            .ok_or_else(|| SnapshotError::NotFound {
                title: title.to_string(),
            })?;

        info!("restoring snapshot '{}'", snapshot.title());
        Ok(snapshot.data().to_vec())
    }
}
