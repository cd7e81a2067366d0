//! View model for the user list.
//!
//! Holds the rendered state (users, error line, loading flag) in a watch
//! channel so front ends can re-render on change. Mutations are optimistic:
//! the list changes before the request is sent and is put back if the
//! request fails or the view is torn down first.

use std::sync::atomic::{AtomicI64, Ordering};

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::abort::{AbortController, AbortSignal};
use crate::api::UserApi;
use crate::error::{Result, UsersError};
use crate::types::{User, UserId};
use crate::validation::UserForm;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewState {
    pub users: Vec<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub loading: bool,
}

pub struct UserList<A> {
    api: A,
    state: watch::Sender<ViewState>,
    abort: AbortController,
    signal: AbortSignal,
    next_local_id: AtomicI64,
}

impl<A: UserApi> UserList<A> {
    pub fn new(api: A) -> Self {
        let abort = AbortController::new();
        let signal = abort.signal();
        Self {
            api,
            state: watch::Sender::new(ViewState::default()),
            abort,
            signal,
            next_local_id: AtomicI64::new(-1),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.state.borrow().users.clone()
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn is_mounted(&self) -> bool {
        !self.abort.is_aborted()
    }

    /// Handle for tearing the view down from elsewhere, e.g. a signal handler.
    pub fn abort_controller(&self) -> AbortController {
        self.abort.clone()
    }

    /// Cancel every request still in flight.
    pub fn teardown(&self) {
        if self.is_mounted() {
            debug!("tearing down user list");
        }
        self.abort.abort();
    }

    fn report(&self, err: &UsersError) {
        if err.is_cancelled() {
            return;
        }
        debug!(error = %err, "user list request failed");
        let message = err.to_string();
        self.state.send_modify(|s| s.error = Some(message));
    }

    fn ensure_mounted(&self) -> Result<()> {
        if self.is_mounted() {
            Ok(())
        } else {
            Err(UsersError::Cancelled)
        }
    }

    /// Fetch the list. A cancelled fetch leaves no error behind.
    pub async fn load(&self) -> Result<()> {
        self.ensure_mounted()?;
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = self.api.list(&self.signal).await;
        self.state.send_modify(|s| s.loading = false);

        match result {
            Ok(users) => {
                self.state.send_modify(|s| s.users = users);
                Ok(())
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Remove the row now, confirm with the server, put it back on failure.
    pub async fn delete(&self, id: UserId) -> Result<()> {
        self.ensure_mounted()?;

        let (index, removed) = {
            let state = self.state.borrow();
            let index = state
                .users
                .iter()
                .position(|u| u.id == id)
                .ok_or(UsersError::UserNotFound(id))?;
            (index, state.users[index].clone())
        };
        if removed.is_pending() {
            return Err(UsersError::Pending(id));
        }

        self.state.send_modify(|s| {
            s.error = None;
            s.users.retain(|u| u.id != id);
        });

        match self.api.delete(id, &self.signal).await {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!(id, "restoring deleted user");
                self.state.send_modify(|s| {
                    let at = index.min(s.users.len());
                    s.users.insert(at, removed);
                });
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Validate, show a pending row at the top, swap in the saved record.
    pub async fn create(&self, form: &UserForm) -> Result<User> {
        self.ensure_mounted()?;
        let new_user = form.validate().map_err(UsersError::Invalid)?;

        let local_id = self.next_local_id.fetch_sub(1, Ordering::Relaxed);
        let placeholder = User::local(local_id, &new_user);
        self.state.send_modify(|s| {
            s.error = None;
            s.users.insert(0, placeholder);
        });

        let result = match self.api.create(&new_user, &self.signal).await {
            Ok(saved) => self.confirm(local_id, saved),
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            debug!(local_id, "rolling back created user");
            self.state.send_modify(|s| s.users.retain(|u| u.id != local_id));
            self.report(err);
        }
        result
    }

    fn confirm(&self, local_id: UserId, saved: User) -> Result<User> {
        let mut outcome = Ok(());
        self.state.send_modify(|s| {
            if s.users.iter().any(|u| u.id == saved.id) {
                outcome = Err(UsersError::DuplicateId(saved.id));
            } else if let Some(row) = s.users.iter_mut().find(|u| u.id == local_id) {
                *row = saved.clone();
            }
        });
        outcome.map(|()| saved)
    }
}

impl<A> Drop for UserList<A> {
    fn drop(&mut self) {
        self.abort.abort();
    }
}
