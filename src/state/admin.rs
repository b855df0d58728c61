//! Admin session gate.
//!
//! ARCHITECTURE
//! ============
//! The gate is the only owner of the tab's admin belief. Its persisted flag
//! (`msp_admin_mode = "true"`) is a cache of backend truth, never the truth
//! itself: on load a set flag puts the gate in `Verifying` until the backend
//! confirms, and any denial or failure demotes it to `Locked` and erases the
//! flag.
//!
//! ```text
//! Locked --submit--> Unlocking --granted--> Unlocked
//!                              --denied/error--> Locked
//! Unlocked --lock--> Locked
//! (load, flag set) Verifying --admin--> Unlocked
//!                            --not admin/error--> Locked
//! ```
//!
//! TRADE-OFFS
//! ==========
//! Only one unlock may be in flight. A second `submit` while `Unlocking` is
//! rejected instead of queued so two answers can never race on the flag.
//! The state mutex is never held across an `.await`; answers that arrive
//! after an explicit `lock()` are discarded. Every lock and every new attempt
//! advances an epoch, so a stale answer cannot land on a later attempt that
//! happens to be `Unlocking` too.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use std::sync::{Arc, Mutex};

use crate::error::{BackendError, ErrorCode, ValidationError};
use crate::net::backend::VisitorBackend;
use crate::state::session::SessionCache;

/// Session storage key of the persisted admin flag.
pub const ADMIN_MODE_KEY: &str = "msp_admin_mode";
const ADMIN_MODE_VALUE: &str = "true";

/// Where the gate currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    Locked,
    /// A password is with the backend.
    Unlocking,
    Unlocked,
    /// Startup reconciliation of a persisted flag is in flight.
    Verifying,
}

/// Result of a password submission the backend answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnlockOutcome {
    Granted,
    /// Wrong password. The gate stays locked.
    Denied,
}

/// Result of a password change the backend answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordChange {
    Changed,
    /// The current password did not match.
    Rejected,
}

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("an unlock attempt is already in flight")]
    UnlockInFlight,

    #[error("admin verification is still in progress")]
    VerificationPending,

    #[error("admin session is locked")]
    Locked,

    #[error("unlock attempt was superseded by lock")]
    Superseded,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ErrorCode for GateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::UnlockInFlight => "E_UNLOCK_IN_FLIGHT",
            Self::VerificationPending => "E_VERIFICATION_PENDING",
            Self::Locked => "E_ADMIN_LOCKED",
            Self::Superseded => "E_UNLOCK_SUPERSEDED",
            Self::Backend(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::UnlockInFlight | Self::VerificationPending => true,
            Self::Backend(e) => e.retryable(),
            Self::Validation(_) | Self::Locked | Self::Superseded => false,
        }
    }
}

/// Gate state plus the epoch of the operation that owns it.
///
/// The epoch advances on every `lock()` and every new unlock attempt, so an
/// answer can only land if nothing else touched the gate since it was asked.
#[derive(Clone, Copy, Debug)]
struct Slot {
    state: GateState,
    epoch: u64,
}

/// Holds and persists the admin unlock state for one browser tab.
pub struct AdminGate {
    backend: Arc<dyn VisitorBackend>,
    session: Arc<dyn SessionCache>,
    slot: Mutex<Slot>,
}

impl AdminGate {
    /// Create the gate from whatever the tab's session storage holds.
    ///
    /// A persisted flag starts the gate in [`GateState::Verifying`]; call
    /// [`AdminGate::restore`] to reconcile it with the backend.
    #[must_use]
    pub fn new(backend: Arc<dyn VisitorBackend>, session: Arc<dyn SessionCache>) -> Self {
        let state = if session.get(ADMIN_MODE_KEY).as_deref() == Some(ADMIN_MODE_VALUE) {
            GateState::Verifying
        } else {
            GateState::Locked
        };
        Self { backend, session, slot: Mutex::new(Slot { state, epoch: 0 }) }
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Current gate state.
    #[must_use]
    pub fn state(&self) -> GateState {
        self.guard().state
    }

    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.state() == GateState::Unlocked
    }

    /// Whether the gate has a settled answer (not `Verifying`).
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.state() != GateState::Verifying
    }

    /// Move `expected -> next` if the gate is still at `epoch`.
    ///
    /// Returns `false` if a lock or another attempt happened meanwhile.
    fn transition(&self, expected: GateState, epoch: u64, next: GateState) -> bool {
        let mut slot = self.guard();
        if slot.state != expected || slot.epoch != epoch {
            return false;
        }
        slot.state = next;
        drop(slot);

        match next {
            GateState::Unlocked => self.session.set(ADMIN_MODE_KEY, ADMIN_MODE_VALUE),
            GateState::Locked => self.session.clear(ADMIN_MODE_KEY),
            GateState::Unlocking | GateState::Verifying => {}
        }
        tracing::info!(from = ?expected, to = ?next, epoch, "admin gate transition");
        true
    }

    /// Reconcile a persisted flag with the backend.
    ///
    /// Fails closed: a `false` answer, a transport error, or a timeout all end
    /// in `Locked` with the flag erased. Returns the settled state.
    pub async fn restore(&self) -> GateState {
        let epoch = {
            let slot = self.guard();
            if slot.state != GateState::Verifying {
                return slot.state;
            }
            slot.epoch
        };

        match self.backend.is_caller_admin().await {
            Ok(true) => {
                self.transition(GateState::Verifying, epoch, GateState::Unlocked);
            }
            Ok(false) => {
                tracing::info!("persisted admin flag not confirmed by backend");
                self.transition(GateState::Verifying, epoch, GateState::Locked);
            }
            Err(e) => {
                tracing::warn!(error = %e, code = e.error_code(), "admin verification failed; locking");
                self.transition(GateState::Verifying, epoch, GateState::Locked);
            }
        }
        self.state()
    }

    /// Submit an admin password.
    ///
    /// The password is trimmed and handed to the backend once; it is never
    /// stored. Submitting while already unlocked is a no-op `Granted`.
    ///
    /// # Errors
    ///
    /// - [`GateError::Validation`] if the trimmed password is empty
    /// - [`GateError::UnlockInFlight`] if another submission is pending
    /// - [`GateError::VerificationPending`] while startup reconciliation runs
    /// - [`GateError::Backend`] if the backend call fails; the gate returns to `Locked`
    /// - [`GateError::Superseded`] if `lock()` ran while the answer was pending,
    ///   even if a newer attempt has started since
    pub async fn submit(&self, password: &str) -> Result<UnlockOutcome, GateError> {
        let password = password.trim();
        if password.is_empty() {
            return Err(ValidationError::EmptyPassword.into());
        }

        let epoch = {
            let mut slot = self.guard();
            match slot.state {
                GateState::Locked => {
                    slot.state = GateState::Unlocking;
                    slot.epoch = slot.epoch.wrapping_add(1);
                    slot.epoch
                }
                GateState::Unlocking => return Err(GateError::UnlockInFlight),
                GateState::Verifying => return Err(GateError::VerificationPending),
                GateState::Unlocked => return Ok(UnlockOutcome::Granted),
            }
        };
        tracing::debug!(epoch, "admin unlock submitted");

        let answer = self.backend.admin_login(password).await;
        let (next, result) = match answer {
            Ok(true) => (GateState::Unlocked, Ok(UnlockOutcome::Granted)),
            Ok(false) => (GateState::Locked, Ok(UnlockOutcome::Denied)),
            Err(e) => {
                tracing::warn!(error = %e, code = e.error_code(), "admin unlock failed");
                (GateState::Locked, Err(GateError::Backend(e)))
            }
        };

        if !self.transition(GateState::Unlocking, epoch, next) {
            tracing::info!(epoch, "admin unlock answer discarded after lock");
            return Err(GateError::Superseded);
        }
        if matches!(result, Ok(UnlockOutcome::Denied)) {
            tracing::info!("admin unlock denied");
        }
        result
    }

    /// Drop admin privileges for this tab and erase the persisted flag.
    ///
    /// Any unlock or verification answer still in flight is discarded.
    pub fn lock(&self) {
        let previous = {
            let mut slot = self.guard();
            slot.epoch = slot.epoch.wrapping_add(1);
            std::mem::replace(&mut slot.state, GateState::Locked)
        };
        self.session.clear(ADMIN_MODE_KEY);
        tracing::info!(from = ?previous, to = ?GateState::Locked, "admin gate locked");
    }

    /// Change the admin password. Requires an unlocked session.
    ///
    /// All three inputs must be non-blank and `new_password` must equal
    /// `confirm_password`. Current and new passwords are trimmed before
    /// being sent.
    ///
    /// # Errors
    ///
    /// - [`GateError::Locked`] unless the gate is `Unlocked`
    /// - [`GateError::Validation`] on blank or mismatched input
    /// - [`GateError::Backend`] if the backend call fails
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<PasswordChange, GateError> {
        if !self.is_unlocked() {
            return Err(GateError::Locked);
        }
        validate_password_change(current_password, new_password, confirm_password)?;

        let changed = self
            .backend
            .change_admin_password(current_password.trim(), new_password.trim())
            .await?;
        if changed {
            tracing::info!("admin password changed");
            Ok(PasswordChange::Changed)
        } else {
            tracing::info!("admin password change rejected");
            Ok(PasswordChange::Rejected)
        }
    }
}

fn validate_password_change(current: &str, new: &str, confirm: &str) -> Result<(), ValidationError> {
    if current.trim().is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    if new != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    if new.trim().is_empty() {
        return Err(ValidationError::EmptyNewPassword);
    }
    Ok(())
}
