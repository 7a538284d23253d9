//! Mutex-guarded bridge registry for the per-type global service reference.
//!
//! # Responsibility
//! - Hold the one "current" service instance per aggregate type.
//! - Lazily create a transient-backed instance for callers that arrive
//!   before the durable store is wired up.
//! - Migrate legacy data into the managed instance exactly once, before the
//!   managed reference becomes observable.
//!
//! # Invariants
//! - All state transitions happen under one mutex per registry, so two
//!   concurrent registrations cannot both migrate against the same
//!   disappearing legacy state.
//! - A managed reference is only published after migration has completed.

use crate::model::Aggregate;
use crate::service::ServiceError;
use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard};

/// Lifecycle of one per-type global reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BridgeState {
    Uninitialized,
    /// Transient-backed instance auto-created by the global accessor.
    LegacyActive,
    /// Instance constructed by the owning runtime with the durable store.
    /// Terminal for the process lifetime.
    ManagedActive,
}

/// Service shape the registry can bridge.
///
/// `snapshot` and `admit` are the two halves of migration: read everything
/// from the outgoing instance, insert each aggregate into the incoming one.
pub(crate) trait BridgedService: Send + Sync + Sized + 'static {
    type Aggregate: Aggregate;

    fn with_transient_store() -> Self;

    /// Copies of everything currently stored.
    fn snapshot(&self) -> Result<Vec<Self::Aggregate>, ServiceError>;

    /// Insert-semantics add; returns whether the aggregate was stored.
    fn admit(&self, aggregate: &Self::Aggregate) -> Result<bool, ServiceError>;
}

struct Slot<S> {
    state: BridgeState,
    current: Option<Arc<S>>,
}

/// One mutex-guarded `(state, current)` pair; each aggregate type owns a
/// `static` instance.
pub(crate) struct ServiceRegistry<S> {
    slot: Mutex<Slot<S>>,
}

impl<S: BridgedService> ServiceRegistry<S> {
    pub(crate) const fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                state: BridgeState::Uninitialized,
                current: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<S>> {
        // Slot mutations are tiny moves that cannot leave the slot half
        // written, so a poisoned guard is still safe to reuse.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the current instance, lazily creating and publishing a
    /// transient-backed one when nothing is registered yet.
    pub(crate) fn get_instance(&self) -> Arc<S> {
        let mut slot = self.lock();
        if let Some(current) = &slot.current {
            return Arc::clone(current);
        }

        let legacy = Arc::new(S::with_transient_store());
        slot.current = Some(Arc::clone(&legacy));
        slot.state = BridgeState::LegacyActive;
        info!(
            "event=bridge_legacy_start module=service kind={} status=ok",
            <S::Aggregate as Aggregate>::KIND
        );
        legacy
    }

    /// Publishes a managed instance, first migrating every aggregate out of
    /// a legacy instance if one is active.
    ///
    /// On migration failure the previous reference stays published and the
    /// candidate is dropped, so callers never observe a managed instance
    /// with partial migrated data.
    pub(crate) fn register_managed(&self, candidate: S) -> Result<Arc<S>, ServiceError> {
        let mut slot = self.lock();
        let managed = Arc::new(candidate);

        match (slot.state, slot.current.as_ref()) {
            (BridgeState::LegacyActive, Some(legacy)) => {
                let snapshot = legacy.snapshot()?;
                let outcome = migrate_snapshot(snapshot, managed.as_ref())?;
                info!(
                    "event=bridge_migrate module=service kind={} status=ok migrated={} skipped={}",
                    <S::Aggregate as Aggregate>::KIND,
                    outcome.migrated,
                    outcome.skipped
                );
            }
            (BridgeState::ManagedActive, _) => {
                // Legacy-to-managed data handoff is one-shot; a repeat
                // registration only swaps the reference.
                warn!(
                    "event=bridge_register module=service kind={} status=replaced_managed",
                    <S::Aggregate as Aggregate>::KIND
                );
            }
            _ => {}
        }

        slot.current = Some(Arc::clone(&managed));
        slot.state = BridgeState::ManagedActive;
        info!(
            "event=bridge_register module=service kind={} status=ok",
            <S::Aggregate as Aggregate>::KIND
        );
        Ok(managed)
    }

    pub(crate) fn state(&self) -> BridgeState {
        self.lock().state
    }

    /// Drops the current reference and returns to `Uninitialized`. Test
    /// harness use only; production code never unregisters.
    pub(crate) fn reset(&self) {
        let mut slot = self.lock();
        slot.current = None;
        slot.state = BridgeState::Uninitialized;
    }
}

/// Outcome of one legacy-to-managed migration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct MigrationOutcome {
    pub migrated: usize,
    pub skipped: usize,
}

/// Writes a store snapshot into the target service with insert semantics.
///
/// Pure with respect to the registry: callers pass the snapshot and target
/// explicitly, so migration is testable without touching any global state.
pub(crate) fn migrate_snapshot<S: BridgedService>(
    snapshot: Vec<S::Aggregate>,
    target: &S,
) -> Result<MigrationOutcome, ServiceError> {
    let mut outcome = MigrationOutcome::default();
    for aggregate in &snapshot {
        if target.admit(aggregate)? {
            outcome.migrated += 1;
        } else {
            outcome.skipped += 1;
        }
    }
    Ok(outcome)
}
