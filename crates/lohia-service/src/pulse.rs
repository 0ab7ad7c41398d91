//! Pulse ingest: the high-frequency device-to-database path.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use lohia_core::events::{DomainEvent, MachineEvent};
use lohia_core::traits::ChangeNotifier;
use lohia_core::{AppError, AppResult};
use lohia_entity::{MonitorStore, PulseLog};

use crate::common;
use crate::locks::MachineLocks;
use crate::outcome::PulseOutcome;

/// Display precision for meter figures.
const METERS_DISPLAY_SCALE: u32 = 2;

/// Ingests pulse bursts reported by machine sensor units.
///
/// Each burst updates the machine's accumulator, appends an audit log row,
/// and syncs the active shift's running totals, all as one atomic store
/// commit. A burst is never half-applied and never double-applied.
pub struct PulseIngest {
    store: Arc<dyn MonitorStore>,
    locks: Arc<MachineLocks>,
    notifier: Arc<dyn ChangeNotifier>,
}

impl PulseIngest {
    /// Create a new pulse ingest service.
    pub fn new(
        store: Arc<dyn MonitorStore>,
        locks: Arc<MachineLocks>,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> Self {
        Self {
            store,
            locks,
            notifier,
        }
    }

    /// Record one pulse burst from a device.
    ///
    /// Rejections (unknown device, no operator, bad delta) return
    /// immediately; a store failure gets one automatic retry with fresh
    /// state before the error propagates, so the device's simple resend
    /// logic rarely has to kick in.
    pub async fn ingest(&self, device_id: &str, delta: i64) -> AppResult<PulseOutcome> {
        if delta <= 0 {
            return Err(AppError::validation("pulse delta must be positive"));
        }
        let found = common::machine_for_device(self.store.as_ref(), device_id).await?;
        let _guard = self.locks.acquire(found.id).await;

        match self.apply(found.id, delta).await {
            Ok(outcome) => Ok(outcome),
            Err(error) if !error.is_rejection() => {
                warn!(
                    machine_id = %found.id,
                    delta,
                    %error,
                    "pulse commit failed, retrying once"
                );
                self.apply(found.id, delta).await
            }
            Err(error) => Err(error),
        }
    }

    /// One attempt: fresh machine state, accrue, commit.
    async fn apply(&self, machine_id: Uuid, delta: i64) -> AppResult<PulseOutcome> {
        let mut machine = common::machine_for_id(self.store.as_ref(), machine_id).await?;
        machine.record_pulses(delta)?;

        let mut shift = self
            .store
            .active_shift(machine.id)
            .await?
            .ok_or_else(|| {
                AppError::internal(format!(
                    "machine {} is working but has no active shift",
                    machine.id
                ))
            })?;

        let total_pulses = machine.current_pulse_count;
        let total_meters = machine.current_distance();
        shift.sync_totals(total_pulses, total_meters);
        let log = PulseLog::record(machine.id, shift.id, delta, total_pulses, total_meters);
        self.store.record_pulse(&machine, &shift, &log).await?;

        debug!(
            machine_id = %machine.id,
            shift_id = %shift.id,
            delta,
            total_pulses,
            "pulse burst recorded"
        );
        self.notifier
            .machine_changed(DomainEvent::new(
                machine.current_operator_id,
                MachineEvent::PulseRecorded {
                    machine_id: machine.id,
                    shift_id: shift.id,
                    delta,
                    total_pulses,
                    total_meters,
                },
            ))
            .await;

        Ok(PulseOutcome {
            machine_id: machine.id,
            shift_id: shift.id,
            total_pulses,
            total_meters: total_meters.round_dp(METERS_DISPLAY_SCALE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_display_rounding_scale() {
        let meters = Decimal::new(5_749_999, 5);
        assert_eq!(
            meters.round_dp(METERS_DISPLAY_SCALE),
            Decimal::new(5750, 2)
        );
    }
}
