//! Koaleszierende Planung von Abgleich-Durchläufen.
//!
//! Modell- und Filteränderungen fordern einen Durchlauf an; mehrere
//! Anforderungen vor dem nächsten Tick werden zu genau einem Durchlauf
//! zusammengefasst. Der Host liefert den Tick (`AppIntent::ReconcileTick`).

use crate::core::EntityKind;

/// Grund einer Anforderung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReconcileReason {
    /// Änderung im Netzwerk-Modell (animiert)
    Model(EntityKind),
    /// Modell komplett ersetzt (animiert)
    ModelReset,
    /// Filter oder Suchtext geändert
    Filter,
    /// Fokus der Listen-Ansicht gewechselt
    Focus,
}

impl ReconcileReason {
    /// Modelländerungen werden animiert, alles andere springt sofort.
    pub fn is_animated(self) -> bool {
        matches!(self, Self::Model(_) | Self::ModelReset)
    }
}

/// Ein anstehender Durchlauf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPass {
    /// Laufende Nummer der Anforderung, die den Durchlauf eröffnet hat
    pub generation: u64,
    /// Alle seitdem eingegangenen Gründe (ohne Duplikate)
    pub reasons: Vec<ReconcileReason>,
}

impl PendingPass {
    /// Wird der Durchlauf animiert?
    pub fn is_animated(&self) -> bool {
        self.reasons.iter().any(|reason| reason.is_animated())
    }
}

/// Zustand des Planers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SchedulerState {
    #[default]
    Idle,
    Pending(PendingPass),
}

/// Plant Abgleich-Durchläufe und fasst Anforderungen zusammen.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationScheduler {
    state: SchedulerState,
    next_generation: u64,
    passes_run: u64,
    coalesced: u64,
}

impl ReconciliationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fordert einen Durchlauf an.
    ///
    /// Gibt `true` zurück, wenn dadurch ein neuer Durchlauf eröffnet wurde,
    /// `false`, wenn die Anforderung in den anstehenden aufgegangen ist.
    pub fn schedule(&mut self, reason: ReconcileReason) -> bool {
        match &mut self.state {
            SchedulerState::Pending(pending) => {
                if !pending.reasons.contains(&reason) {
                    pending.reasons.push(reason);
                }
                self.coalesced += 1;
                false
            }
            SchedulerState::Idle => {
                self.next_generation += 1;
                self.state = SchedulerState::Pending(PendingPass {
                    generation: self.next_generation,
                    reasons: vec![reason],
                });
                true
            }
        }
    }

    /// Entnimmt den anstehenden Durchlauf (Tick). `None`, wenn nichts ansteht.
    pub fn take(&mut self) -> Option<PendingPass> {
        match std::mem::take(&mut self.state) {
            SchedulerState::Pending(pending) => {
                self.passes_run += 1;
                Some(pending)
            }
            SchedulerState::Idle => None,
        }
    }

    /// Verwirft einen anstehenden Durchlauf (z.B. wenn sofort gezeichnet wurde).
    pub fn cancel(&mut self) {
        self.state = SchedulerState::Idle;
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, SchedulerState::Pending(_))
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    /// Anzahl tatsächlich ausgeführter Durchläufe.
    pub fn passes_run(&self) -> u64 {
        self.passes_run
    }

    /// Anzahl Anforderungen, die in einen anstehenden Durchlauf aufgegangen sind.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bursts_collapse_into_one_pass() {
        let mut scheduler = ReconciliationScheduler::new();
        assert!(scheduler.schedule(ReconcileReason::Model(EntityKind::Map)));
        for _ in 0..9 {
            assert!(!scheduler.schedule(ReconcileReason::Model(EntityKind::Map)));
        }
        let pass = scheduler.take().expect("Durchlauf erwartet");
        assert_eq!(pass.reasons, vec![ReconcileReason::Model(EntityKind::Map)]);
        assert!(scheduler.take().is_none());
        assert_eq!(scheduler.passes_run(), 1);
        assert_eq!(scheduler.coalesced(), 9);
    }

    #[test]
    fn filter_only_pass_is_not_animated() {
        let mut scheduler = ReconciliationScheduler::new();
        scheduler.schedule(ReconcileReason::Filter);
        assert!(!scheduler.take().map_or(true, |p| p.is_animated()));
        scheduler.schedule(ReconcileReason::Filter);
        scheduler.schedule(ReconcileReason::ModelReset);
        assert!(scheduler.take().map_or(false, |p| p.is_animated()));
    }

    #[test]
    fn new_generation_after_take() {
        let mut scheduler = ReconciliationScheduler::new();
        scheduler.schedule(ReconcileReason::Focus);
        let first = scheduler.take().map(|p| p.generation);
        scheduler.schedule(ReconcileReason::Focus);
        let second = scheduler.take().map(|p| p.generation);
        assert_eq!(first, Some(1));
        assert_eq!(second, Some(2));
    }
}
