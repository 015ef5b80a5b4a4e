//! Handler für Suchtext und Sichtbarkeit unverbundener Zeilen.

use crate::app::scheduler::ReconcileReason;
use crate::app::AppState;
use crate::core::TableSide;

/// Setzt den Suchtext einer Tabelle.
pub fn set_search(state: &mut AppState, side: TableSide, text: &str) {
    if state.filter.set_search(side, text) {
        log::debug!("Suche {:?}: '{}'", side, text);
        state.scheduler.schedule(ReconcileReason::Filter);
    }
}

/// Blendet unverbundene Zeilen ein oder aus.
pub fn set_show_unmapped(state: &mut AppState, show: bool) {
    if state.filter.set_show_unmapped(show) {
        state.scheduler.schedule(ReconcileReason::Filter);
    }
}
