//! Zustand der Engine: Modell-Snapshot, Ansicht, Tabellen, Selektion und Interaktion.

mod app_state;
pub mod selection;
mod view;

pub use app_state::{AppState, SweepState};
pub use selection::{Selectable, SelectionModel, VisibleSet};
pub use view::{DrawnEdge, DrawnNode, PassReport, ViewState};
