//! Application-Layer: Controller, State, Events, Layout und Interaktion.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod filter;
pub mod handlers;
pub mod interaction;
mod intent_mapping;
pub mod layout;
pub mod outbox;
pub mod render_pass;
pub mod scheduler;
/// Application State
///
/// Dieses Modul verwaltet den Zustand der Engine (Modell-Snapshot, Ansicht, Selektion).
pub mod state;
pub mod tables;
pub mod view_mode;

pub use command_log::CommandLog;
pub use controller::AppController;
pub use events::{AppCommand, AppIntent};
pub use interaction::{CompatibilityOracle, ExistingMapsOracle, PointerEvent, PointerKind};
pub use outbox::{ChromeCall, ModelRequest, Outbox, OutboxBatch};
pub use render_pass::PassTiming;
pub use state::{AppState, PassReport, Selectable, SelectionModel, ViewState};
pub use tables::{ListFocus, TableRow};
pub use view_mode::{ViewMode, ViewModeController};
