//! Mapper-View Library.
//! Layout- und Verbindungs-Engine für Signal-Netzwerke, als Library exportiert
//! für Hosts, Tests und Benchmarks.

pub mod app;
pub mod core;
pub mod shared;

pub use app::{
    AppCommand, AppController, AppIntent, AppState, ChromeCall, ListFocus, ModelRequest,
    OutboxBatch, PointerEvent, PointerKind, ViewMode,
};
pub use core::{
    ChangeKind, Device, EdgeId, EntityId, Frame, Link, Map, MapStatus, ModelEntity, ModelEvent,
    NetworkModel, Signal, SignalDirection, TableSide,
};
pub use core::{AnchorIndex, AnchorMatch};
pub use shared::{DrawCall, PathAttributes, PathId, PathSpec, ViewOptions};
