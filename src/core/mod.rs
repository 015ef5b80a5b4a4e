//! Core-Domänentypen: Devices, Signale, Kanten, Netzwerk-Modell, Anker, Spatial-Index.

pub mod anchor;
pub mod device;
pub mod edge;
pub mod frame;
pub mod ids;
pub mod model_event;
pub mod network;
pub mod signal;
pub mod spatial;

pub use anchor::{AnchorKey, AnchorMap, AnchorPosition, AnchorSlot};
pub use device::Device;
pub use edge::{Link, Map, MapStatus};
pub use frame::{CanvasRect, ChromeLayout, Frame, TableSide};
pub use ids::{EdgeId, EntityId};
pub use model_event::{ChangeKind, EntityKind, ModelEntity, ModelEvent};
pub use network::NetworkModel;
pub use signal::{Signal, SignalDirection};
pub use spatial::{AnchorIndex, AnchorMatch};
