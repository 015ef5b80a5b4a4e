//! Änderungsereignisse aus dem Netzwerk-Modell.

use serde::{Deserialize, Serialize};

use super::{Device, EdgeId, EntityId, Link, Map, Signal};

/// Art der geänderten Entität.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Device,
    Signal,
    Link,
    Map,
}

/// Art der Änderung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Neu oder aktualisiert
    Added,
    /// Wird gerade entfernt (Pfade sofort abbauen)
    Removing,
    /// Entfernt
    Removed,
}

/// Nutzlast eines Änderungsereignisses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelEntity {
    Device(Device),
    Signal(Signal),
    Link(Link),
    Map(Map),
}

impl ModelEntity {
    /// Art der Entität
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Device(_) => EntityKind::Device,
            Self::Signal(_) => EntityKind::Signal,
            Self::Link(_) => EntityKind::Link,
            Self::Map(_) => EntityKind::Map,
        }
    }

    /// Kanten-ID, falls die Entität eine Kante ist.
    pub fn edge_id(&self) -> Option<&EdgeId> {
        match self {
            Self::Link(link) => Some(&link.id),
            Self::Map(map) => Some(&map.id),
            _ => None,
        }
    }

    /// Entitäts-ID, falls die Entität ein Device oder Signal ist.
    pub fn entity_id(&self) -> Option<&EntityId> {
        match self {
            Self::Device(dev) => Some(&dev.id),
            Self::Signal(sig) => Some(&sig.id),
            _ => None,
        }
    }
}

/// Ein einzelnes Änderungsereignis `(kind, change, entity)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEvent {
    /// Art der Änderung
    pub change: ChangeKind,
    /// Betroffene Entität
    pub entity: ModelEntity,
}

impl ModelEvent {
    /// Ereignis für eine neue oder aktualisierte Entität.
    pub fn added(entity: ModelEntity) -> Self {
        Self {
            change: ChangeKind::Added,
            entity,
        }
    }

    /// Ereignis für eine entfernte Entität.
    pub fn removed(entity: ModelEntity) -> Self {
        Self {
            change: ChangeKind::Removed,
            entity,
        }
    }

    /// Ereignis für eine Entität im Abbau.
    pub fn removing(entity: ModelEntity) -> Self {
        Self {
            change: ChangeKind::Removing,
            entity,
        }
    }

    /// Art der Entität
    pub fn kind(&self) -> EntityKind {
        self.entity.kind()
    }
}
