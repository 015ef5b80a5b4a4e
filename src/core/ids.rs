//! Stabile Identitäten für Devices, Signale und Kanten.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trennzeichen zwischen Device- und Signalname (`"device/signal"`).
pub const SIGNAL_SEPARATOR: char = '/';

/// Identität eines Devices (`"synth"`) oder Signals (`"synth/freq"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Erstellt eine ID aus einem beliebigen Schlüssel.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Erstellt die ID eines Signals aus Device- und Signalnamen.
    pub fn signal(device: &str, name: &str) -> Self {
        Self(format!("{device}{SIGNAL_SEPARATOR}{name}"))
    }

    /// Roher Schlüssel
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name des Devices, zu dem die Entität gehört.
    pub fn device_name(&self) -> &str {
        self.0
            .split_once(SIGNAL_SEPARATOR)
            .map_or(self.0.as_str(), |(device, _)| device)
    }

    /// ID des besitzenden Devices (bei Devices die eigene ID).
    pub fn device_id(&self) -> EntityId {
        Self(self.device_name().to_string())
    }

    /// Gibt `true` zurück, wenn die ID ein Signal bezeichnet.
    pub fn is_signal(&self) -> bool {
        self.0.contains(SIGNAL_SEPARATOR)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identität einer Kante (Map oder Link).
///
/// Der Schlüssel setzt sich aus Quellen und Ziel zusammen, damit
/// dieselbe logische Verbindung über Modell-Resets hinweg dieselbe ID behält.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Erstellt eine Kanten-ID aus einem beliebigen Schlüssel.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Kanten-ID einer Map mit einer oder mehreren Quellen.
    pub fn map(srcs: &[EntityId], dst: &EntityId) -> Self {
        let sources = srcs
            .iter()
            .map(EntityId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        Self(format!("{sources}->{dst}"))
    }

    /// Kanten-ID eines Device-Links.
    pub fn link(src: &EntityId, dst: &EntityId) -> Self {
        Self(format!("{src}->{dst}"))
    }

    /// Roher Schlüssel
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_id_knows_its_device() {
        let id = EntityId::signal("synth", "freq");
        assert_eq!(id.as_str(), "synth/freq");
        assert_eq!(id.device_name(), "synth");
        assert_eq!(id.device_id(), EntityId::new("synth"));
        assert!(id.is_signal());
        assert!(!EntityId::new("synth").is_signal());
    }

    #[test]
    fn map_id_joins_all_sources() {
        let id = EdgeId::map(
            &[EntityId::signal("a", "x"), EntityId::signal("b", "y")],
            &EntityId::signal("c", "z"),
        );
        assert_eq!(id.as_str(), "a/x,b/y->c/z");
    }
}
