//! Signal-Datenstruktur: Ein- oder Ausgang eines Devices.

use serde::{Deserialize, Serialize};

use super::EntityId;

/// Flussrichtung eines Signals aus Sicht seines Devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    /// Eingang (Ziel von Maps)
    Input,
    /// Ausgang (Quelle von Maps)
    Output,
}

impl SignalDirection {
    /// Gegenrichtung
    pub fn opposite(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

/// Ein Signal eines Devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Eindeutige ID (`"device/name"`)
    pub id: EntityId,
    /// Besitzendes Device
    pub device: EntityId,
    /// Signalname ohne Device-Präfix
    pub name: String,
    /// Ein- oder Ausgang
    pub direction: SignalDirection,
    /// Typ-Kürzel (z.B. `f`, `i`)
    #[serde(default = "default_signal_type")]
    pub signal_type: String,
    /// Vektorlänge
    #[serde(default = "default_length")]
    pub length: u32,
    /// Einheit (leer wenn keine)
    #[serde(default)]
    pub unit: String,
    /// Minimalwert falls bekannt
    #[serde(default)]
    pub min: Option<f64>,
    /// Maximalwert falls bekannt
    #[serde(default)]
    pub max: Option<f64>,
    /// Vom Host ausgeblendet
    #[serde(default)]
    pub hidden: bool,
}

fn default_signal_type() -> String {
    "f".to_string()
}

fn default_length() -> u32 {
    1
}

impl Signal {
    /// Erstellt ein Signal mit Standard-Metadaten.
    pub fn new(device: &EntityId, name: &str, direction: SignalDirection) -> Self {
        Self {
            id: EntityId::signal(device.as_str(), name),
            device: device.clone(),
            name: name.to_string(),
            direction,
            signal_type: default_signal_type(),
            length: default_length(),
            unit: String::new(),
            min: None,
            max: None,
            hidden: false,
        }
    }

    /// Setzt Einheit und Wertebereich (Builder).
    pub fn with_range(mut self, unit: &str, min: f64, max: f64) -> Self {
        self.unit = unit.to_string();
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Zellen einer Tabellenzeile in der Reihenfolge
    /// `name, type, length, units, min, max`.
    pub fn cells(&self) -> Vec<String> {
        let fmt_bound = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
        vec![
            self.id.to_string(),
            self.signal_type.clone(),
            self.length.to_string(),
            self.unit.clone(),
            fmt_bound(self.min),
            fmt_bound(self.max),
        ]
    }

    /// Gibt `true` zurück, wenn das Signal ein Ausgang ist.
    pub fn is_output(&self) -> bool {
        self.direction == SignalDirection::Output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_follow_header_order() {
        let dev = EntityId::new("synth");
        let sig = Signal::new(&dev, "freq", SignalDirection::Input).with_range("Hz", 20.0, 2000.0);
        assert_eq!(
            sig.cells(),
            vec!["synth/freq", "f", "1", "Hz", "20", "2000"]
        );
    }

    #[test]
    fn missing_bounds_render_empty() {
        let sig = Signal::new(&EntityId::new("a"), "x", SignalDirection::Output);
        assert_eq!(sig.cells()[4], "");
        assert_eq!(sig.cells()[5], "");
        assert!(sig.is_output());
    }
}
