//! Device-Datenstruktur mit seinen Signalen.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{EntityId, Signal, SignalDirection};

/// Ein Device im Netzwerk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Eindeutige ID (Device-Name)
    pub id: EntityId,
    /// Host-Adresse
    #[serde(default)]
    pub host: String,
    /// Port
    #[serde(default)]
    pub port: u16,
    /// Gemeldete Anzahl Eingänge
    #[serde(default)]
    pub num_inputs: u32,
    /// Gemeldete Anzahl Ausgänge
    #[serde(default)]
    pub num_outputs: u32,
    /// Vom Host ausgeblendet
    #[serde(default)]
    pub hidden: bool,
    /// Signale in Einfügereihenfolge
    #[serde(default)]
    pub signals: IndexMap<EntityId, Signal>,
}

impl Device {
    /// Erstellt ein Device ohne Signale.
    pub fn new(name: &str, host: &str, port: u16) -> Self {
        Self {
            id: EntityId::new(name),
            host: host.to_string(),
            port,
            num_inputs: 0,
            num_outputs: 0,
            hidden: false,
            signals: IndexMap::new(),
        }
    }

    /// Fügt ein Signal hinzu (Builder).
    pub fn with_signal(mut self, name: &str, direction: SignalDirection) -> Self {
        let signal = Signal::new(&self.id, name, direction);
        self.add_signal(signal);
        self
    }

    /// Fügt ein Signal hinzu oder ersetzt es und hält die Zähler konsistent.
    pub fn add_signal(&mut self, signal: Signal) {
        self.signals.insert(signal.id.clone(), signal);
        self.refresh_counts();
    }

    /// Entfernt ein Signal.
    pub fn remove_signal(&mut self, id: &EntityId) -> Option<Signal> {
        let removed = self.signals.shift_remove(id);
        if removed.is_some() {
            self.refresh_counts();
        }
        removed
    }

    /// Signale einer Richtung in Einfügereihenfolge.
    pub fn signals_in(&self, direction: SignalDirection) -> impl Iterator<Item = &Signal> {
        self.signals
            .values()
            .filter(move |sig| sig.direction == direction)
    }

    /// Zellen einer Übersichts-Tabellenzeile: `name, count, host, port`.
    pub fn cells(&self, direction: SignalDirection) -> Vec<String> {
        let count = match direction {
            SignalDirection::Input => self.num_inputs,
            SignalDirection::Output => self.num_outputs,
        };
        vec![
            self.id.to_string(),
            count.to_string(),
            self.host.clone(),
            self.port.to_string(),
        ]
    }

    // Gemeldete Zähler dürfen größer sein als die geladenen Signale
    fn refresh_counts(&mut self) {
        let inputs = self.signals_in(SignalDirection::Input).count() as u32;
        let outputs = self.signals_in(SignalDirection::Output).count() as u32;
        self.num_inputs = self.num_inputs.max(inputs);
        self.num_outputs = self.num_outputs.max(outputs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_signals_updates_counts() {
        let dev = Device::new("synth", "10.0.0.2", 9000)
            .with_signal("freq", SignalDirection::Input)
            .with_signal("gain", SignalDirection::Input)
            .with_signal("env", SignalDirection::Output);
        assert_eq!(dev.num_inputs, 2);
        assert_eq!(dev.num_outputs, 1);
        assert_eq!(
            dev.cells(SignalDirection::Input),
            vec!["synth", "2", "10.0.0.2", "9000"]
        );
    }

    #[test]
    fn signal_order_is_insertion_order() {
        let dev = Device::new("a", "", 0)
            .with_signal("z", SignalDirection::Output)
            .with_signal("b", SignalDirection::Output);
        let names: Vec<_> = dev.signals.values().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["z", "b"]);
    }
}
