//! Das Netzwerk-Modell: Devices, Signale, Maps und Links.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{
    ChangeKind, Device, EdgeId, EntityId, Link, Map, ModelEntity, ModelEvent, Signal,
    SignalDirection,
};

/// Vollständiger Snapshot des beobachteten Netzwerks.
///
/// Alle Collections sind nach Einfügereihenfolge geordnet, damit Tabellen,
/// Speichen und Kanten bei gleichem Modell in gleicher Reihenfolge entstehen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkModel {
    /// Devices inklusive ihrer Signale
    #[serde(default)]
    pub devices: IndexMap<EntityId, Device>,
    /// Signal-Maps
    #[serde(default)]
    pub maps: IndexMap<EdgeId, Map>,
    /// Device-Links
    #[serde(default)]
    pub links: IndexMap<EdgeId, Link>,
}

impl NetworkModel {
    /// Erstellt ein leeres Modell.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fügt ein Device hinzu oder ersetzt es.
    ///
    /// Beim Ersetzen bleiben bereits bekannte Signale erhalten,
    /// wenn das neue Device keine eigenen mitbringt.
    pub fn add_device(&mut self, mut device: Device) {
        if device.signals.is_empty() {
            if let Some(existing) = self.devices.get(&device.id) {
                device.signals = existing.signals.clone();
            }
        }
        self.devices.insert(device.id.clone(), device);
    }

    /// Entfernt ein Device samt Signalen und allen berührenden Kanten.
    pub fn remove_device(&mut self, id: &EntityId) -> Option<Device> {
        let removed = self.devices.shift_remove(id)?;
        self.maps.retain(|_, map| {
            map.dst.device_name() != id.as_str()
                && map.srcs.iter().all(|src| src.device_name() != id.as_str())
        });
        self.links.retain(|_, link| !link.touches(id));
        Some(removed)
    }

    /// Fügt ein Signal seinem Device hinzu. Unbekannte Devices werden angelegt.
    pub fn add_signal(&mut self, signal: Signal) {
        let device_id = signal.device.clone();
        self.devices
            .entry(device_id.clone())
            .or_insert_with(|| Device::new(device_id.as_str(), "", 0))
            .add_signal(signal);
    }

    /// Entfernt ein Signal und alle Maps, die es berühren.
    pub fn remove_signal(&mut self, id: &EntityId) -> Option<Signal> {
        let removed = self.devices.get_mut(&id.device_id())?.remove_signal(id)?;
        self.maps.retain(|_, map| !map.touches(id));
        Some(removed)
    }

    /// Fügt eine Map hinzu oder ersetzt sie.
    pub fn add_map(&mut self, map: Map) {
        self.maps.insert(map.id.clone(), map);
    }

    /// Entfernt eine Map.
    pub fn remove_map(&mut self, id: &EdgeId) -> Option<Map> {
        self.maps.shift_remove(id)
    }

    /// Fügt einen Link hinzu oder ersetzt ihn.
    pub fn add_link(&mut self, link: Link) {
        self.links.insert(link.id.clone(), link);
    }

    /// Entfernt einen Link.
    pub fn remove_link(&mut self, id: &EdgeId) -> Option<Link> {
        self.links.shift_remove(id)
    }

    /// Sucht ein Signal über seine ID.
    pub fn find_signal(&self, id: &EntityId) -> Option<&Signal> {
        self.devices.get(&id.device_id())?.signals.get(id)
    }

    /// Sucht ein Device über seine ID.
    pub fn find_device(&self, id: &EntityId) -> Option<&Device> {
        self.devices.get(id)
    }

    /// Alle Signale in Device- und Einfügereihenfolge.
    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.devices.values().flat_map(|dev| dev.signals.values())
    }

    /// Alle Signale einer Richtung.
    pub fn signals_in(&self, direction: SignalDirection) -> impl Iterator<Item = &Signal> {
        self.signals().filter(move |sig| sig.direction == direction)
    }

    /// Gibt `true` zurück, wenn die Entität (Device oder Signal) ausgeblendet ist.
    ///
    /// Signale gelten auch dann als ausgeblendet, wenn ihr Device es ist.
    pub fn is_hidden(&self, id: &EntityId) -> bool {
        let device_hidden = self
            .devices
            .get(&id.device_id())
            .map_or(true, |dev| dev.hidden);
        if !id.is_signal() {
            return device_hidden;
        }
        device_hidden || self.find_signal(id).map_or(true, |sig| sig.hidden)
    }

    /// Gibt `true` zurück, wenn mindestens eine Map das Signal berührt.
    pub fn is_mapped(&self, id: &EntityId) -> bool {
        self.maps.values().any(|map| map.touches(id))
    }

    /// Gibt `true` zurück, wenn mindestens ein Link das Device berührt.
    pub fn is_linked(&self, id: &EntityId) -> bool {
        self.links.values().any(|link| link.touches(id))
    }

    /// Gibt `true` zurück, wenn eine Map die beiden Signale in beliebiger Richtung verbindet.
    pub fn has_map_between(&self, a: &EntityId, b: &EntityId) -> bool {
        self.maps.values().any(|map| map.connects(a, b))
    }

    /// Über Links mit `focus` verbundene Devices (ohne `focus` selbst, ohne Duplikate).
    pub fn linked_devices(&self, focus: &EntityId) -> Vec<EntityId> {
        let mut result: Vec<EntityId> = Vec::new();
        for link in self.links.values() {
            if let Some(other) = link.other_end(focus) {
                if other != focus && !result.contains(other) {
                    result.push(other.clone());
                }
            }
        }
        result
    }

    /// Wendet ein Änderungsereignis an.
    ///
    /// Gibt `true` zurück, wenn sich das Modell dadurch verändert hat.
    pub fn apply(&mut self, event: &ModelEvent) -> bool {
        match (event.change, &event.entity) {
            (ChangeKind::Added, ModelEntity::Device(dev)) => {
                let changed = self.devices.get(&dev.id) != Some(dev);
                self.add_device(dev.clone());
                changed
            }
            (ChangeKind::Added, ModelEntity::Signal(sig)) => {
                let changed = self.find_signal(&sig.id) != Some(sig);
                self.add_signal(sig.clone());
                changed
            }
            (ChangeKind::Added, ModelEntity::Map(map)) => {
                let changed = self.maps.get(&map.id) != Some(map);
                self.add_map(map.clone());
                changed
            }
            (ChangeKind::Added, ModelEntity::Link(link)) => {
                let changed = self.links.get(&link.id) != Some(link);
                self.add_link(link.clone());
                changed
            }
            (_, ModelEntity::Device(dev)) => self.remove_device(&dev.id).is_some(),
            (_, ModelEntity::Signal(sig)) => self.remove_signal(&sig.id).is_some(),
            (_, ModelEntity::Map(map)) => self.remove_map(&map.id).is_some(),
            (_, ModelEntity::Link(link)) => self.remove_link(&link.id).is_some(),
        }
    }
}
