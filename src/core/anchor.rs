//! Anker: berechnete Bildschirmpositionen von Devices und Signalen.

use glam::Vec2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{EntityId, TableSide};

/// Ort eines Ankers: frei auf der Fläche oder am Rand einer Tabelle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorSlot {
    /// Frei platziert (Hive, Graph, Canvas)
    Free,
    /// An einer Tabellenzeile
    Table(TableSide),
}

/// Position plus optionaler Richtungshinweis (z.B. Port-Richtung).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorPosition {
    pub position: Vec2,
    pub velocity: Option<Vec2>,
}

impl AnchorPosition {
    /// Anker ohne Richtungshinweis.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: None,
        }
    }

    /// Anker mit Richtungshinweis.
    pub fn directed(position: Vec2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity: Some(velocity),
        }
    }
}

/// Schlüssel eines Ankers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnchorKey {
    pub entity: EntityId,
    pub slot: AnchorSlot,
}

/// Ergebnis eines Layout-Schritts: alle Anker des aktuellen Modus.
#[derive(Debug, Clone, Default)]
pub struct AnchorMap {
    entries: IndexMap<AnchorKey, AnchorPosition>,
}

impl AnchorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Setzt einen Anker.
    pub fn insert(&mut self, entity: EntityId, slot: AnchorSlot, anchor: AnchorPosition) {
        self.entries.insert(AnchorKey { entity, slot }, anchor);
    }

    /// Anker an exakt diesem Ort.
    pub fn get(&self, entity: &EntityId, slot: AnchorSlot) -> Option<&AnchorPosition> {
        self.entries.get(&AnchorKey {
            entity: entity.clone(),
            slot,
        })
    }

    /// Erster vorhandener Anker in Präferenzreihenfolge.
    pub fn resolve(
        &self,
        entity: &EntityId,
        preference: &[AnchorSlot],
    ) -> Option<(AnchorSlot, AnchorPosition)> {
        preference
            .iter()
            .find_map(|slot| self.get(entity, *slot).map(|anchor| (*slot, *anchor)))
    }

    /// Alle Anker eines Ortes.
    pub fn in_slot(&self, slot: AnchorSlot) -> impl Iterator<Item = (&EntityId, &AnchorPosition)> {
        self.entries
            .iter()
            .filter(move |(key, _)| key.slot == slot)
            .map(|(key, anchor)| (&key.entity, anchor))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AnchorKey, &AnchorPosition)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_respects_preference_order() {
        let id = EntityId::signal("a", "x");
        let mut anchors = AnchorMap::new();
        anchors.insert(
            id.clone(),
            AnchorSlot::Table(TableSide::Right),
            AnchorPosition::at(Vec2::new(400.0, 10.0)),
        );
        let (slot, anchor) = anchors
            .resolve(
                &id,
                &[AnchorSlot::Table(TableSide::Left), AnchorSlot::Table(TableSide::Right)],
            )
            .expect("Anker rechts sollte gefunden werden");
        assert_eq!(slot, AnchorSlot::Table(TableSide::Right));
        assert_eq!(anchor.position, Vec2::new(400.0, 10.0));
        assert!(anchors.resolve(&id, &[AnchorSlot::Free]).is_none());
    }
}
