//! Kanten des Netzwerks: Signal-Maps und Device-Links.

use serde::{Deserialize, Serialize};

use super::{EdgeId, EntityId};

/// Lebenszyklus einer Map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStatus {
    /// Angefragt, vom Netzwerk noch nicht bestätigt
    Staged,
    /// Aktiv
    #[default]
    Active,
}

/// Gerichtete Verbindung von einem oder mehreren Quell-Signalen zu einem Ziel-Signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    /// Eindeutige ID
    pub id: EdgeId,
    /// Quell-Signale (mehrere bei konvergenten Maps)
    pub srcs: Vec<EntityId>,
    /// Ziel-Signal
    pub dst: EntityId,
    /// Status
    #[serde(default)]
    pub status: MapStatus,
    /// Stummgeschaltet
    #[serde(default)]
    pub muted: bool,
    /// Vom Host ausgeblendet
    #[serde(default)]
    pub hidden: bool,
}

impl Map {
    /// Erstellt eine aktive Map mit einer Quelle.
    pub fn new(src: EntityId, dst: EntityId) -> Self {
        Self::convergent(vec![src], dst)
    }

    /// Erstellt eine aktive Map mit mehreren Quellen.
    pub fn convergent(srcs: Vec<EntityId>, dst: EntityId) -> Self {
        Self {
            id: EdgeId::map(&srcs, &dst),
            srcs,
            dst,
            status: MapStatus::Active,
            muted: false,
            hidden: false,
        }
    }

    /// Setzt den Status (Builder).
    pub fn with_status(mut self, status: MapStatus) -> Self {
        self.status = status;
        self
    }

    /// Gibt `true` zurück, wenn die Map mehr als eine Quelle hat.
    pub fn is_convergent(&self) -> bool {
        self.srcs.len() > 1
    }

    /// Gibt `true` zurück, wenn das Signal Quelle oder Ziel der Map ist.
    pub fn touches(&self, id: &EntityId) -> bool {
        &self.dst == id || self.srcs.contains(id)
    }

    /// Gibt `true` zurück, wenn die Map `a` und `b` in beliebiger Richtung verbindet.
    pub fn connects(&self, a: &EntityId, b: &EntityId) -> bool {
        (self.srcs.contains(a) && &self.dst == b) || (self.srcs.contains(b) && &self.dst == a)
    }
}

/// Verbindung zwischen zwei Devices (Übersicht).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Eindeutige ID
    pub id: EdgeId,
    /// Quell-Device
    pub src: EntityId,
    /// Ziel-Device
    pub dst: EntityId,
    /// Anzahl Maps `[src → dst, dst → src]`
    #[serde(default)]
    pub num_maps: [u32; 2],
}

impl Link {
    /// Erstellt einen Link ohne Maps.
    pub fn new(src: EntityId, dst: EntityId) -> Self {
        Self {
            id: EdgeId::link(&src, &dst),
            src,
            dst,
            num_maps: [0, 0],
        }
    }

    /// Setzt die Map-Zähler (Builder).
    pub fn with_maps(mut self, forward: u32, backward: u32) -> Self {
        self.num_maps = [forward, backward];
        self
    }

    /// Gibt `true` zurück, wenn das Device an diesem Link beteiligt ist.
    pub fn touches(&self, id: &EntityId) -> bool {
        &self.src == id || &self.dst == id
    }

    /// Gegenüberliegendes Device, falls `id` beteiligt ist.
    pub fn other_end(&self, id: &EntityId) -> Option<&EntityId> {
        if &self.src == id {
            Some(&self.dst)
        } else if &self.dst == id {
            Some(&self.src)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convergent_map_touches_every_source() {
        let a = EntityId::signal("a", "x");
        let b = EntityId::signal("b", "y");
        let c = EntityId::signal("c", "z");
        let map = Map::convergent(vec![a.clone(), b.clone()], c.clone());
        assert!(map.is_convergent());
        assert!(map.touches(&a));
        assert!(map.touches(&b));
        assert!(map.connects(&c, &b));
        assert!(!map.connects(&a, &b));
    }

    #[test]
    fn link_other_end() {
        let link = Link::new(EntityId::new("a"), EntityId::new("b"));
        assert_eq!(link.other_end(&EntityId::new("a")), Some(&EntityId::new("b")));
        assert_eq!(link.other_end(&EntityId::new("c")), None);
    }
}
