//! Sitzungsweite Positionen der frei platzierten Ansichten (Canvas, Graph).

use glam::Vec2;
use indexmap::IndexMap;

use crate::core::{CanvasRect, EntityId, NetworkModel};
use crate::shared::geometry::Rect;
use crate::shared::options::GRAPH_SEED;

/// Vom Benutzer auf dem Canvas abgelegte Signal-Glyphen (Zentren).
#[derive(Debug, Clone, Default)]
pub struct CanvasPlacements {
    centers: IndexMap<EntityId, Vec2>,
}

impl CanvasPlacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Legt ein Signal ab; x wird auf mindestens `min_x` geklemmt.
    pub fn place(&mut self, id: EntityId, center: Vec2, min_x: f32) -> Vec2 {
        let clamped = Vec2::new(center.x.max(min_x), center.y);
        self.centers.insert(id, clamped);
        clamped
    }

    /// Verschiebt ein bereits platziertes Signal; `false`, wenn es nicht platziert ist.
    pub fn move_to(&mut self, id: &EntityId, center: Vec2, min_x: f32) -> bool {
        match self.centers.get_mut(id) {
            Some(slot) => {
                *slot = Vec2::new(center.x.max(min_x), center.y);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &EntityId) -> Option<Vec2> {
        self.centers.get(id).copied()
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<Vec2> {
        self.centers.shift_remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, Vec2)> {
        self.centers.iter().map(|(id, center)| (id, *center))
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Verwirft Platzierungen von Signalen, die nicht mehr existieren.
    pub fn retain_existing(&mut self, model: &NetworkModel) {
        self.centers.retain(|id, _| model.find_signal(id).is_some());
    }

    /// Oberste Glyphe (zuletzt platziert) unter dem Punkt.
    pub fn glyph_at(&self, point: Vec2, size: Vec2) -> Option<&EntityId> {
        self.centers
            .iter()
            .rev()
            .find(|(_, center)| Rect::centered(**center, size).contains(point))
            .map(|(id, _)| id)
    }
}

/// Zufällige, aber reproduzierbare Positionen der Graph-Ansicht.
///
/// Jedes Signal erhält beim ersten Auftauchen eine Position aus einem
/// xorshift-Generator, dessen Startwert aus Seed und Signal-ID abgeleitet wird.
/// Gleicher Seed und gleiche ID ergeben immer dieselbe Position.
#[derive(Debug, Clone)]
pub struct GraphPlacements {
    seed: u64,
    positions: IndexMap<EntityId, Vec2>,
}

impl Default for GraphPlacements {
    fn default() -> Self {
        Self::new(GRAPH_SEED)
    }
}

impl GraphPlacements {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            positions: IndexMap::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn get(&self, id: &EntityId) -> Option<Vec2> {
        self.positions.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, Vec2)> {
        self.positions.iter().map(|(id, pos)| (id, *pos))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vergibt Positionen für alle noch unplatzierten Signale und verwirft
    /// Positionen verschwundener Signale. Gibt die Anzahl neuer Positionen zurück.
    pub fn ensure(&mut self, model: &NetworkModel, canvas: CanvasRect) -> usize {
        self.positions
            .retain(|id, _| model.find_signal(id).is_some());
        let margin = (canvas.width().min(canvas.height()) * 0.25).min(50.0);
        let span = (canvas.size - Vec2::splat(margin * 2.0)).max(Vec2::ZERO);
        let mut added = 0;
        for signal in model.signals() {
            if self.positions.contains_key(&signal.id) {
                continue;
            }
            let mut rng = XorShift64::seeded(self.seed, signal.id.as_str());
            let unit = Vec2::new(rng.next_unit(), rng.next_unit());
            self.positions
                .insert(signal.id.clone(), Vec2::splat(margin) + unit * span);
            added += 1;
        }
        added
    }
}

/// Minimaler xorshift64*-Generator.
struct XorShift64(u64);

impl XorShift64 {
    fn seeded(seed: u64, key: &str) -> Self {
        // FNV-1a über die ID
        let hash = key.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |acc, b| {
            (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        });
        let state = seed ^ hash;
        Self(if state == 0 { GRAPH_SEED } else { state })
    }

    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }

    /// Gleichverteilt in `[0, 1)`.
    fn next_unit(&mut self) -> f32 {
        (self.next() >> 40) as f32 / (1u64 << 24) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Device, SignalDirection};

    fn model() -> NetworkModel {
        let mut model = NetworkModel::new();
        model.add_device(
            Device::new("synth", "127.0.0.1", 9000)
                .with_signal("freq", SignalDirection::Input)
                .with_signal("gain", SignalDirection::Input),
        );
        model
    }

    #[test]
    fn canvas_drop_is_clamped_to_min_x() {
        let mut placements = CanvasPlacements::new();
        let placed = placements.place(EntityId::new("synth/freq"), Vec2::new(10.0, 80.0), 60.0);
        assert_eq!(placed, Vec2::new(60.0, 80.0));
        assert!(placements.move_to(&EntityId::new("synth/freq"), Vec2::new(200.0, 50.0), 60.0));
        assert!(!placements.move_to(&EntityId::new("synth/gain"), Vec2::ZERO, 60.0));
    }

    #[test]
    fn glyph_hit_prefers_latest() {
        let mut placements = CanvasPlacements::new();
        placements.place(EntityId::new("a/x"), Vec2::new(100.0, 100.0), 0.0);
        placements.place(EntityId::new("a/y"), Vec2::new(120.0, 100.0), 0.0);
        let hit = placements.glyph_at(Vec2::new(110.0, 100.0), Vec2::new(100.0, 20.0));
        assert_eq!(hit, Some(&EntityId::new("a/y")));
        assert!(placements
            .glyph_at(Vec2::new(110.0, 150.0), Vec2::new(100.0, 20.0))
            .is_none());
    }

    #[test]
    fn graph_positions_are_reproducible() {
        let canvas = CanvasRect::sized(800.0, 600.0);
        let mut a = GraphPlacements::new(42);
        let mut b = GraphPlacements::new(42);
        assert_eq!(a.ensure(&model(), canvas), 2);
        b.ensure(&model(), canvas);
        let id = EntityId::new("synth/freq");
        assert_eq!(a.get(&id), b.get(&id));
        let pos = a.get(&id).expect("Position erwartet");
        assert!(canvas.contains(pos));
        // zweiter Aufruf vergibt nichts neu
        assert_eq!(a.ensure(&model(), canvas), 0);
    }

    #[test]
    fn graph_positions_depend_on_seed() {
        let canvas = CanvasRect::sized(800.0, 600.0);
        let mut a = GraphPlacements::new(1);
        let mut b = GraphPlacements::new(2);
        a.ensure(&model(), canvas);
        b.ensure(&model(), canvas);
        let id = EntityId::new("synth/gain");
        assert_ne!(a.get(&id), b.get(&id));
    }
}
