//! Spatial-Index (KD-Tree) für schnelle Anker-Abfragen.

use glam::Vec2;
use kiddo::{KdTree, SquaredEuclidean};

use super::{AnchorMap, AnchorSlot, EntityId};

/// Ergebnis einer Distanzabfrage gegen den Anker-Index.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorMatch {
    /// Gefundene Entität
    pub id: EntityId,
    /// Position des Ankers
    pub position: Vec2,
    /// Euklidische Distanz zum Suchpunkt
    pub distance: f32,
}

/// Read-only Index über den Ankern eines Ortes.
#[derive(Debug, Clone)]
pub struct AnchorIndex {
    tree: KdTree<f64, 2>,
    ids: Vec<EntityId>,
    positions: Vec<Vec2>,
}

impl Default for AnchorIndex {
    fn default() -> Self {
        Self::empty()
    }
}

impl AnchorIndex {
    /// Erstellt einen leeren Index.
    pub fn empty() -> Self {
        Self {
            tree: (&Vec::<[f64; 2]>::new()).into(),
            ids: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Baut einen Index aus beliebigen `(id, position)`-Paaren.
    pub fn from_points<'a>(points: impl IntoIterator<Item = (&'a EntityId, Vec2)>) -> Self {
        let (ids, positions): (Vec<EntityId>, Vec<Vec2>) = points
            .into_iter()
            .map(|(id, pos)| (id.clone(), pos))
            .unzip();
        let entries: Vec<[f64; 2]> = positions
            .iter()
            .map(|pos| [pos.x as f64, pos.y as f64])
            .collect();
        let tree: KdTree<f64, 2> = (&entries).into();
        Self {
            tree,
            ids,
            positions,
        }
    }

    /// Baut den Index über allen Ankern eines Ortes.
    pub fn from_anchors(anchors: &AnchorMap, slot: AnchorSlot) -> Self {
        Self::from_points(
            anchors
                .in_slot(slot)
                .map(|(id, anchor)| (id, anchor.position)),
        )
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Findet den nächsten Anker zur Position.
    pub fn nearest(&self, query: Vec2) -> Option<AnchorMatch> {
        if self.is_empty() {
            return None;
        }

        let result = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[query.x as f64, query.y as f64]);
        self.to_match(result.item as usize, result.distance)
    }

    /// Findet alle Anker innerhalb eines Radius, nach Distanz sortiert.
    pub fn within_radius(&self, query: Vec2, radius: f32) -> Vec<AnchorMatch> {
        if self.is_empty() || radius.is_sign_negative() {
            return Vec::new();
        }

        let mut results = self
            .tree
            .within::<SquaredEuclidean>(&[query.x as f64, query.y as f64], (radius * radius) as f64)
            .into_iter()
            .filter_map(|entry| self.to_match(entry.item as usize, entry.distance))
            .collect::<Vec<_>>();

        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results
    }

    /// Nächster Anker innerhalb des Radius, der das Prädikat erfüllt.
    pub fn nearest_matching(
        &self,
        query: Vec2,
        radius: f32,
        mut accept: impl FnMut(&EntityId) -> bool,
    ) -> Option<AnchorMatch> {
        self.within_radius(query, radius)
            .into_iter()
            .find(|candidate| accept(&candidate.id))
    }

    fn to_match(&self, item: usize, squared: f64) -> Option<AnchorMatch> {
        Some(AnchorMatch {
            id: self.ids.get(item)?.clone(),
            position: *self.positions.get(item)?,
            distance: (squared as f32).sqrt(),
        })
    }
}
