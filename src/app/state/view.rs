use std::collections::HashMap;

use indexmap::IndexMap;

use super::selection::VisibleSet;
use crate::app::layout::{EdgeLabel, LayoutError};
use crate::app::view_mode::ViewMode;
use crate::core::{AnchorIndex, AnchorMap, EdgeId, EntityId, Frame};
use crate::shared::{AnimationToken, PathAttributes, PathSpec};

/// Zuletzt an den Host übergebener Zustand einer Kante.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnEdge {
    pub path: PathSpec,
    pub attrs: PathAttributes,
    pub label: Option<EdgeLabel>,
}

/// Zuletzt an den Host übergebener Zustand eines Glyphs.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnNode {
    pub path: PathSpec,
    pub filled: bool,
    pub label: Option<EdgeLabel>,
}

/// Ergebnis eines Layout-Durchlaufs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    pub mode: ViewMode,
    /// Gezeichnete Kanten in Zeichen-Reihenfolge
    pub drawn_edges: Vec<EdgeId>,
    /// Ausgelassene Kanten mit Diagnose
    pub skipped: Vec<(EdgeId, LayoutError)>,
}

impl PassReport {
    /// Gibt `true` zurück, wenn die Kante gezeichnet wurde.
    pub fn is_drawn(&self, id: &EdgeId) -> bool {
        self.drawn_edges.contains(id)
    }
}

/// Zeichen-Zustand der Fläche, wie ihn der Host zuletzt erhalten hat.
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Rahmen des gesamten Views (Fläche plus Tabellen)
    pub frame: Frame,
    pub edges: IndexMap<EdgeId, DrawnEdge>,
    pub nodes: IndexMap<EntityId, DrawnNode>,
    /// Anker des letzten Durchlaufs
    pub anchors: AnchorMap,
    /// Ziehbare Anker der freien Ansichten (Signale bzw. Canvas-Ports)
    pub anchor_index: AnchorIndex,
    /// Sichtbare Zeilen und Kanten (Grundlage der Selektion)
    pub visible: VisibleSet,
    /// Laufende Einblend-Animationen neuer Kanten
    pub pending_intros: HashMap<AnimationToken, EdgeId>,
    /// Zuletzt gemeldete Tabs `(tabs, active)`
    pub tabs: Option<(Vec<String>, Option<String>)>,
    pub last_report: Option<PassReport>,
    next_token: u64,
}

impl ViewState {
    /// Erstellt einen leeren View-State
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            edges: IndexMap::new(),
            nodes: IndexMap::new(),
            anchors: AnchorMap::new(),
            anchor_index: AnchorIndex::empty(),
            visible: VisibleSet::default(),
            pending_intros: HashMap::new(),
            tabs: None,
            last_report: None,
            next_token: 0,
        }
    }

    /// Vergibt ein neues, streng monoton steigendes Animations-Token.
    pub fn next_token(&mut self) -> AnimationToken {
        self.next_token += 1;
        AnimationToken(self.next_token)
    }

    /// Pfad einer gezeichneten Kante.
    pub fn edge_path(&self, id: &EdgeId) -> Option<&PathSpec> {
        self.edges.get(id).map(|edge| &edge.path)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Frame::new(0.0, 0.0))
    }
}
