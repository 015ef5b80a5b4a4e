//! Layout-Strategien: pro Ansicht Anker-Positionen, Kanten-Pfade und Glyphen.
//!
//! Jede Strategie ist zustandslos zwischen Aufrufen. Alles, was sie braucht
//! (Modell-Snapshot, Fläche, Tabellen, Platzierungen), steckt im `LayoutContext`.

mod canvas;
mod graph;
mod grid;
mod hive;
mod list;
pub mod placements;

use glam::Vec2;
use thiserror::Error;

use super::tables::{ListFocus, Tables};
use super::view_mode::ViewMode;
use crate::core::{
    AnchorMap, AnchorPosition, AnchorSlot, CanvasRect, EdgeId, EntityId, Link, Map, NetworkModel,
};
use crate::shared::{geometry, PathSpec, ViewOptions};

pub use canvas::CanvasLayout;
pub use graph::GraphLayout;
pub use grid::GridLayout;
pub use hive::HiveLayout;
pub use list::ListLayout;
pub use placements::{CanvasPlacements, GraphPlacements};

/// Nicht-fatale Diagnose eines Layout-Durchlaufs. Die betroffene Kante wird ausgelassen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("kein Anker für {0}")]
    MissingAnchor(EntityId),
    #[error("{0} liegt in keiner sichtbaren Tabelle")]
    UnresolvedRow(EntityId),
    #[error("Kante {0} ist ungültig: {1}")]
    InvalidMap(EdgeId, String),
    #[error("Endpunkt {0} ist ausgeblendet")]
    HiddenEndpoint(EntityId),
}

/// Eingaben eines Layout-Durchlaufs.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    pub model: &'a NetworkModel,
    pub canvas: CanvasRect,
    pub tables: &'a Tables,
    pub options: &'a ViewOptions,
    pub focus: &'a ListFocus,
    pub canvas_placements: &'a CanvasPlacements,
    pub graph_placements: &'a GraphPlacements,
}

/// Eine zu zeichnende Kante.
#[derive(Debug, Clone, Copy)]
pub enum EdgeRef<'a> {
    Map(&'a Map),
    Link(&'a Link),
}

impl<'a> EdgeRef<'a> {
    pub fn id(&self) -> &'a EdgeId {
        match self {
            Self::Map(map) => &map.id,
            Self::Link(link) => &link.id,
        }
    }

    /// Quell-Entitäten
    pub fn sources(&self) -> Vec<&'a EntityId> {
        match self {
            Self::Map(map) => map.srcs.iter().collect(),
            Self::Link(link) => vec![&link.src],
        }
    }

    /// Ziel-Entität
    pub fn destination(&self) -> &'a EntityId {
        match self {
            Self::Map(map) => &map.dst,
            Self::Link(link) => &link.dst,
        }
    }
}

/// Beschriftung einer Kante.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub position: Vec2,
    pub text: String,
}

/// Berechnete Geometrie einer Kante.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGeometry {
    pub path: PathSpec,
    /// Gefüllte Fläche statt Linie (Grid-Quads)
    pub filled: bool,
    /// Pfeilspitze am Ziel gewünscht
    pub arrow_end: bool,
    /// Pfeilspitze an der Quelle gewünscht (Links mit Gegenrichtung)
    pub arrow_start: bool,
    pub label: Option<EdgeLabel>,
    /// Zwischenstufen `(stub, halfway)` für die Einblend-Animation neuer Kanten
    pub intro: Option<(PathSpec, PathSpec)>,
}

impl EdgeGeometry {
    /// Linien-Kante mit Pfeil am Ziel.
    pub fn stroked(path: PathSpec) -> Self {
        Self {
            path,
            filled: false,
            arrow_end: true,
            arrow_start: false,
            label: None,
            intro: None,
        }
    }

    /// Gefüllte Kante ohne Pfeile.
    pub fn filled(path: PathSpec) -> Self {
        Self {
            path,
            filled: true,
            arrow_end: false,
            arrow_start: false,
            label: None,
            intro: None,
        }
    }
}

/// Glyph eines Devices oder Signals.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeGlyph {
    pub id: EntityId,
    pub path: PathSpec,
    pub filled: bool,
    pub label: Option<EdgeLabel>,
}

/// Layout-Algorithmus einer Ansicht.
pub trait LayoutStrategy {
    fn mode(&self) -> ViewMode;

    /// Anker aller sichtbaren Devices und Signale.
    fn compute_positions(&self, ctx: &LayoutContext<'_>) -> AnchorMap;

    /// Pfad einer Kante aus den zuvor berechneten Ankern.
    fn compute_edge_path(
        &self,
        ctx: &LayoutContext<'_>,
        anchors: &AnchorMap,
        edge: EdgeRef<'_>,
    ) -> Result<EdgeGeometry, LayoutError>;

    /// Glyphen der Devices und Signale (Speichen, Kreise, Bänder).
    fn node_glyphs(&self, _ctx: &LayoutContext<'_>, _anchors: &AnchorMap) -> Vec<NodeGlyph> {
        Vec::new()
    }

    /// Kanten mit ausgeblendeten Endpunkten bleiben (unsichtbar) erhalten.
    fn keeps_hidden_edges(&self) -> bool {
        false
    }
}

/// Strategie des Modus.
pub fn strategy_for(mode: ViewMode) -> Box<dyn LayoutStrategy> {
    match mode {
        ViewMode::List => Box::new(ListLayout),
        ViewMode::Grid => Box::new(GridLayout),
        ViewMode::Canvas => Box::new(CanvasLayout),
        ViewMode::Hive => Box::new(HiveLayout),
        ViewMode::Graph => Box::new(GraphLayout),
    }
}

/// Die in dieser Ansicht gezeichneten Kanten.
///
/// Die Geräteübersicht zeigt Links, jede andere Ansicht Maps. Im
/// Device-Fokus nur Maps zwischen Signalen der angezeigten Devices.
pub fn edges_for<'a>(
    mode: ViewMode,
    focus: &ListFocus,
    model: &'a NetworkModel,
) -> Vec<EdgeRef<'a>> {
    match (mode, focus) {
        (ViewMode::List, ListFocus::Overview) => model.links.values().map(EdgeRef::Link).collect(),
        (ViewMode::List, ListFocus::Device(device)) => {
            let mut shown = vec![device.clone()];
            shown.extend(model.linked_devices(device));
            let in_focus = |id: &EntityId| shown.iter().any(|d| d.as_str() == id.device_name());
            model
                .maps
                .values()
                .filter(|map| in_focus(&map.dst) && map.srcs.iter().all(in_focus))
                .map(EdgeRef::Map)
                .collect()
        }
        _ => model.maps.values().map(EdgeRef::Map).collect(),
    }
}

/// Kante zwischen frei platzierten Ankern, bei mehreren Quellen über einen Sammelknoten.
///
/// Ausgeblendete Quellen werden übergangen; der Sammelknoten liegt im
/// Schwerpunkt der sichtbaren Quellen und des Ziels.
pub(crate) fn free_edge(
    ctx: &LayoutContext<'_>,
    anchors: &AnchorMap,
    map: &Map,
    shape: impl Fn(&AnchorPosition, &AnchorPosition) -> PathSpec,
) -> Result<EdgeGeometry, LayoutError> {
    if map.srcs.is_empty() {
        return Err(LayoutError::InvalidMap(map.id.clone(), "keine Quellen".into()));
    }
    let dst = anchors
        .get(&map.dst, AnchorSlot::Free)
        .ok_or_else(|| LayoutError::MissingAnchor(map.dst.clone()))?;

    let mut srcs = Vec::with_capacity(map.srcs.len());
    for src in map.srcs.iter().filter(|src| !ctx.model.is_hidden(src)) {
        let anchor = anchors
            .get(src, AnchorSlot::Free)
            .ok_or_else(|| LayoutError::MissingAnchor(src.clone()))?;
        srcs.push(*anchor);
    }

    match srcs.as_slice() {
        [] => Err(LayoutError::HiddenEndpoint(map.srcs[0].clone())),
        [single] => Ok(EdgeGeometry::stroked(shape(single, dst))),
        many => {
            let points: Vec<Vec2> = many
                .iter()
                .map(|a| a.position)
                .chain(std::iter::once(dst.position))
                .collect();
            let node = AnchorPosition::at(geometry::centroid(&points).unwrap_or(dst.position));
            let path = many
                .iter()
                .fold(PathSpec::new(), |path, src| path.append(shape(src, &node)))
                .append(shape(&node, dst))
                .append(geometry::circle(node.position, ctx.options.signal_glyph_radius));
            Ok(EdgeGeometry::stroked(path))
        }
    }
}
