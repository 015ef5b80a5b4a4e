use std::sync::Arc;

use glam::Vec2;

use super::{SelectionModel, ViewState};
use crate::app::filter::FilterModel;
use crate::app::interaction::{
    CompatibilityOracle, DragContext, GridCursor, InteractionController, PlacementController,
};
use crate::app::layout::{CanvasPlacements, GraphPlacements, LayoutContext};
use crate::app::outbox::Outbox;
use crate::app::scheduler::ReconciliationScheduler;
use crate::app::tables::{ListFocus, Tables};
use crate::app::view_mode::{ViewMode, ViewModeController};
use crate::app::CommandLog;
use crate::core::{CanvasRect, Frame, NetworkModel};
use crate::shared::ViewOptions;

/// Laufende Linien-Selektion auf der Fläche.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepState {
    /// Position beim Drücken
    pub start: Vec2,
    /// Zuletzt geprüfte Position
    pub last: Vec2,
    /// Mindestdistanz überschritten, Segmente werden geprüft
    pub active: bool,
}

/// Hauptzustand der Engine
pub struct AppState {
    /// Aktueller Modell-Snapshot (read-only für Layout und Interaktion)
    pub model: Arc<NetworkModel>,
    /// Laufzeit-Optionen (Schwellen, Größen, Farben)
    pub options: ViewOptions,
    /// Zeichen-Zustand der Fläche
    pub view: ViewState,
    /// Aktiver Modus und Chrome
    pub view_mode: ViewModeController,
    /// Fokus der Listen-Ansicht
    pub focus: ListFocus,
    pub tables: Tables,
    pub filter: FilterModel,
    pub selection: SelectionModel,
    /// Zieh-Automat zum Verbinden
    pub interaction: InteractionController,
    /// Platzieren und Verschieben auf dem Canvas
    pub placement: PlacementController,
    pub grid_cursor: GridCursor,
    /// Abgelegte Signale der Canvas-Ansicht
    pub canvas_placements: CanvasPlacements,
    /// Sitzungs-Positionen der Graph-Ansicht
    pub graph_placements: GraphPlacements,
    pub scheduler: ReconciliationScheduler,
    /// Gesammelte Aufträge an den Host
    pub outbox: Outbox,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Laufende Linien-Selektion
    pub sweep: Option<SweepState>,
}

impl AppState {
    /// Erstellt einen leeren App-State mit Standard-Optionen
    pub fn new() -> Self {
        Self::with_options(ViewOptions::default())
    }

    /// Erstellt einen leeren App-State mit den gegebenen Optionen
    pub fn with_options(options: ViewOptions) -> Self {
        let frame = Frame::new(0.0, 0.0);
        Self {
            model: Arc::new(NetworkModel::new()),
            view: ViewState::new(frame),
            view_mode: ViewModeController::new(ViewMode::default(), frame, &options),
            focus: ListFocus::Overview,
            tables: Tables::new(options.row_height, options.column_width),
            filter: FilterModel::new(),
            selection: SelectionModel::new(),
            interaction: InteractionController::new(),
            placement: PlacementController::new(),
            grid_cursor: GridCursor::new(),
            canvas_placements: CanvasPlacements::new(),
            graph_placements: GraphPlacements::new(options.graph_seed),
            scheduler: ReconciliationScheduler::new(),
            outbox: Outbox::new(),
            command_log: CommandLog::new(),
            sweep: None,
            options,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.view_mode.mode()
    }

    /// Zeichenfläche im aktuellen Rahmen (Endzustand des Chromes).
    pub fn canvas(&self) -> CanvasRect {
        self.view_mode.chrome().canvas(self.view.frame)
    }

    /// Lesezugriff für die Layout-Strategien.
    pub fn layout_context(&self) -> LayoutContext<'_> {
        LayoutContext {
            model: &self.model,
            canvas: self.canvas(),
            tables: &self.tables,
            options: &self.options,
            focus: &self.focus,
            canvas_placements: &self.canvas_placements,
            graph_placements: &self.graph_placements,
        }
    }

    /// Lesezugriff für den Zieh-Automaten.
    pub fn drag_context<'a>(&'a self, oracle: &'a dyn CompatibilityOracle) -> DragContext<'a> {
        DragContext {
            model: &self.model,
            mode: self.mode(),
            focus: &self.focus,
            tables: &self.tables,
            canvas: self.canvas(),
            index: &self.view.anchor_index,
            options: &self.options,
            oracle,
        }
    }

    /// Gibt die Anzahl der Maps zurück
    pub fn map_count(&self) -> usize {
        self.model.maps.len()
    }

    /// Gibt die Anzahl der Links zurück
    pub fn link_count(&self) -> usize {
        self.model.links.len()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
