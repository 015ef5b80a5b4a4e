//! Zieh-Zustandsautomat zum Verbinden: `Idle → Armed → Tracking → Idle`.
//!
//! Jeder Zustand deklariert, welche Zeiger-Ereignisse er verarbeitet;
//! alle anderen werden ignoriert. Der Automat verändert nie das Modell,
//! sondern liefert `InteractionEffect`s, die der Handler ausführt.

mod anchor_drag;
pub mod grid_cursor;
pub mod placement;
mod table_drag;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::outbox::ModelRequest;
use super::tables::{ListFocus, Tables};
use super::view_mode::ViewMode;
use crate::core::{AnchorIndex, CanvasRect, EntityId, NetworkModel, TableSide};
use crate::shared::{PathSpec, ViewOptions};

pub use grid_cursor::{CursorUpdate, GridCursor};
pub use placement::{PlacementController, PlacementEffect, PlacementPhase};

/// Art eines Zeiger-Ereignisses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Enter,
    Leave,
}

/// Zeiger-Ereignis in Flächen-Koordinaten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Vec2,
    /// Tabellenzeile unter dem Zeiger, falls der Host eine meldet
    #[serde(default)]
    pub row: Option<(TableSide, EntityId)>,
    #[serde(default)]
    pub shift: bool,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, position: Vec2) -> Self {
        Self {
            kind,
            position,
            row: None,
            shift: false,
        }
    }

    pub fn over_row(mut self, side: TableSide, id: EntityId) -> Self {
        self.row = Some((side, id));
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Ausgangspunkt eines Zieh-Vorgangs.
#[derive(Debug, Clone, PartialEq)]
pub enum DragSource {
    /// Tabellenzeile (Listen-Ansicht)
    Row { side: TableSide, id: EntityId },
    /// Frei platzierter Anker (Hive, Graph, Canvas-Port)
    Anchor { id: EntityId, position: Vec2 },
}

impl DragSource {
    pub fn id(&self) -> &EntityId {
        match self {
            Self::Row { id, .. } | Self::Anchor { id, .. } => id,
        }
    }
}

/// Aktuelles Ziel eines Zieh-Vorgangs.
#[derive(Debug, Clone, PartialEq)]
pub struct DragTarget {
    pub id: EntityId,
    /// Tabelle des Ziels (`None` bei freien Ankern)
    pub side: Option<TableSide>,
    pub position: Vec2,
}

/// Zustand eines laufenden Zieh-Vorgangs.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub source: DragSource,
    pub start: Vec2,
    pub candidate: Option<DragTarget>,
    /// Tabelle, in der aktuell Ziele gesucht werden
    pub target_side: Option<TableSide>,
    pub muted: bool,
    pub allow_self: bool,
    /// Ausgegraute Zeilen je Tabelle
    pub faded: Vec<(TableSide, Vec<EntityId>)>,
    /// Zuletzt gezeichnete Vorschau `(path, arrow)`
    pub preview: Option<(PathSpec, PathSpec)>,
}

impl DragSession {
    fn new(source: DragSource, start: Vec2, allow_self: bool) -> Self {
        Self {
            source,
            start,
            candidate: None,
            target_side: None,
            muted: false,
            allow_self,
            faded: Vec::new(),
            preview: None,
        }
    }

    /// Merkt sich die Vorschau und liefert den Zeichen-Effekt.
    fn preview(&mut self, path: PathSpec, arrow: PathSpec) -> InteractionEffect {
        self.preview = Some((path.clone(), arrow.clone()));
        InteractionEffect::Preview {
            path,
            arrow,
            muted: self.muted,
        }
    }
}

/// Zustand des Automaten.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragPhase {
    #[default]
    Idle,
    Armed {
        source: DragSource,
        allow_self: bool,
    },
    Tracking(DragSession),
}

impl DragPhase {
    /// Ereignisse, die dieser Zustand verarbeitet.
    pub fn subscriptions(&self) -> &'static [PointerKind] {
        match self {
            Self::Idle => &[],
            Self::Armed {
                source: DragSource::Row { .. },
                ..
            } => &[PointerKind::Enter, PointerKind::Move, PointerKind::Up],
            Self::Armed {
                source: DragSource::Anchor { .. },
                ..
            } => &[PointerKind::Move, PointerKind::Up],
            Self::Tracking(_) => &[PointerKind::Move, PointerKind::Up, PointerKind::Leave],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Armed { .. } => "armed",
            Self::Tracking(_) => "tracking",
        }
    }
}

/// Auswirkung eines Zustandsübergangs, vom Handler ausgeführt.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEffect {
    HighlightRow {
        side: TableSide,
        id: EntityId,
        on: bool,
    },
    FadeRows {
        side: TableSide,
        ids: Vec<EntityId>,
        faded: bool,
    },
    /// Vorschau-Kurve und Pfeilspitze neu zeichnen
    Preview {
        path: PathSpec,
        arrow: PathSpec,
        muted: bool,
    },
    /// Markierung des Ziel-Ankers (freie Ansichten); `None` entfernt sie
    CandidateMarker(Option<Vec2>),
    /// Vorschau und Markierung entfernen
    ClearPreview,
    Request(ModelRequest),
}

/// Entscheidet, ob zwei Entitäten verbunden werden dürfen.
pub trait CompatibilityOracle {
    fn is_compatible(&self, model: &NetworkModel, src: &EntityId, dst: &EntityId) -> bool;

    /// Kandidaten, die mit `src` nicht verbunden werden dürfen.
    fn incompatible_with(
        &self,
        model: &NetworkModel,
        src: &EntityId,
        candidates: &[EntityId],
    ) -> Vec<EntityId> {
        candidates
            .iter()
            .filter(|candidate| !self.is_compatible(model, src, candidate))
            .cloned()
            .collect()
    }
}

/// Standard-Regel: keine Verbindung zu sich selbst und keine doppelte Verbindung.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExistingMapsOracle;

impl CompatibilityOracle for ExistingMapsOracle {
    fn is_compatible(&self, model: &NetworkModel, src: &EntityId, dst: &EntityId) -> bool {
        if src == dst {
            return false;
        }
        if src.is_signal() && dst.is_signal() {
            return !model.has_map_between(src, dst);
        }
        !model.links.values().any(|link| {
            (&link.src == src && &link.dst == dst) || (&link.src == dst && &link.dst == src)
        })
    }
}

/// Lesezugriff des Automaten auf den Zustand der Ansicht.
#[derive(Clone, Copy)]
pub struct DragContext<'a> {
    pub model: &'a NetworkModel,
    pub mode: ViewMode,
    pub focus: &'a ListFocus,
    pub tables: &'a Tables,
    pub canvas: CanvasRect,
    /// Verbindbare freie Anker (Signale bzw. Canvas-Ports)
    pub index: &'a AnchorIndex,
    pub options: &'a ViewOptions,
    pub oracle: &'a dyn CompatibilityOracle,
}

/// Führt den Zieh-Automaten.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    phase: DragPhase,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, DragPhase::Idle)
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.phase, DragPhase::Armed { .. })
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.phase, DragPhase::Tracking(_))
    }

    /// Aktuelles Ziel während `Tracking`.
    pub fn candidate(&self) -> Option<&DragTarget> {
        match &self.phase {
            DragPhase::Tracking(session) => session.candidate.as_ref(),
            _ => None,
        }
    }

    /// `Idle → Armed`. Nur aus `Idle` möglich; zeichnet noch nichts.
    pub fn arm(&mut self, source: DragSource, allow_self: bool) -> bool {
        if !self.is_idle() {
            return false;
        }
        log::debug!("Zieh-Vorgang vorbereitet: {}", source.id());
        self.phase = DragPhase::Armed { source, allow_self };
        true
    }

    /// Verarbeitet ein Zeiger-Ereignis, sofern der aktuelle Zustand es abonniert hat.
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        ctx: &DragContext<'_>,
    ) -> Vec<InteractionEffect> {
        if !self.phase.subscriptions().contains(&event.kind) {
            return Vec::new();
        }

        match (std::mem::take(&mut self.phase), event.kind) {
            (DragPhase::Armed { .. }, PointerKind::Up) => {
                log::debug!("Zieh-Vorgang ohne Bewegung beendet");
                Vec::new()
            }
            (DragPhase::Armed { source, allow_self }, _) => {
                let session = match &source {
                    DragSource::Row { side, id } => table_drag::begin(*side, id, allow_self, ctx),
                    DragSource::Anchor { position, .. } => {
                        Some(DragSession::new(source.clone(), *position, allow_self))
                    }
                };
                let Some(mut session) = session else {
                    log::debug!(
                        "Quelle {} nicht mehr sichtbar, Zieh-Vorgang verworfen",
                        source.id()
                    );
                    return Vec::new();
                };
                log::debug!("Zieh-Vorgang gestartet: {}", session.source.id());
                let effects = Self::track(&mut session, event, ctx);
                self.phase = DragPhase::Tracking(session);
                effects
            }
            (DragPhase::Tracking(mut session), PointerKind::Move) => {
                let effects = Self::track(&mut session, event, ctx);
                self.phase = DragPhase::Tracking(session);
                effects
            }
            (DragPhase::Tracking(mut session), PointerKind::Leave) => {
                let mut effects = Self::drop_candidate(&mut session);
                session.preview = None;
                effects.push(InteractionEffect::ClearPreview);
                self.phase = DragPhase::Tracking(session);
                effects
            }
            (DragPhase::Tracking(session), PointerKind::Up) => Self::commit(session, ctx),
            (phase, _) => {
                self.phase = phase;
                Vec::new()
            }
        }
    }

    /// Schaltet `muted` um; nur während `Tracking` im Signal-Fokus wirksam.
    pub fn toggle_muted(&mut self, ctx: &DragContext<'_>) -> Vec<InteractionEffect> {
        let DragPhase::Tracking(session) = &mut self.phase else {
            return Vec::new();
        };
        if ctx.mode == ViewMode::List && ctx.focus.is_overview() {
            return Vec::new();
        }
        session.muted = !session.muted;
        log::debug!("Zieh-Vorgang stumm: {}", session.muted);
        match session.preview.clone() {
            Some((path, arrow)) => vec![session.preview(path, arrow)],
            None => Vec::new(),
        }
    }

    /// Bricht jeden laufenden Zieh-Vorgang ab und räumt die Vorschau auf.
    pub fn cancel(&mut self) -> Vec<InteractionEffect> {
        match std::mem::take(&mut self.phase) {
            DragPhase::Tracking(mut session) => {
                log::debug!("Zieh-Vorgang abgebrochen: {}", session.source.id());
                Self::teardown(&mut session)
            }
            DragPhase::Armed { .. } | DragPhase::Idle => Vec::new(),
        }
    }

    fn track(
        session: &mut DragSession,
        event: &PointerEvent,
        ctx: &DragContext<'_>,
    ) -> Vec<InteractionEffect> {
        match session.source {
            DragSource::Row { .. } => table_drag::update(session, event, ctx),
            DragSource::Anchor { .. } => anchor_drag::update(session, event, ctx),
        }
    }

    fn commit(mut session: DragSession, ctx: &DragContext<'_>) -> Vec<InteractionEffect> {
        let request = session.candidate.as_ref().map(|target| match &session.source {
            DragSource::Row { side, id } => {
                table_drag::request(*side, id, target, session.muted, ctx)
            }
            DragSource::Anchor { id, .. } => anchor_drag::request(id, target, session.muted, ctx),
        });
        let mut effects = Self::teardown(&mut session);
        match request {
            Some(request) => {
                log::debug!("Zieh-Vorgang abgeschlossen: {:?}", request);
                effects.push(InteractionEffect::Request(request));
            }
            None => log::debug!("Zieh-Vorgang ohne Ziel beendet"),
        }
        effects
    }

    fn drop_candidate(session: &mut DragSession) -> Vec<InteractionEffect> {
        match session.candidate.take() {
            Some(DragTarget {
                id, side: Some(side), ..
            }) => vec![InteractionEffect::HighlightRow { side, id, on: false }],
            Some(_) => vec![InteractionEffect::CandidateMarker(None)],
            None => Vec::new(),
        }
    }

    fn teardown(session: &mut DragSession) -> Vec<InteractionEffect> {
        let mut effects = Self::drop_candidate(session);
        effects.extend(
            session
                .faded
                .drain(..)
                .map(|(side, ids)| InteractionEffect::FadeRows {
                    side,
                    ids,
                    faded: false,
                }),
        );
        effects.push(InteractionEffect::ClearPreview);
        effects
    }
}
