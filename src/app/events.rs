//! AppIntent- und AppCommand-Enums für den Intent/Command-Datenfluss.

use glam::Vec2;

use super::interaction::PointerEvent;
use super::tables::ListFocus;
use super::view_mode::ViewMode;
use crate::core::{EntityId, ModelEvent, NetworkModel, TableSide};
use crate::shared::{AnimationToken, ViewOptions};

/// App-Intent und App-Command Events.
/// Intents sind Eingaben aus Host, Modell und Chrome ohne direkte Mutationslogik.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Modell komplett ersetzt (Sitzung geladen, Neuverbindung)
    ModelReset { model: NetworkModel },
    /// Einzelne Entität hinzugefügt, entfernt oder im Abbau
    EntityChanged { event: ModelEvent },
    /// Host-Tick: anstehenden Abgleich ausführen
    ReconcileTick,
    /// Größe des Views hat sich geändert
    FrameResized { width: f32, height: f32 },
    /// Taste `1`–`5` gedrückt
    ModeKeyPressed { key: char },
    /// Modus direkt wählen (Menü)
    ModeSelected { mode: ViewMode },
    /// Host meldet das Ende einer Animation
    AnimationFinished { token: AnimationToken },
    /// Zeiger-Ereignis auf der Zeichenfläche
    Pointer { event: PointerEvent },
    /// Maustaste auf einer Tabellenzeile gedrückt
    RowMouseDown {
        side: TableSide,
        id: EntityId,
        shift: bool,
    },
    /// Suchtext einer Tabelle geändert
    SearchChanged { side: TableSide, text: String },
    /// Unverbundene Zeilen ein-/ausblenden
    ShowUnmappedToggled { show: bool },
    /// Modifier-Taste für stumme Verbindungen gedrückt
    MuteModifierPressed,
    /// Entfernen-Taste gedrückt
    DeleteRequested,
    /// Alle sichtbaren Kanten selektieren
    SelectAllRequested,
    /// Selektion aufheben
    DeselectAllRequested,
    /// Tab gewählt (`None` = Geräteübersicht)
    FocusRequested { device: Option<EntityId> },
    /// Tabelle gescrollt
    TableScrolled { side: TableSide, offset: f32 },
    /// Tabelle im Host umsortiert
    TableSorted { side: TableSide, order: Vec<EntityId> },
    /// Laufenden Zieh-Vorgang abbrechen (Escape)
    DragAborted,
    /// Optionen wurden geändert
    OptionsChanged { options: ViewOptions },
}

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Modell ersetzen und alles neu zeichnen
    ResetModel { model: NetworkModel },
    /// Änderungsereignis anwenden und Abgleich anfordern
    ApplyModelEvent { event: ModelEvent },
    /// Anstehenden Abgleich ausführen
    RunReconcilePass,
    /// Rahmen setzen
    ResizeFrame { width: f32, height: f32 },
    /// Ansicht wechseln
    SwitchMode { mode: ViewMode },
    /// Animations-Ende verarbeiten
    FinishAnimation { token: AnimationToken },

    /// Zieh-Vorgang an einer Tabellenzeile vorbereiten
    ArmRowDrag { side: TableSide, id: EntityId },
    /// Zieh-Vorgang an einem freien Anker vorbereiten
    ArmAnchorDrag { id: EntityId, position: Vec2 },
    /// Zeiger-Ereignis an den Zieh-Automaten
    ForwardDragPointer { event: PointerEvent },
    /// Stumm-Flag des laufenden Zieh-Vorgangs umschalten
    ToggleDragMuted,
    /// Zieh-Vorgang abbrechen
    CancelDrag,

    /// Unplatziertes Signal auf den Canvas ziehen
    BeginPlacement { id: EntityId },
    /// Platziertes Glyph verschieben
    BeginGlyphMove { id: EntityId, pointer: Vec2 },
    /// Zeiger-Ereignis an die Platzierung
    ForwardPlacementPointer { event: PointerEvent },

    /// Grid-Cursor nachführen
    UpdateGridCursor { position: Vec2 },
    /// Grid-Cursor entfernen
    ClearGridCursor,

    /// Zeile umschalten
    ToggleRowSelection { side: TableSide, id: EntityId },
    /// Zeilenbereich selektieren
    SelectRowRange { side: TableSide, id: EntityId },
    /// Klick-Selektion von Kanten, optional mit anschließender Linien-Selektion
    BeginSweep { position: Vec2, additive: bool },
    /// Linien-Selektion fortsetzen
    UpdateSweep { position: Vec2 },
    /// Linien-Selektion beenden
    EndSweep,
    /// Alle sichtbaren Kanten selektieren
    SelectAllEdges,
    /// Selektion aufheben
    DeselectAll,
    /// Selektierte Kanten trennen
    DeleteSelected,

    /// Suchtext setzen
    SetSearch { side: TableSide, text: String },
    /// Unverbundene Zeilen ein-/ausblenden
    SetShowUnmapped { show: bool },
    /// Fokus der Listen-Ansicht setzen
    SetFocus { focus: ListFocus },
    /// Scroll-Versatz einer Tabelle setzen
    ScrollTable { side: TableSide, offset: f32 },
    /// Externe Reihenfolge einer Tabelle setzen
    SortTable { side: TableSide, order: Vec<EntityId> },
    /// Optionen anwenden
    ApplyOptions { options: ViewOptions },
}
