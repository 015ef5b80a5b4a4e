//! Zentrale Konfiguration der Layout- und Interaktions-Engine.
//!
//! `ViewOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── Animation ───────────────────────────────────────────────────────

/// Dauer von Modus-Übergängen und Modell-Redraws in Millisekunden.
pub const ANIMATION_DURATION_MS: u32 = 1000;

// ── Interaktion ─────────────────────────────────────────────────────

/// Abstand (px) zum Tabellenrand, ab dem die Vorschau auf eine Zeile einrastet.
pub const CLAMP_THRESHOLD: f32 = 50.0;
/// Fang-Radius (px) für Anker in freien Ansichten.
pub const ANCHOR_SNAP_RADIUS: f32 = 20.0;
/// Halbe Länge der Klick-Diagonalen für Kanten-Selektion.
pub const CLICK_TOLERANCE: f32 = 3.0;
/// Minimale Manhattan-Distanz, ab der ein Zieh-Vorgang Kanten überstreicht.
pub const MIN_SELECTION_DRAG: f32 = 5.0;
/// Anzahl Teilsegmente pro Kante beim Überstreich-Test.
pub const SELECTION_SAMPLES: usize = 10;

// ── Tabellen / Chrome ───────────────────────────────────────────────

/// Zeilenhöhe der linken/rechten Tabelle.
pub const ROW_HEIGHT: f32 = 24.0;
/// Spaltenbreite der oberen Tabelle (Grid).
pub const COLUMN_WIDTH: f32 = 24.0;
/// Breite der linken bzw. Höhe der oberen Tabelle im Grid.
pub const GRID_TABLE_EXTENT: f32 = 200.0;
/// Breitenanteil jeder Tabelle in der Listen-Ansicht.
pub const LIST_TABLE_FRACTION: f32 = 0.4;
/// Breitenanteil der linken Tabelle in der Canvas-Ansicht.
pub const CANVAS_TABLE_FRACTION: f32 = 0.25;

// ── Geometrie ───────────────────────────────────────────────────────

/// Pfade kürzer als dieser Wert bekommen keine Pfeilspitze.
pub const MIN_ARROW_LENGTH: f32 = 50.0;
/// Grundausschlag gleichseitiger Listen-Kurven.
pub const LIST_SAME_SIDE_BOW: f32 = 35.0;
/// Anteil der vertikalen Distanz, der den gleichseitigen Ausschlag vergrößert.
pub const LIST_SAME_SIDE_FACTOR: f32 = 0.25;
/// Vertikaler Zug der Kontrollpunkte bei Selbst-Schleifen in der Vorschau.
pub const SELF_LOOP_PULL: f32 = 40.0;
/// Ausbeulung der Graph-Kanten vom Flächenzentrum weg.
pub const GRAPH_INFLATION: f32 = 0.2;
/// Startwert des Graph-Zufallsgenerators.
pub const GRAPH_SEED: u64 = 0x9E37_79B9_7F4A_7C15;
/// Zug der Hive-Kontrollpunkte zum Speichen-Ursprung.
pub const HIVE_BOW: f32 = 0.6;
/// Horizontaler Rand der Hive-Ansicht (Ursprung-x und halber Breitenabzug).
pub const HIVE_MARGIN_X: f32 = 50.0;
/// Unterer Rand der Hive-Ansicht.
pub const HIVE_MARGIN_BOTTOM: f32 = 25.0;
/// Radius der Signal-Kreise in Hive/Graph und der Konvergenz-Knoten.
pub const SIGNAL_GLYPH_RADIUS: f32 = 10.0;
/// Größe eines Canvas-Glyphs.
pub const CANVAS_GLYPH_SIZE: [f32; 2] = [100.0, 20.0];
/// Abstand der Kontrollpunkte vor dem Canvas-Glyph-Rand.
pub const CANVAS_CONTROL_MARGIN: f32 = 6.0;
/// Horizontaler Abstand des Port-Kreises vom Glyph-Zentrum.
pub const CANVAS_PORT_OFFSET: f32 = 54.0;
/// Radius des Port-Kreises.
pub const CANVAS_PORT_RADIUS: f32 = 3.0;
/// Minimale x-Position eines abgelegten Canvas-Glyphs.
pub const CANVAS_MIN_DROP_X: f32 = 60.0;

// ── Kanten-Darstellung ─────────────────────────────────────────────

/// Linienstärke normaler Kanten.
pub const EDGE_STROKE_WIDTH: f32 = 4.0;
/// Linienstärke selektierter Kanten.
pub const EDGE_STROKE_WIDTH_SELECTED: f32 = 5.0;
/// Deckkraft noch nicht bestätigter Maps.
pub const STAGED_OPACITY: f32 = 0.5;
/// Kantenfarbe (RGBA: Dunkelgrau).
pub const EDGE_COLOR: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
/// Farbe selektierter Kanten (RGBA: Rot).
pub const EDGE_COLOR_SELECTED: [f32; 4] = [0.9, 0.1, 0.1, 1.0];
/// Füllfarbe von Glyphen (RGBA: Hellgrau).
pub const GLYPH_FILL_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
/// Füllfarbe der Grid-Quads und des Cursors (RGBA: Blau).
pub const GRID_FILL_COLOR: [f32; 4] = [0.2, 0.4, 0.9, 1.0];

/// Laufzeit-Optionen der Engine (persistiert als TOML).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewOptions {
    // ── Animation ──
    pub animation_duration_ms: u32,

    // ── Interaktion ──
    pub clamp_threshold: f32,
    pub anchor_snap_radius: f32,
    pub click_tolerance: f32,
    pub min_selection_drag: f32,
    pub selection_samples: usize,

    // ── Tabellen ──
    pub row_height: f32,
    pub column_width: f32,
    pub grid_table_extent: f32,
    pub list_table_fraction: f32,
    pub canvas_table_fraction: f32,

    // ── Geometrie ──
    pub min_arrow_length: f32,
    pub list_same_side_bow: f32,
    pub list_same_side_factor: f32,
    pub self_loop_pull: f32,
    pub graph_inflation: f32,
    #[serde(default = "default_graph_seed")]
    pub graph_seed: u64,
    pub hive_bow: f32,
    pub hive_margin_x: f32,
    pub hive_margin_bottom: f32,
    pub signal_glyph_radius: f32,
    pub canvas_glyph_size: [f32; 2],
    pub canvas_control_margin: f32,
    pub canvas_port_offset: f32,
    pub canvas_port_radius: f32,
    pub canvas_min_drop_x: f32,

    // ── Darstellung ──
    pub edge_stroke_width: f32,
    pub edge_stroke_width_selected: f32,
    #[serde(default = "default_staged_opacity")]
    pub staged_opacity: f32,
    pub edge_color: [f32; 4],
    pub edge_color_selected: [f32; 4],
    pub glyph_fill_color: [f32; 4],
    pub grid_fill_color: [f32; 4],
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            animation_duration_ms: ANIMATION_DURATION_MS,

            clamp_threshold: CLAMP_THRESHOLD,
            anchor_snap_radius: ANCHOR_SNAP_RADIUS,
            click_tolerance: CLICK_TOLERANCE,
            min_selection_drag: MIN_SELECTION_DRAG,
            selection_samples: SELECTION_SAMPLES,

            row_height: ROW_HEIGHT,
            column_width: COLUMN_WIDTH,
            grid_table_extent: GRID_TABLE_EXTENT,
            list_table_fraction: LIST_TABLE_FRACTION,
            canvas_table_fraction: CANVAS_TABLE_FRACTION,

            min_arrow_length: MIN_ARROW_LENGTH,
            list_same_side_bow: LIST_SAME_SIDE_BOW,
            list_same_side_factor: LIST_SAME_SIDE_FACTOR,
            self_loop_pull: SELF_LOOP_PULL,
            graph_inflation: GRAPH_INFLATION,
            graph_seed: GRAPH_SEED,
            hive_bow: HIVE_BOW,
            hive_margin_x: HIVE_MARGIN_X,
            hive_margin_bottom: HIVE_MARGIN_BOTTOM,
            signal_glyph_radius: SIGNAL_GLYPH_RADIUS,
            canvas_glyph_size: CANVAS_GLYPH_SIZE,
            canvas_control_margin: CANVAS_CONTROL_MARGIN,
            canvas_port_offset: CANVAS_PORT_OFFSET,
            canvas_port_radius: CANVAS_PORT_RADIUS,
            canvas_min_drop_x: CANVAS_MIN_DROP_X,

            edge_stroke_width: EDGE_STROKE_WIDTH,
            edge_stroke_width_selected: EDGE_STROKE_WIDTH_SELECTED,
            staged_opacity: STAGED_OPACITY,
            edge_color: EDGE_COLOR,
            edge_color_selected: EDGE_COLOR_SELECTED,
            glyph_fill_color: GLYPH_FILL_COLOR,
            grid_fill_color: GRID_FILL_COLOR,
        }
    }
}

/// Serde-Default für `graph_seed` (ältere TOML-Dateien ohne Seed).
fn default_graph_seed() -> u64 {
    GRAPH_SEED
}

/// Serde-Default für `staged_opacity`.
fn default_staged_opacity() -> f32 {
    STAGED_OPACITY
}

impl ViewOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("mapper-view"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("mapper_view.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_roundtrip_keeps_values() {
        let mut opts = ViewOptions::default();
        opts.clamp_threshold = 42.0;
        opts.graph_seed = 7;
        let text = toml::to_string_pretty(&opts).expect("Serialisierung sollte klappen");
        let parsed: ViewOptions = toml::from_str(&text).expect("Parsen sollte klappen");
        assert_eq!(parsed, opts);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let opts = ViewOptions::load_from_file(std::path::Path::new(
            "/nonexistent/mapper_view_options.toml",
        ));
        assert_eq!(opts, ViewOptions::default());
    }
}
