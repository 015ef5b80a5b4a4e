//! Ausgehende Aufträge an den Host: Zeichnen, Modell-Anfragen, Chrome.
//!
//! Die Engine führt keine Seiteneffekte selbst aus. Alles, was nach außen
//! wirkt, wird hier gesammelt und vom Host nach jedem Intent abgeholt.

use serde::{Deserialize, Serialize};

use super::tables::TableRow;
use crate::core::{ChromeLayout, EntityId, TableSide};
use crate::shared::{AnimationToken, DrawCall};

/// Änderungswunsch an das Netzwerk-Modell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ModelRequest {
    /// Neue Map zwischen zwei Signalen
    Connect {
        src: EntityId,
        dst: EntityId,
        muted: bool,
    },
    /// Map entfernen
    Disconnect { src: EntityId, dst: EntityId },
    /// Neuer Link zwischen zwei Devices
    Link { src: EntityId, dst: EntityId },
    /// Link entfernen
    Unlink { src: EntityId, dst: EntityId },
}

/// Auftrag an die Tabellen und das umgebende Chrome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ChromeCall {
    SetTableHeaders {
        side: TableSide,
        columns: Vec<String>,
    },
    SetTableRows {
        side: TableSide,
        rows: Vec<TableRow>,
    },
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
    /// Chrome-Maße sofort setzen
    SetChrome { layout: ChromeLayout },
    /// Chrome-Maße animiert setzen; Abschluss wird mit `token` gemeldet
    AnimateChrome {
        layout: ChromeLayout,
        duration_ms: u32,
        token: AnimationToken,
    },
    SetTabs {
        tabs: Vec<String>,
        active: Option<String>,
    },
    /// Die sichtbare Selektion hat sich geändert
    SelectionChanged,
}

/// Gesammelte Aufträge seit dem letzten Abholen.
#[derive(Debug, Default)]
pub struct Outbox {
    draw_calls: Vec<DrawCall>,
    model_requests: Vec<ModelRequest>,
    chrome_calls: Vec<ChromeCall>,
}

/// Vom Host abgeholter Inhalt der Outbox.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct OutboxBatch {
    pub draw_calls: Vec<DrawCall>,
    pub model_requests: Vec<ModelRequest>,
    pub chrome_calls: Vec<ChromeCall>,
}

impl OutboxBatch {
    /// Gibt `true` zurück, wenn keine Aufträge enthalten sind.
    pub fn is_empty(&self) -> bool {
        self.draw_calls.is_empty() && self.model_requests.is_empty() && self.chrome_calls.is_empty()
    }
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(&mut self, call: DrawCall) {
        self.draw_calls.push(call);
    }

    pub fn request(&mut self, request: ModelRequest) {
        log::debug!("Modell-Anfrage: {:?}", request);
        self.model_requests.push(request);
    }

    pub fn chrome(&mut self, call: ChromeCall) {
        self.chrome_calls.push(call);
    }

    /// Bisher gesammelte Zeichenaufträge (read-only).
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    /// Bisher gesammelte Modell-Anfragen (read-only).
    pub fn model_requests(&self) -> &[ModelRequest] {
        &self.model_requests
    }

    /// Bisher gesammelte Chrome-Aufträge (read-only).
    pub fn chrome_calls(&self) -> &[ChromeCall] {
        &self.chrome_calls
    }

    /// Übergibt alle Aufträge und leert die Outbox.
    pub fn drain(&mut self) -> OutboxBatch {
        OutboxBatch {
            draw_calls: std::mem::take(&mut self.draw_calls),
            model_requests: std::mem::take(&mut self.model_requests),
            chrome_calls: std::mem::take(&mut self.chrome_calls),
        }
    }
}
