//! Ansichtsmodi und ihre Chrome-Übergänge.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::outbox::ChromeCall;
use crate::core::{ChromeLayout, Frame};
use crate::shared::{AnimationToken, ViewOptions};

/// Die fünf Ansichten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Grid,
    Canvas,
    Hive,
    Graph,
}

impl ViewMode {
    pub const ALL: [ViewMode; 5] = [
        ViewMode::List,
        ViewMode::Grid,
        ViewMode::Canvas,
        ViewMode::Hive,
        ViewMode::Graph,
    ];

    /// Tastenkürzel `1`–`5`.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(Self::List),
            '2' => Some(Self::Graph),
            '3' => Some(Self::Canvas),
            '4' => Some(Self::Grid),
            '5' => Some(Self::Hive),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Grid => "grid",
            Self::Canvas => "canvas",
            Self::Hive => "hive",
            Self::Graph => "graph",
        }
    }

    /// Kanten verankern an Tabellenzeilen (nicht frei auf der Fläche).
    pub fn is_table_mode(self) -> bool {
        matches!(self, Self::List | Self::Grid)
    }

    /// Chrome-Maße dieses Modus im gegebenen Rahmen.
    pub fn chrome(self, frame: Frame, options: &ViewOptions) -> ChromeLayout {
        match self {
            Self::List => {
                let w = frame.width * options.list_table_fraction;
                ChromeLayout {
                    left_width: w,
                    left_height: frame.height,
                    right_width: w,
                    right_height: frame.height,
                    ..Default::default()
                }
            }
            Self::Canvas => ChromeLayout {
                left_width: frame.width * options.canvas_table_fraction,
                left_height: frame.height,
                ..Default::default()
            },
            Self::Grid => {
                let extent = options.grid_table_extent;
                ChromeLayout {
                    left_width: extent,
                    left_height: (frame.height - extent).max(0.0),
                    top_width: (frame.width - extent).max(0.0),
                    top_height: extent,
                    ..Default::default()
                }
            }
            Self::Hive | Self::Graph => ChromeLayout::default(),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| anyhow::anyhow!("Unbekannter Ansichtsmodus: {s}"))
    }
}

/// Ein laufender Chrome-Übergang.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromeTransition {
    pub token: AnimationToken,
    pub from: ChromeLayout,
    pub to: ChromeLayout,
    pub duration_ms: u32,
}

impl ChromeTransition {
    /// Zwischenstand bei Fortschritt `t` (0..=1).
    pub fn sample(&self, t: f32) -> ChromeLayout {
        self.from.lerp(&self.to, t)
    }
}

/// Plan eines Moduswechsels, vom Handler ausgeführt.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchPlan {
    pub outgoing: ViewMode,
    pub incoming: ViewMode,
    /// Chrome-Auftrag (animiert oder sofort)
    pub chrome_call: ChromeCall,
    /// Dauer des Kanten-Redraws
    pub redraw_ms: u32,
    /// Ein laufender Übergang wurde übersprungen
    pub superseded: bool,
}

/// Hält den aktiven Modus und dessen Chrome-Zustand.
#[derive(Debug, Clone)]
pub struct ViewModeController {
    mode: ViewMode,
    chrome: ChromeLayout,
    transition: Option<ChromeTransition>,
}

impl ViewModeController {
    pub fn new(mode: ViewMode, frame: Frame, options: &ViewOptions) -> Self {
        Self {
            mode,
            chrome: mode.chrome(frame, options),
            transition: None,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Ziel-Chrome des aktiven Modus (während eines Übergangs: dessen Endzustand).
    pub fn chrome(&self) -> ChromeLayout {
        self.chrome
    }

    pub fn transition(&self) -> Option<&ChromeTransition> {
        self.transition.as_ref()
    }

    pub fn in_flight(&self) -> bool {
        self.transition.is_some()
    }

    /// Plant einen Moduswechsel.
    ///
    /// Läuft bereits ein Übergang, springt das Chrome sofort auf den Endzustand
    /// des neuen Modus und der Redraw erfolgt ohne Animation.
    pub fn begin_switch(
        &mut self,
        incoming: ViewMode,
        frame: Frame,
        options: &ViewOptions,
        token: AnimationToken,
    ) -> SwitchPlan {
        let outgoing = self.mode;
        let target = incoming.chrome(frame, options);
        let superseded = self.transition.take().is_some();
        let duration_ms = options.animation_duration_ms;

        let (chrome_call, redraw_ms) = if superseded || duration_ms == 0 {
            (ChromeCall::SetChrome { layout: target }, 0)
        } else {
            self.transition = Some(ChromeTransition {
                token,
                from: self.chrome,
                to: target,
                duration_ms,
            });
            (
                ChromeCall::AnimateChrome {
                    layout: target,
                    duration_ms,
                    token,
                },
                duration_ms,
            )
        };

        self.mode = incoming;
        self.chrome = target;
        log::info!(
            "Ansicht gewechselt: {} -> {}{}",
            outgoing,
            incoming,
            if superseded { " (Übergang übersprungen)" } else { "" }
        );

        SwitchPlan {
            outgoing,
            incoming,
            chrome_call,
            redraw_ms,
            superseded,
        }
    }

    /// Meldet den Abschluss einer Chrome-Animation.
    ///
    /// Gibt `true` zurück, wenn das Token zum laufenden Übergang gehört.
    pub fn finish(&mut self, token: AnimationToken) -> bool {
        match &self.transition {
            Some(transition) if transition.token == token => {
                self.transition = None;
                true
            }
            _ => false,
        }
    }

    /// Passt das Chrome an einen neuen Rahmen an (ohne Animation).
    pub fn resize(&mut self, frame: Frame, options: &ViewOptions) -> ChromeLayout {
        self.transition = None;
        self.chrome = self.mode.chrome(frame, options);
        self.chrome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn chrome_per_mode() {
        let opts = ViewOptions::default();
        let frame = Frame::new(1000.0, 600.0);
        let list = ViewMode::List.chrome(frame, &opts);
        assert_relative_eq!(list.left_width, 400.0);
        assert_relative_eq!(list.right_width, 400.0);
        let canvas = ViewMode::Canvas.chrome(frame, &opts);
        assert_relative_eq!(canvas.left_width, 250.0);
        assert_relative_eq!(canvas.right_width, 0.0);
        let grid = ViewMode::Grid.chrome(frame, &opts);
        assert_relative_eq!(grid.left_height, 400.0);
        assert_relative_eq!(grid.top_width, 800.0);
        assert_eq!(ViewMode::Hive.chrome(frame, &opts), ChromeLayout::default());
    }

    #[test]
    fn switch_during_transition_jumps_to_final_chrome() {
        let opts = ViewOptions::default();
        let frame = Frame::new(800.0, 600.0);
        let mut ctrl = ViewModeController::new(ViewMode::List, frame, &opts);

        let first = ctrl.begin_switch(ViewMode::Grid, frame, &opts, AnimationToken(1));
        assert!(matches!(first.chrome_call, ChromeCall::AnimateChrome { .. }));
        assert!(ctrl.in_flight());

        let second = ctrl.begin_switch(ViewMode::Hive, frame, &opts, AnimationToken(2));
        assert!(second.superseded);
        assert_eq!(second.redraw_ms, 0);
        assert_eq!(
            second.chrome_call,
            ChromeCall::SetChrome {
                layout: ChromeLayout::default()
            }
        );
        // veraltetes Token wird ignoriert
        assert!(!ctrl.finish(AnimationToken(1)));
        assert_eq!(ctrl.mode(), ViewMode::Hive);
    }

    #[test]
    fn keys_map_to_modes() {
        assert_eq!(ViewMode::from_key('1'), Some(ViewMode::List));
        assert_eq!(ViewMode::from_key('2'), Some(ViewMode::Graph));
        assert_eq!(ViewMode::from_key('5'), Some(ViewMode::Hive));
        assert_eq!(ViewMode::from_key('9'), None);
        assert_eq!("grid".parse::<ViewMode>().ok(), Some(ViewMode::Grid));
    }
}
