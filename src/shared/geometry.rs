//! Reine Geometrie-Bausteine für alle Ansichten.
//!
//! Jede Funktion liefert einen fertigen `PathSpec` oder ein Prädikat und hat
//! keinen Zugriff auf Zustand; die Layout-Strategien komponieren daraus ihre Kanten.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::PathSpec;

/// Achsenparalleles Rechteck (Tabellenzeile, Glyph).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rechteck mit gegebenem Mittelpunkt.
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x * 0.5, center.y - size.y * 0.5, size.x, size.y)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn cx(&self) -> f32 {
        self.left + self.width * 0.5
    }

    pub fn cy(&self) -> f32 {
        self.top + self.height * 0.5
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.cx(), self.cy())
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }
}

/// Blickrichtung einer Pfeilspitze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowFacing {
    /// Spitze zeigt nach links (Pfeil liegt rechts der Spitze)
    Left,
    /// Spitze zeigt nach rechts
    Right,
}

/// Kreis als zwei Halbbögen: `M x−r,y A … x+r,y A … x−r,y Z`.
pub fn circle(center: Vec2, radius: f32) -> PathSpec {
    let left = center - Vec2::new(radius, 0.0);
    let right = center + Vec2::new(radius, 0.0);
    PathSpec::new()
        .move_to(left)
        .arc_to(radius, true, false, right)
        .arc_to(radius, true, false, left)
        .close()
}

/// Geschlossenes Rechteck.
pub fn rect(r: Rect) -> PathSpec {
    PathSpec::new()
        .move_to(Vec2::new(r.left, r.top))
        .line_by(Vec2::new(r.width, 0.0))
        .line_by(Vec2::new(0.0, r.height))
        .line_by(Vec2::new(-r.width, 0.0))
        .close()
}

/// Gerade Linie.
pub fn line(from: Vec2, to: Vec2) -> PathSpec {
    PathSpec::new().move_to(from).line_to(to)
}

/// Glatte Kurve mit einem Kontrollpunkt (`M from S control to`).
///
/// Ohne vorherige Kurve fällt der erste Kontrollpunkt auf den Startpunkt.
pub fn smooth_curve(from: Vec2, control: Vec2, to: Vec2) -> PathSpec {
    PathSpec::new().move_to(from).curve_to(from, control, to)
}

/// Glatte Kurve entlang eines Tabellenrands.
///
/// Liegt eine Koordinate der Endpunkte auf der Null-Achse, wird der
/// Kontrollpunkt um den Abstand der anderen Koordinate von dieser Achse weggeschoben.
pub fn edge_hugging_curve(from: Vec2, to: Vec2) -> PathSpec {
    let mut mid = (from + to) * 0.5;
    if from.x == 0.0 {
        mid.x += (from.y - to.y).abs();
    }
    if from.y == 0.0 {
        mid.y += (from.x - to.x).abs();
    }
    smooth_curve(from, mid, to)
}

/// Kontrollpunkte einer Listen-Kurve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListCurve {
    /// Horizontale Lage beider Kontrollpunkte
    pub h_center: f32,
    /// Vertikaler Mittelwert der Endpunkte
    pub v_center: f32,
}

/// Kurve zwischen zwei Tabellenzeilen der Listen-Ansicht.
///
/// `same_side` ist `Some(true)` für zwei Zeilen links, `Some(false)` für zwei
/// Zeilen rechts und `None` für gegenüberliegende Zeilen.
pub fn list_bezier(
    from: Vec2,
    to: Vec2,
    width: f32,
    same_side: Option<bool>,
    bow: f32,
    bow_factor: f32,
) -> (PathSpec, ListCurve) {
    let v_center = (from.y + to.y) * 0.5;
    let y3 = from.y * 0.9 + v_center * 0.1;
    let y4 = to.y * 0.9 + v_center * 0.1;
    let h_center = match same_side {
        None => width * 0.5,
        Some(left) => {
            let mult = (from.y - to.y).abs() * bow_factor + bow;
            if left {
                mult
            } else {
                width - mult
            }
        }
    };
    let path = PathSpec::new().move_to(from).curve_to(
        Vec2::new(h_center, y3),
        Vec2::new(h_center, y4),
        to,
    );
    (path, ListCurve { h_center, v_center })
}

/// Zwischenstufen der Einblend-Animation einer neuen Listen-Kurve.
///
/// Liefert `(stub, halfway)`: einen auf den Startpunkt kollabierten Pfad
/// und eine Kurve, die bis zur Mitte der Fläche reicht.
pub fn list_intro_stages(from: Vec2, curve: ListCurve, width: f32) -> (PathSpec, PathSpec) {
    let stub = PathSpec::new().move_to(from).curve_to(from, from, from);
    let h_quarter = (width * 0.5 + from.x) * 0.5;
    let mid = Vec2::new(curve.h_center, curve.v_center);
    let halfway = PathSpec::new()
        .move_to(from)
        .curve_to(Vec2::new(h_quarter, from.y), mid, mid);
    (stub, halfway)
}

/// Dreieckige Pfeilspitze an `tip`.
pub fn arrow_head(tip: Vec2, facing: ArrowFacing) -> PathSpec {
    let dir = match facing {
        ArrowFacing::Left => 1.0,
        ArrowFacing::Right => -1.0,
    };
    PathSpec::new()
        .move_to(tip)
        .line_by(Vec2::new(10.0 * dir, -6.0))
        .line_by(Vec2::new(0.0, 12.0))
        .close()
}

/// Vorschau-Kurve während eines Zieh-Vorgangs zwischen Tabellen.
///
/// `control_end` ersetzt die y-Lage des zweiten Kontrollpunkts, wenn die
/// Vorschau auf eine Zeile eingerastet ist. Bei identischem Start und Ende
/// werden beide Kontrollpunkte um `loop_pull` auseinandergezogen.
pub fn drag_preview(
    start: Vec2,
    end: Vec2,
    control_end: Option<f32>,
    width: f32,
    loop_pull: f32,
) -> (PathSpec, PathSpec) {
    let h = width * 0.5;
    let target_y = control_end.unwrap_or(end.y);
    let (c1y, c2y) = if start == end {
        (start.y + loop_pull, target_y - loop_pull)
    } else {
        (start.y, target_y)
    };
    let path = PathSpec::new()
        .move_to(start)
        .curve_to(Vec2::new(h, c1y), Vec2::new(h, c2y), end);
    let facing = if end.x > h {
        ArrowFacing::Right
    } else {
        ArrowFacing::Left
    };
    (path, arrow_head(end, facing))
}

/// Canvas-Glyph: Rechteck um das Zentrum plus optionaler Port-Kreis.
///
/// `port_side` ist -1 für Eingänge (Port links), +1 für Ausgänge (Port rechts).
pub fn canvas_glyph(
    center: Vec2,
    size: Vec2,
    port_side: Option<f32>,
    port_offset: f32,
    port_radius: f32,
) -> PathSpec {
    let body = rect(Rect::centered(center, size));
    match port_side {
        Some(side) => body.append(circle(
            center + Vec2::new(port_offset * side, 0.0),
            port_radius,
        )),
        None => body,
    }
}

/// Kante zwischen zwei Canvas-Glyphen.
///
/// Die Vorzeichen geben die Port-Seite jedes Endpunkts an (-1 links, +1 rechts).
pub fn canvas_bezier(
    from: Vec2,
    from_side: f32,
    to: Vec2,
    to_side: f32,
    glyph_width: f32,
    margin: f32,
) -> PathSpec {
    let reach = glyph_width * 0.5 + margin;
    let o1 = Vec2::new(reach * from_side, 0.0);
    let o2 = Vec2::new(reach * to_side, 0.0);
    PathSpec::new()
        .move_to(from + o1)
        .curve_to(from + o1 * 2.0, to + o2 * 2.0, to + o2)
}

/// Gefülltes Dreieck von einer Spalte (oben) zu einer Zeile (links).
pub fn grid_forward_quad(column: Rect, row: Rect) -> PathSpec {
    PathSpec::new()
        .move_to(Vec2::new(column.left, row.cy()))
        .line_by(Vec2::new(column.width, -row.height * 0.5))
        .line_by(Vec2::new(0.0, row.height))
        .close()
}

/// Gefülltes Dreieck von einer Zeile (links) zu einer Spalte (oben).
pub fn grid_reversed_quad(column: Rect, row: Rect) -> PathSpec {
    PathSpec::new()
        .move_to(Vec2::new(column.left, row.bottom()))
        .line_by(Vec2::new(column.width, 0.0))
        .line_to(Vec2::new(column.cx(), row.top))
        .close()
}

/// Zwei Keile vom Schnittpunkt aus Zeile und Spalte zu beiden Tabellen.
pub fn grid_cursor(row: Rect, column: Rect) -> PathSpec {
    let hit = Vec2::new(column.cx(), row.cy());
    PathSpec::new()
        .move_to(hit)
        .line_to(Vec2::new(0.0, row.top))
        .line_to(Vec2::new(0.0, row.bottom()))
        .close()
        .move_to(hit)
        .line_to(Vec2::new(column.left, 0.0))
        .line_to(Vec2::new(column.right(), 0.0))
        .close()
}

/// Schiebt einen Punkt um `factor` seines Abstands vom Zentrum nach außen.
pub fn inflate_from(point: Vec2, center: Vec2, factor: f32) -> Vec2 {
    point + (point - center) * factor
}

/// Schwerpunkt einer Punktmenge.
pub fn centroid(points: &[Vec2]) -> Option<Vec2> {
    if points.is_empty() {
        return None;
    }
    let sum: Vec2 = points.iter().copied().sum();
    Some(sum / points.len() as f32)
}

/// Prüft, ob sich die Strecken `a1–a2` und `b1–b2` schneiden (Endpunkte inklusive).
pub fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let d = (a1.x - a2.x) * (b1.y - b2.y) - (a1.y - a2.y) * (b1.x - b2.x);
    if d.abs() < f32::EPSILON {
        return false;
    }
    let cross_a = a1.x * a2.y - a1.y * a2.x;
    let cross_b = b1.x * b2.y - b1.y * b2.x;
    let x = (cross_a * (b1.x - b2.x) - (a1.x - a2.x) * cross_b) / d;
    let y = (cross_a * (b1.y - b2.y) - (a1.y - a2.y) * cross_b) / d;
    let p = Vec2::new(x, y);
    within_box(p, a1, a2) && within_box(p, b1, b2)
}

/// Prüft, ob die Strecke `a–b` den Pfad an einer seiner Stützstellen-Strecken schneidet.
///
/// Der Pfad wird je Teilpfad in `samples` gleich lange Abschnitte zerlegt.
pub fn path_crosses_segment(path: &PathSpec, a: Vec2, b: Vec2, samples: usize) -> bool {
    path.sample_points(samples).iter().any(|points| {
        points
            .windows(2)
            .any(|w| segments_intersect(w[0], w[1], a, b))
    })
}

/// Prüft, ob `point` in einer der geschlossenen Flächen des Pfads liegt (Even-Odd).
pub fn path_contains_point(path: &PathSpec, point: Vec2) -> bool {
    path.flatten()
        .iter()
        .filter(|polygon| polygon.len() >= 3)
        .any(|polygon| polygon_contains(polygon, point))
}

fn polygon_contains(polygon: &[Vec2], point: Vec2) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

// Schnittpunkt liegt im Bounding-Box beider Endpunkte (mit Toleranz für Rundung)
fn within_box(p: Vec2, a: Vec2, b: Vec2) -> bool {
    const EPS: f32 = 1e-3;
    p.x >= a.x.min(b.x) - EPS
        && p.x <= a.x.max(b.x) + EPS
        && p.y >= a.y.min(b.y) - EPS
        && p.y <= a.y.max(b.y) + EPS
}
