//! Abstrakte Pfadbeschreibung (SVG-Subset) mit Arc-Length-Abfragen.
//!
//! Ein `PathSpec` ist eine geordnete Folge von Zeichenbefehlen. Der Host
//! übersetzt ihn in sein Zeichen-Backend; die Engine selbst nutzt die
//! Polylinien-Approximation für Längen, Pfeil-Unterdrückung und Hit-Tests.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stützstellen pro Kurven- bzw. Bogensegment beim Abflachen.
pub const FLATTEN_STEPS: usize = 32;

/// Einzelner Zeichenbefehl in absoluten Koordinaten.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo {
        to: Vec2,
    },
    LineTo {
        to: Vec2,
    },
    CurveTo {
        c1: Vec2,
        c2: Vec2,
        to: Vec2,
    },
    ArcTo {
        radii: Vec2,
        rotation: f32,
        large_arc: bool,
        sweep: bool,
        to: Vec2,
    },
    ClosePath,
}

/// Geordnete Befehlsfolge eines Pfades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathSpec {
    commands: Vec<PathCommand>,
}

impl PathSpec {
    /// Leerer Pfad.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, to: Vec2) -> Self {
        self.commands.push(PathCommand::MoveTo { to });
        self
    }

    pub fn line_to(mut self, to: Vec2) -> Self {
        self.commands.push(PathCommand::LineTo { to });
        self
    }

    /// Relative Linie ausgehend vom aktuellen Endpunkt.
    pub fn line_by(self, delta: Vec2) -> Self {
        let from = self.current_point().unwrap_or(Vec2::ZERO);
        self.line_to(from + delta)
    }

    pub fn curve_to(mut self, c1: Vec2, c2: Vec2, to: Vec2) -> Self {
        self.commands.push(PathCommand::CurveTo { c1, c2, to });
        self
    }

    pub fn arc_to(mut self, radius: f32, large_arc: bool, sweep: bool, to: Vec2) -> Self {
        self.commands.push(PathCommand::ArcTo {
            radii: Vec2::splat(radius),
            rotation: 0.0,
            large_arc,
            sweep,
            to,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::ClosePath);
        self
    }

    /// Hängt alle Befehle eines anderen Pfades an (neue Teilpfade).
    pub fn append(mut self, other: PathSpec) -> Self {
        self.commands.extend(other.commands);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Startpunkt des ersten Teilpfades.
    pub fn start_point(&self) -> Option<Vec2> {
        match self.commands.first()? {
            PathCommand::MoveTo { to } => Some(*to),
            _ => None,
        }
    }

    /// Aktueller Endpunkt (nach dem letzten Befehl).
    pub fn current_point(&self) -> Option<Vec2> {
        let mut current = None;
        let mut subpath_start = None;
        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo { to } => {
                    current = Some(to);
                    subpath_start = Some(to);
                }
                PathCommand::LineTo { to }
                | PathCommand::CurveTo { to, .. }
                | PathCommand::ArcTo { to, .. } => current = Some(to),
                PathCommand::ClosePath => current = subpath_start,
            }
        }
        current
    }

    /// Polylinien-Approximation, ein Eintrag pro Teilpfad.
    pub fn flatten(&self) -> Vec<Vec<Vec2>> {
        let mut polylines: Vec<Vec<Vec2>> = Vec::new();
        let mut current: Vec<Vec2> = Vec::new();
        let mut pen = Vec2::ZERO;
        let mut subpath_start = Vec2::ZERO;

        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo { to } => {
                    if current.len() > 1 {
                        polylines.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(to);
                    pen = to;
                    subpath_start = to;
                }
                PathCommand::LineTo { to } => {
                    ensure_started(&mut current, pen);
                    current.push(to);
                    pen = to;
                }
                PathCommand::CurveTo { c1, c2, to } => {
                    ensure_started(&mut current, pen);
                    for i in 1..=FLATTEN_STEPS {
                        let t = i as f32 / FLATTEN_STEPS as f32;
                        current.push(cubic_bezier(pen, c1, c2, to, t));
                    }
                    pen = to;
                }
                PathCommand::ArcTo {
                    radii,
                    rotation,
                    large_arc,
                    sweep,
                    to,
                } => {
                    ensure_started(&mut current, pen);
                    current.extend(flatten_arc(pen, radii, rotation, large_arc, sweep, to));
                    pen = to;
                }
                PathCommand::ClosePath => {
                    ensure_started(&mut current, pen);
                    current.push(subpath_start);
                    pen = subpath_start;
                }
            }
        }
        if current.len() > 1 {
            polylines.push(current);
        }
        polylines
    }

    /// Gesamtlänge aller Teilpfade.
    pub fn total_length(&self) -> f32 {
        self.flatten().iter().map(|line| polyline_length(line)).sum()
    }

    /// Punkt in gegebener Bogenlänge (über Teilpfade hinweg gezählt).
    pub fn point_at_length(&self, length: f32) -> Option<Vec2> {
        let mut remaining = length.max(0.0);
        let polylines = self.flatten();
        for line in &polylines {
            let line_len = polyline_length(line);
            if remaining <= line_len {
                return Some(point_on_polyline(line, remaining));
            }
            remaining -= line_len;
        }
        polylines.last().and_then(|line| line.last().copied())
    }

    /// Teilt jeden Teilpfad in `segments` gleich lange Abschnitte.
    ///
    /// Liefert pro Teilpfad `segments + 1` Punkte.
    pub fn sample_points(&self, segments: usize) -> Vec<Vec<Vec2>> {
        let segments = segments.max(1);
        self.flatten()
            .iter()
            .map(|line| {
                let total = polyline_length(line);
                (0..=segments)
                    .map(|i| point_on_polyline(line, total * i as f32 / segments as f32))
                    .collect()
            })
            .collect()
    }

    /// Punkt auf halber Bogenlänge (für Beschriftungen).
    pub fn midpoint(&self) -> Option<Vec2> {
        let half = self.total_length() * 0.5;
        self.point_at_length(half)
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for cmd in &self.commands {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            match *cmd {
                PathCommand::MoveTo { to } => write!(f, "M{},{}", to.x, to.y)?,
                PathCommand::LineTo { to } => write!(f, "L{},{}", to.x, to.y)?,
                PathCommand::CurveTo { c1, c2, to } => write!(
                    f,
                    "C{},{} {},{} {},{}",
                    c1.x, c1.y, c2.x, c2.y, to.x, to.y
                )?,
                PathCommand::ArcTo {
                    radii,
                    rotation,
                    large_arc,
                    sweep,
                    to,
                } => write!(
                    f,
                    "A{},{} {} {} {} {},{}",
                    radii.x,
                    radii.y,
                    rotation,
                    u8::from(large_arc),
                    u8::from(sweep),
                    to.x,
                    to.y
                )?,
                PathCommand::ClosePath => f.write_str("Z")?,
            }
        }
        Ok(())
    }
}

/// B(t) = (1-t)³·P0 + 3(1-t)²t·P1 + 3(1-t)t²·P2 + t³·P3
pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let inv = 1.0 - t;
    let inv2 = inv * inv;
    let t2 = t * t;
    inv2 * inv * p0 + 3.0 * inv2 * t * p1 + 3.0 * inv * t2 * p2 + t2 * t * p3
}

/// Länge einer Polylinie.
pub fn polyline_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

fn ensure_started(current: &mut Vec<Vec2>, pen: Vec2) {
    if current.is_empty() {
        current.push(pen);
    }
}

/// Punkt in gegebener Bogenlänge auf einer Polylinie (kumulative Längen-LUT).
fn point_on_polyline(points: &[Vec2], length: f32) -> Vec2 {
    let Some(&first) = points.first() else {
        return Vec2::ZERO;
    };
    let mut arc_lengths = Vec::with_capacity(points.len());
    let mut cumulative = 0.0f32;
    arc_lengths.push(0.0f32);
    for w in points.windows(2) {
        cumulative += w[0].distance(w[1]);
        arc_lengths.push(cumulative);
    }
    if length <= 0.0 || points.len() == 1 {
        return first;
    }

    let last = points.len() - 1;
    let idx = arc_lengths
        .partition_point(|&len| len < length)
        .min(last)
        .max(1);
    let len_before = arc_lengths[idx - 1];
    let len_after = arc_lengths[idx];
    let frac = if (len_after - len_before).abs() > f32::EPSILON {
        ((length - len_before) / (len_after - len_before)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    points[idx - 1].lerp(points[idx], frac)
}

/// Flacht einen elliptischen Bogen ab (SVG Endpunkt- zu Zentrums-Parametrisierung).
///
/// Liefert die Stützstellen ohne den Startpunkt.
fn flatten_arc(
    from: Vec2,
    radii: Vec2,
    rotation_deg: f32,
    large_arc: bool,
    sweep: bool,
    to: Vec2,
) -> Vec<Vec2> {
    let mut rx = radii.x.abs();
    let mut ry = radii.y.abs();
    if from == to {
        return Vec::new();
    }
    if rx < f32::EPSILON || ry < f32::EPSILON {
        return vec![to];
    }

    let phi = rotation_deg.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let half = (from - to) * 0.5;
    let x1p = cos_phi * half.x + sin_phi * half.y;
    let y1p = -sin_phi * half.x + cos_phi * half.y;

    // Radien vergrößern, falls der Bogen sonst nicht schließt
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let scale = lambda.sqrt();
        rx *= scale;
        ry *= scale;
    }

    let num = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
    let den = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
    let mut coef = if den.abs() < f32::EPSILON {
        0.0
    } else {
        (num / den).max(0.0).sqrt()
    };
    if large_arc == sweep {
        coef = -coef;
    }
    let cxp = coef * (rx * y1p / ry);
    let cyp = coef * -(ry * x1p / rx);

    let mid = (from + to) * 0.5;
    let center = Vec2::new(
        cos_phi * cxp - sin_phi * cyp + mid.x,
        sin_phi * cxp + cos_phi * cyp + mid.y,
    );

    let start_vec = Vec2::new((x1p - cxp) / rx, (y1p - cyp) / ry);
    let end_vec = Vec2::new((-x1p - cxp) / rx, (-y1p - cyp) / ry);
    let theta1 = start_vec.y.atan2(start_vec.x);
    let mut delta = end_vec.y.atan2(end_vec.x) - theta1;
    if sweep && delta < 0.0 {
        delta += std::f32::consts::TAU;
    } else if !sweep && delta > 0.0 {
        delta -= std::f32::consts::TAU;
    }

    (1..=FLATTEN_STEPS)
        .map(|i| {
            if i == FLATTEN_STEPS {
                return to;
            }
            let theta = theta1 + delta * i as f32 / FLATTEN_STEPS as f32;
            let (sin_t, cos_t) = theta.sin_cos();
            Vec2::new(
                center.x + rx * cos_t * cos_phi - ry * sin_t * sin_phi,
                center.y + rx * cos_t * sin_phi + ry * sin_t * cos_phi,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn straight_line_length_and_midpoint() {
        let path = PathSpec::new()
            .move_to(Vec2::new(0.0, 0.0))
            .line_to(Vec2::new(100.0, 0.0));
        assert_relative_eq!(path.total_length(), 100.0);
        let mid = path.point_at_length(50.0).expect("Punkt erwartet");
        assert_relative_eq!(mid.x, 50.0);
        assert_relative_eq!(mid.y, 0.0);
    }

    #[test]
    fn subpaths_do_not_count_the_jump() {
        let path = PathSpec::new()
            .move_to(Vec2::ZERO)
            .line_to(Vec2::new(10.0, 0.0))
            .move_to(Vec2::new(100.0, 100.0))
            .line_to(Vec2::new(100.0, 110.0));
        assert_eq!(path.flatten().len(), 2);
        assert_relative_eq!(path.total_length(), 20.0);
    }

    #[test]
    fn half_circle_arc_has_half_circumference() {
        let r = 10.0;
        let path = PathSpec::new()
            .move_to(Vec2::new(-r, 0.0))
            .arc_to(r, false, false, Vec2::new(r, 0.0));
        assert_relative_eq!(path.total_length(), std::f32::consts::PI * r, epsilon = 0.1);
    }

    #[test]
    fn closed_rect_perimeter() {
        let path = PathSpec::new()
            .move_to(Vec2::ZERO)
            .line_by(Vec2::new(10.0, 0.0))
            .line_by(Vec2::new(0.0, 5.0))
            .line_by(Vec2::new(-10.0, 0.0))
            .close();
        assert_relative_eq!(path.total_length(), 30.0);
        assert_eq!(path.current_point(), Some(Vec2::ZERO));
    }

    #[test]
    fn sample_points_are_evenly_spaced() {
        let path = PathSpec::new()
            .move_to(Vec2::ZERO)
            .line_to(Vec2::new(100.0, 0.0));
        let samples = path.sample_points(10);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].len(), 11);
        assert_relative_eq!(samples[0][3].x, 30.0, epsilon = 1e-3);
    }

    #[test]
    fn display_renders_svg_path_data() {
        let path = PathSpec::new()
            .move_to(Vec2::new(0.0, 5.0))
            .curve_to(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), Vec2::new(5.0, 6.0))
            .close();
        assert_eq!(path.to_string(), "M0,5 C1,2 3,4 5,6 Z");
    }

    #[test]
    fn cubic_bezier_endpoints() {
        let p0 = Vec2::new(0.0, 0.0);
        let p3 = Vec2::new(10.0, 0.0);
        let start = cubic_bezier(p0, Vec2::new(3.0, 5.0), Vec2::new(7.0, 5.0), p3, 0.0);
        let end = cubic_bezier(p0, Vec2::new(3.0, 5.0), Vec2::new(7.0, 5.0), p3, 1.0);
        assert_relative_eq!(start.x, p0.x);
        assert_relative_eq!(end.x, p3.x);
    }
}
