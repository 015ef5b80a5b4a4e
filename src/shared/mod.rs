//! Geteilte Typen zwischen Layout, Interaktion und Host:
//! Optionen, Pfadbeschreibung, Geometrie-Bausteine und Zeichen-Vertrag.

pub mod draw;
pub mod geometry;
pub mod options;
pub mod path_spec;

pub use draw::{
    AnimationToken, ArrowHead, DrawCall, Easing, PathAttributes, PathId, TextAttributes,
};
pub use geometry::{ArrowFacing, ListCurve, Rect};
pub use options::ViewOptions;
pub use path_spec::{PathCommand, PathSpec};
