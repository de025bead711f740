use crate::error::{StyleParseError, UnitParseError};
use crate::geom::{BBox3, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sphere radius per unit of scale.
pub const SPHERE_RADIUS_FACTOR: f64 = 0.7;
/// Cylinder radius per unit of scale.
pub const CYLINDER_RADIUS_FACTOR: f64 = 0.5;
/// Cylinder height per unit of scale.
pub const CYLINDER_HEIGHT_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Box,
    Sphere,
    Cylinder,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Box, ShapeKind::Sphere, ShapeKind::Cylinder];

    pub fn default_color(self) -> &'static str {
        match self {
            ShapeKind::Box => "blue",
            ShapeKind::Sphere => "skyblue",
            ShapeKind::Cylinder => "lightgreen",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Box => "box",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cylinder => "cylinder",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Base dimensions of a shape after its scale is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeDims {
    Box { edge: f64 },
    Sphere { radius: f64 },
    Cylinder { radius: f64, height: f64 },
}

impl ShapeDims {
    pub fn of(kind: ShapeKind, scale: f64) -> Self {
        match kind {
            ShapeKind::Box => ShapeDims::Box { edge: scale },
            ShapeKind::Sphere => ShapeDims::Sphere {
                radius: SPHERE_RADIUS_FACTOR * scale,
            },
            ShapeKind::Cylinder => ShapeDims::Cylinder {
                radius: CYLINDER_RADIUS_FACTOR * scale,
                height: CYLINDER_HEIGHT_FACTOR * scale,
            },
        }
    }

    /// Half extents along x, y, z with the Y axis up.
    pub fn half_extents(&self) -> Vec3 {
        match *self {
            ShapeDims::Box { edge } => Vec3::new(edge * 0.5, edge * 0.5, edge * 0.5),
            ShapeDims::Sphere { radius } => Vec3::new(radius, radius, radius),
            ShapeDims::Cylinder { radius, height } => Vec3::new(radius, height * 0.5, radius),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub kind: ShapeKind,
    #[serde(default)]
    pub position: Vec3,
    pub scale: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ShapeRecord {
    pub fn new(kind: ShapeKind, position: Vec3, scale: f64) -> Self {
        Self {
            kind,
            position,
            scale,
            color: Some(kind.default_color().to_string()),
        }
    }

    pub fn display_color(&self) -> &str {
        self.color
            .as_deref()
            .unwrap_or_else(|| self.kind.default_color())
    }

    pub fn has_default_color(&self) -> bool {
        self.display_color() == self.kind.default_color()
    }

    pub fn dims(&self) -> ShapeDims {
        ShapeDims::of(self.kind, self.scale)
    }

    pub fn bbox(&self) -> BBox3 {
        BBox3::around(self.position, self.dims().half_extents())
    }
}

/// What the script parser can recover for one shape.
///
/// Script text carries neither placement nor colour, so turning a parsed
/// shape back into a [`ShapeRecord`] is lossy by construction: the record
/// sits at the origin and takes its kind's default colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedShape {
    pub kind: ShapeKind,
    pub scale: f64,
}

impl ParsedShape {
    pub fn new(kind: ShapeKind, scale: f64) -> Self {
        Self { kind, scale }
    }

    pub fn into_record(self) -> ShapeRecord {
        ShapeRecord::new(self.kind, Vec3::ZERO, self.scale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "mm")]
    Millimeters,
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "m")]
    Meters,
}

impl Unit {
    pub fn factor(self) -> f64 {
        match self {
            Unit::Millimeters => 1.0,
            Unit::Centimeters => 10.0,
            Unit::Meters => 1000.0,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Millimeters => "mm",
            Unit::Centimeters => "cm",
            Unit::Meters => "m",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" => Ok(Unit::Millimeters),
            "cm" => Ok(Unit::Centimeters),
            "m" => Ok(Unit::Meters),
            _ => Err(UnitParseError(s.to_string())),
        }
    }
}

/// How the generator writes each shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// Bare primitives; round-trips through the flat scanner.
    #[default]
    Solid,
    /// Hollow `difference()` blocks with `wall_thickness` walls.
    Shell,
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputStyle::Solid => f.write_str("solid"),
            OutputStyle::Shell => f.write_str("shell"),
        }
    }
}

impl FromStr for OutputStyle {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" => Ok(OutputStyle::Solid),
            "shell" => Ok(OutputStyle::Shell),
            _ => Err(StyleParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorParameters {
    pub unit: Unit,
    pub wall_thickness: f64,
    pub resolution: u32,
    pub style: OutputStyle,
}

impl Default for EditorParameters {
    fn default() -> Self {
        Self {
            unit: Unit::Millimeters,
            wall_thickness: 0.1,
            resolution: 32,
            style: OutputStyle::Solid,
        }
    }
}
