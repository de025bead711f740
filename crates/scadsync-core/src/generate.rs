use crate::model::{
    EditorParameters, OutputStyle, ShapeKind, ShapeRecord, CYLINDER_HEIGHT_FACTOR,
    CYLINDER_RADIUS_FACTOR, SPHERE_RADIUS_FACTOR,
};
use std::fmt::Write as _;

const INDENT: &str = "    ";

/// Render the scene as script text, one block per shape in list order.
///
/// Placement is never written: the supported grammar has no statement for
/// it. Wall thickness is not checked against the shape size, so a thick wall
/// produces well-formed text describing an inverted inner cutout.
pub fn generate_scad(shapes: &[ShapeRecord], params: &EditorParameters) -> String {
    let blocks: Vec<String> = shapes
        .iter()
        .map(|shape| match params.style {
            OutputStyle::Solid => solid_block(shape, params),
            OutputStyle::Shell => shell_block(shape, params),
        })
        .collect();
    tracing::debug!(
        shapes = shapes.len(),
        style = %params.style,
        unit = %params.unit,
        "generated script"
    );
    blocks.join("\n")
}

fn solid_block(shape: &ShapeRecord, params: &EditorParameters) -> String {
    let f = params.unit.factor();
    let s = shape.scale;
    match shape.kind {
        ShapeKind::Box => format!("{};", cube(s * f)),
        ShapeKind::Sphere => format!("sphere(r={});", num(SPHERE_RADIUS_FACTOR * s * f)),
        ShapeKind::Cylinder => format!(
            "cylinder(r={}, h={});",
            num(CYLINDER_RADIUS_FACTOR * s * f),
            num(CYLINDER_HEIGHT_FACTOR * s * f)
        ),
    }
}

fn shell_block(shape: &ShapeRecord, params: &EditorParameters) -> String {
    let f = params.unit.factor();
    let s = shape.scale;
    let w = params.wall_thickness;
    let n = params.resolution;

    let (outer, inner) = match shape.kind {
        ShapeKind::Box => {
            let inset = num(w * f);
            (
                cube(s * f),
                format!(
                    "translate([{inset}, {inset}, {inset}]) {}",
                    cube((s - 2.0 * w) * f)
                ),
            )
        }
        ShapeKind::Sphere => {
            let r = SPHERE_RADIUS_FACTOR * s;
            (
                format!("sphere(r={}, $fn={n})", num(r * f)),
                format!("sphere(r={}, $fn={n})", num((r - w) * f)),
            )
        }
        ShapeKind::Cylinder => {
            let r = CYLINDER_RADIUS_FACTOR * s;
            let h = num(CYLINDER_HEIGHT_FACTOR * s * f);
            (
                format!("cylinder(r={}, h={h}, $fn={n})", num(r * f)),
                format!("cylinder(r={}, h={h}, $fn={n})", num((r - w) * f)),
            )
        }
    };

    let mut out = String::new();
    let _ = writeln!(out, "difference() {{");
    let _ = writeln!(out, "{INDENT}{outer};");
    let _ = writeln!(out, "{INDENT}{inner};");
    let _ = write!(out, "}}");
    out
}

fn cube(edge: f64) -> String {
    let e = num(edge);
    format!("cube([{e}, {e}, {e}])")
}

/// Two-decimal literal; never prints `-0.00`, NaN or infinities.
pub(crate) fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0.00".to_string();
    }
    let s = format!("{v:.2}");
    if s == "-0.00" {
        "0.00".to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::num;

    #[test]
    fn formats_two_decimals() {
        assert_eq!("1.00", num(1.0));
        assert_eq!("0.35", num(0.35000001));
        assert_eq!("-0.20", num(-0.2));
        assert_eq!("1500.00", num(1500.0));
    }

    #[test]
    fn normalizes_negative_zero_and_non_finite() {
        assert_eq!("0.00", num(-0.0));
        assert_eq!("0.00", num(-0.001));
        assert_eq!("0.00", num(f64::NAN));
        assert_eq!("0.00", num(f64::INFINITY));
    }
}
