use scadsync_core::error::{StyleParseError, UnitParseError};
use scadsync_core::model::{EditorParameters, OutputStyle, ShapeDims, ShapeKind, Unit};

#[test]
fn units_parse_and_carry_fixed_factors() {
    assert_eq!(Ok(Unit::Millimeters), "mm".parse());
    assert_eq!(Ok(Unit::Centimeters), " CM ".parse());
    assert_eq!(Ok(Unit::Meters), "m".parse());
    assert_eq!(
        Err(UnitParseError("inch".to_string())),
        "inch".parse::<Unit>()
    );
    assert_eq!(1.0, Unit::Millimeters.factor());
    assert_eq!(10.0, Unit::Centimeters.factor());
    assert_eq!(1000.0, Unit::Meters.factor());
    for unit in [Unit::Millimeters, Unit::Centimeters, Unit::Meters] {
        assert_eq!(Ok(unit), unit.to_string().parse());
    }
}

#[test]
fn output_style_parses() {
    assert_eq!(Ok(OutputStyle::Shell), "shell".parse());
    assert_eq!(Ok(OutputStyle::Solid), "Solid".parse());
    assert_eq!(
        Err(StyleParseError("hollow".to_string())),
        "hollow".parse::<OutputStyle>()
    );
}

#[test]
fn default_parameters() {
    let p = EditorParameters::default();
    assert_eq!(Unit::Millimeters, p.unit);
    assert_eq!(OutputStyle::Solid, p.style);
    assert_eq!(32, p.resolution);
    assert!(p.wall_thickness > 0.0);
}

#[test]
fn base_sizes_follow_scale() {
    assert_eq!(ShapeDims::Box { edge: 2.0 }, ShapeDims::of(ShapeKind::Box, 2.0));
    match ShapeDims::of(ShapeKind::Sphere, 2.0) {
        ShapeDims::Sphere { radius } => assert!((radius - 1.4).abs() < 1e-12),
        other => panic!("unexpected {other:?}"),
    }
    match ShapeDims::of(ShapeKind::Cylinder, 2.0) {
        ShapeDims::Cylinder { radius, height } => {
            assert!((radius - 1.0).abs() < 1e-12);
            assert!((height - 3.0).abs() < 1e-12);
        }
        other => panic!("unexpected {other:?}"),
    }
}
