use scadsync_core::geom::Vec3;
use scadsync_core::model::{EditorParameters, OutputStyle, ShapeKind, ShapeRecord, Unit};
use scadsync_core::{generate_scad, parse_script, scan_shapes};

const TOLERANCE: f64 = 0.01 + 1e-9;

fn scales() -> impl Iterator<Item = f64> {
    (1..=200).map(|i| i as f64 * 0.05)
}

#[test]
fn solid_output_scans_back_to_the_same_scale() {
    let params = EditorParameters::default();
    for kind in ShapeKind::ALL {
        for scale in scales() {
            let text = generate_scad(&[ShapeRecord::new(kind, Vec3::ZERO, scale)], &params);
            let parsed = scan_shapes(&text);
            assert_eq!(1, parsed.len(), "{text}");
            assert_eq!(kind, parsed[0].kind);
            assert!(
                (parsed[0].scale - scale).abs() <= TOLERANCE,
                "{kind} {scale}: {text} -> {}",
                parsed[0].scale
            );
        }
    }
}

#[test]
fn both_styles_parse_back_in_every_unit() {
    for style in [OutputStyle::Solid, OutputStyle::Shell] {
        for unit in [Unit::Millimeters, Unit::Centimeters, Unit::Meters] {
            let params = EditorParameters {
                unit,
                style,
                ..EditorParameters::default()
            };
            for kind in ShapeKind::ALL {
                for scale in [0.2, 0.75, 1.0, 2.37, 10.0] {
                    let text =
                        generate_scad(&[ShapeRecord::new(kind, Vec3::ZERO, scale)], &params);
                    let parsed = parse_script(&text, unit);
                    assert_eq!(1, parsed.len(), "{text}");
                    assert_eq!(kind, parsed[0].kind);
                    assert!(
                        (parsed[0].scale - scale).abs() <= TOLERANCE,
                        "{style} {unit} {kind} {scale}: {}",
                        parsed[0].scale
                    );
                }
            }
        }
    }
}

#[test]
fn multi_shape_shell_scene_keeps_order() {
    let params = EditorParameters {
        style: OutputStyle::Shell,
        ..EditorParameters::default()
    };
    let shapes = vec![
        ShapeRecord::new(ShapeKind::Sphere, Vec3::new(1.0, 0.0, 1.0), 1.2),
        ShapeRecord::new(ShapeKind::Box, Vec3::ZERO, 0.8),
        ShapeRecord::new(ShapeKind::Cylinder, Vec3::ZERO, 2.0),
        ShapeRecord::new(ShapeKind::Box, Vec3::ZERO, 3.0),
    ];
    let parsed = parse_script(&generate_scad(&shapes, &params), params.unit);
    let kinds: Vec<ShapeKind> = parsed.iter().map(|p| p.kind).collect();
    assert_eq!(
        vec![
            ShapeKind::Sphere,
            ShapeKind::Box,
            ShapeKind::Cylinder,
            ShapeKind::Box
        ],
        kinds
    );
    for (shape, p) in shapes.iter().zip(&parsed) {
        assert!((shape.scale - p.scale).abs() <= TOLERANCE);
    }
}
