use scadsync_core::model::{ParsedShape, ShapeKind, Unit};
use scadsync_core::parse_script;

fn assert_shapes(expected: &[(ShapeKind, f64)], actual: &[ParsedShape]) {
    assert_eq!(expected.len(), actual.len(), "got {actual:?}");
    for ((kind, scale), shape) in expected.iter().zip(actual) {
        assert_eq!(*kind, shape.kind);
        assert!((scale - shape.scale).abs() < 1e-9, "{kind}: {scale} vs {}", shape.scale);
    }
}

#[test]
fn empty_and_garbage_text_yield_no_shapes() {
    assert!(parse_script("", Unit::Millimeters).is_empty());
    assert!(parse_script("}}}{{", Unit::Millimeters).is_empty());
    assert!(parse_script("cube(", Unit::Millimeters).is_empty());
    assert!(parse_script("[1, 2, 3];", Unit::Millimeters).is_empty());
}

#[test]
fn keeps_document_order() {
    let text = "cylinder(r=1.00, h=3.00);\ncube([2.00, 2.00, 2.00]);\nsphere(r=1.40);";
    assert_shapes(
        &[
            (ShapeKind::Cylinder, 2.0),
            (ShapeKind::Box, 2.0),
            (ShapeKind::Sphere, 2.0),
        ],
        &parse_script(text, Unit::Millimeters),
    );
}

#[test]
fn reads_difference_block_as_one_shape() {
    let text = "difference() {\n    cube([1.00, 1.00, 1.00]);\n    translate([0.10, 0.10, 0.10]) cube([0.80, 0.80, 0.80]);\n}\n\
                difference() {\n    sphere(r=0.70, $fn=32);\n    sphere(r=0.60, $fn=32);\n}";
    assert_shapes(
        &[(ShapeKind::Box, 1.0), (ShapeKind::Sphere, 1.0)],
        &parse_script(text, Unit::Millimeters),
    );
}

#[test]
fn reads_inverted_shell_cutout() {
    let text = "difference() { cube([1.00, 1.00, 1.00]); translate([0.60, 0.60, 0.60]) cube([-0.20, -0.20, -0.20]); }";
    assert_shapes(&[(ShapeKind::Box, 1.0)], &parse_script(text, Unit::Millimeters));
}

#[test]
fn divides_by_unit_factor() {
    assert_shapes(
        &[(ShapeKind::Box, 1.5)],
        &parse_script("cube([15.00, 15.00, 15.00]);", Unit::Centimeters),
    );
    assert_shapes(
        &[(ShapeKind::Cylinder, 2.0)],
        &parse_script("cylinder(r=1000.00, h=3000.00);", Unit::Meters),
    );
}

#[test]
fn accepts_argument_variants() {
    let text = "cube(3);\ncube(size=[2, 4, 6]);\nsphere(d=2.8);\nsphere(0.7);\ncylinder(3, 1);\ncylinder(h=3, d=2);\ncylinder(h=3, r1=0.5, r2=0.25);";
    assert_shapes(
        &[
            (ShapeKind::Box, 3.0),
            (ShapeKind::Box, 2.0),
            (ShapeKind::Sphere, 2.0),
            (ShapeKind::Sphere, 1.0),
            (ShapeKind::Cylinder, 2.0),
            (ShapeKind::Cylinder, 2.0),
            (ShapeKind::Cylinder, 1.0),
        ],
        &parse_script(text, Unit::Millimeters),
    );
}

#[test]
fn skips_comments_and_unknown_statements() {
    let text = "// cube([9, 9, 9]);\n\
                /* sphere(r=7);\n   still a comment */\n\
                x = 5;\n\
                module m() { cube(4); }\n\
                foo bar;\n\
                translate([1, 2, 3]) cube(2);\n\
                sphere(d=2.8);";
    assert_shapes(
        &[(ShapeKind::Box, 2.0), (ShapeKind::Sphere, 2.0)],
        &parse_script(text, Unit::Millimeters),
    );
}

#[test]
fn looks_through_wrappers() {
    let text = "union() {\n  translate([1, 0, 0]) rotate([0, 90, 0]) cylinder(r=0.5, h=1.5);\n  { cube(1); }\n}";
    assert_shapes(
        &[(ShapeKind::Cylinder, 1.0), (ShapeKind::Box, 1.0)],
        &parse_script(text, Unit::Millimeters),
    );
}

#[test]
fn primitive_without_size_is_skipped() {
    assert_shapes(
        &[(ShapeKind::Box, 1.0)],
        &parse_script("sphere();\ncylinder(h=2);\ncube(1);", Unit::Millimeters),
    );
}

#[test]
fn non_positive_sizes_are_skipped() {
    let text = "cube(-2);\nsphere(r=0);\ncylinder(r=-1.00, h=3.00);\ncube([0, 0, 0]);\n\
                difference() {\n    cube(-1);\n    cube(0.5);\n}\nsphere(r=1.40);";
    assert_shapes(
        &[(ShapeKind::Sphere, 2.0)],
        &parse_script(text, Unit::Millimeters),
    );
}

#[test]
fn deep_unclosed_braces_do_not_overflow() {
    let text = "{".repeat(100_000);
    assert!(parse_script(&text, Unit::Millimeters).is_empty());
}

#[test]
fn deep_vector_nesting_does_not_overflow() {
    let text = format!("cube({});\nsphere(r=1.40);", "[".repeat(100_000));
    assert!(parse_script(&text, Unit::Millimeters).is_empty());

    let text = format!("cylinder(r=1.00, h=3.00);\ncube({});", "[".repeat(100_000));
    assert_shapes(
        &[(ShapeKind::Cylinder, 2.0)],
        &parse_script(&text, Unit::Millimeters),
    );
}

#[test]
fn deep_call_chains_do_not_overflow() {
    let text = format!("{}cube(1);", "translate([0, 0, 0]) ".repeat(50_000));
    assert!(parse_script(&text, Unit::Millimeters).is_empty());
}

#[test]
fn moderate_nesting_still_parses() {
    let text = format!("{}cube(1);{}", "{".repeat(100), "}".repeat(100));
    assert_shapes(&[(ShapeKind::Box, 1.0)], &parse_script(&text, Unit::Millimeters));

    let text = format!("{}cube(2);", "rotate([0, 0, 0]) ".repeat(100));
    assert_shapes(&[(ShapeKind::Box, 2.0)], &parse_script(&text, Unit::Millimeters));
}
