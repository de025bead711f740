use crate::geom::BBox3;
use crate::model::{EditorParameters, ShapeRecord};
use crate::report::{KindCounts, SceneReport, Warning};

pub const WARN_EMPTY_SCENE: &str = "empty_scene";
pub const WARN_POSITION_NOT_ENCODED: &str = "position_not_encoded";
pub const WARN_COLOR_NOT_ENCODED: &str = "color_not_encoded";

/// Summarize a scene and flag what a trip through script text will lose.
pub fn inspect_scene(shapes: &[ShapeRecord], params: &EditorParameters) -> SceneReport {
    let mut counts = KindCounts::default();
    let mut extents = BBox3::empty();
    let mut placed = 0usize;
    let mut recolored = 0usize;

    for shape in shapes {
        counts.bump(shape.kind);
        extents = extents.union(&shape.bbox());
        if !shape.position.is_origin() {
            placed += 1;
        }
        if !shape.has_default_color() {
            recolored += 1;
        }
    }

    let mut warnings = Vec::new();
    if shapes.is_empty() {
        warnings.push(Warning {
            code: WARN_EMPTY_SCENE.to_string(),
            message: "Scene has no shapes; the generated script is empty.".to_string(),
        });
    }
    if placed > 0 {
        warnings.push(Warning {
            code: WARN_POSITION_NOT_ENCODED.to_string(),
            message: format!(
                "{placed} shape(s) are placed off the origin; script text does not encode placement and parsing resets it."
            ),
        });
    }
    if recolored > 0 {
        warnings.push(Warning {
            code: WARN_COLOR_NOT_ENCODED.to_string(),
            message: format!(
                "{recolored} shape(s) use a non-default colour; parsing reassigns kind defaults."
            ),
        });
    }

    SceneReport {
        parameters: params.clone(),
        shape_count: shapes.len(),
        counts,
        extents: if shapes.is_empty() { None } else { Some(extents) },
        warnings,
    }
}
