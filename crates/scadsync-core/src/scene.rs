use crate::error::SceneError;
use crate::geom::Vec3;
use crate::model::{ParsedShape, ShapeKind, ShapeRecord};

/// Ordered shape list plus the editor-only selection and drag state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneModel {
    shapes: Vec<ShapeRecord>,
    selected: Option<usize>,
    dragged: Option<usize>,
}

impl SceneModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scene holding a single unit box at the origin, the editor's
    /// starting state.
    pub fn with_default_shape() -> Self {
        Self::from_shapes(vec![ShapeRecord::new(ShapeKind::Box, Vec3::ZERO, 1.0)])
    }

    pub fn from_shapes(shapes: Vec<ShapeRecord>) -> Self {
        Self {
            shapes,
            selected: None,
            dragged: None,
        }
    }

    pub fn shapes(&self) -> &[ShapeRecord] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ShapeRecord> {
        self.shapes.get(index)
    }

    /// Append a unit-scale shape at the default placement for its slot and
    /// return its index.
    pub fn add_shape(&mut self, kind: ShapeKind) -> usize {
        let index = self.shapes.len();
        self.shapes
            .push(ShapeRecord::new(kind, default_placement(index), 1.0));
        tracing::debug!(index, kind = %kind, "added shape");
        index
    }

    pub fn set_scale(&mut self, index: usize, scale: f64) -> Result<(), SceneError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(SceneError::InvalidScale(scale));
        }
        self.shape_mut(index)?.scale = scale;
        Ok(())
    }

    pub fn set_position(&mut self, index: usize, position: Vec3) -> Result<(), SceneError> {
        self.shape_mut(index)?.position = position;
        Ok(())
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_shape(&self) -> Option<&ShapeRecord> {
        self.selected.and_then(|i| self.shapes.get(i))
    }

    /// Select one shape, or clear the selection with `None`.
    pub fn select(&mut self, index: Option<usize>) -> Result<(), SceneError> {
        if let Some(i) = index {
            self.check_index(i)?;
        }
        self.selected = index;
        Ok(())
    }

    pub fn dragged(&self) -> Option<usize> {
        self.dragged
    }

    pub fn begin_drag(&mut self, index: usize) -> Result<(), SceneError> {
        self.check_index(index)?;
        self.dragged = Some(index);
        Ok(())
    }

    /// Move the shape under the pointer to `point`, projected onto the XZ
    /// ground plane. Returns `false` when `index` is not being dragged.
    pub fn drag_to(&mut self, index: usize, point: Vec3) -> bool {
        if self.dragged != Some(index) {
            return false;
        }
        match self.shapes.get_mut(index) {
            Some(shape) => {
                shape.position = Vec3::new(point.x, 0.0, point.z);
                true
            }
            None => false,
        }
    }

    pub fn end_drag(&mut self) {
        self.dragged = None;
    }

    /// Replace every shape with the parser's output.
    ///
    /// Positions reset to the origin and colours to the kind defaults, since
    /// script text carries neither. Shapes whose scale is not positive are
    /// left out. Selection and drag state are cleared.
    pub fn replace_from_parsed(&mut self, parsed: Vec<ParsedShape>) {
        let total = parsed.len();
        self.shapes = parsed
            .into_iter()
            .filter(|p| p.scale.is_finite() && p.scale > 0.0)
            .map(ParsedShape::into_record)
            .collect();
        if self.shapes.len() < total {
            tracing::debug!(
                dropped = total - self.shapes.len(),
                "parsed shapes without a positive scale"
            );
        }
        self.selected = None;
        self.dragged = None;
    }

    fn check_index(&self, index: usize) -> Result<(), SceneError> {
        if index < self.shapes.len() {
            Ok(())
        } else {
            Err(SceneError::IndexOutOfRange {
                index,
                len: self.shapes.len(),
            })
        }
    }

    fn shape_mut(&mut self, index: usize) -> Result<&mut ShapeRecord, SceneError> {
        let len = self.shapes.len();
        self.shapes
            .get_mut(index)
            .ok_or(SceneError::IndexOutOfRange { index, len })
    }
}

/// Spread new shapes over a 3x3 grid in [-1, 1] on the ground plane.
pub fn default_placement(index: usize) -> Vec3 {
    let col = (index % 3) as f64 - 1.0;
    let row = ((index / 3) % 3) as f64 - 1.0;
    Vec3::new(col, 0.0, row)
}
