use crate::geom::BBox3;
use crate::model::{EditorParameters, ShapeKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KindCounts {
    #[serde(rename = "box")]
    pub boxes: usize,
    #[serde(rename = "sphere")]
    pub spheres: usize,
    #[serde(rename = "cylinder")]
    pub cylinders: usize,
}

impl KindCounts {
    pub fn bump(&mut self, kind: ShapeKind) {
        match kind {
            ShapeKind::Box => self.boxes += 1,
            ShapeKind::Sphere => self.spheres += 1,
            ShapeKind::Cylinder => self.cylinders += 1,
        }
    }

    pub fn get(&self, kind: ShapeKind) -> usize {
        match kind {
            ShapeKind::Box => self.boxes,
            ShapeKind::Sphere => self.spheres,
            ShapeKind::Cylinder => self.cylinders,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneReport {
    pub parameters: EditorParameters,
    pub shape_count: usize,
    pub counts: KindCounts,
    pub extents: Option<BBox3>,
    pub warnings: Vec<Warning>,
}

impl SceneReport {
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}
