//! Scene model for primitive solids and its two-way sync with an
//! OpenSCAD-subset script, plus STL export.

pub mod analysis;
pub mod error;
pub mod generate;
pub mod geom;
pub mod mesh;
pub mod model;
pub mod parse;
pub mod report;
pub mod scene;
pub mod script;
pub mod stl;

pub use generate::generate_scad;
pub use parse::{parse_script, scan_shapes};
pub use scene::SceneModel;
pub use script::{ScriptBuffer, Workspace};
