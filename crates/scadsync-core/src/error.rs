use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("shape index {index} out of range (scene has {len} shapes)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("scale must be positive and finite, got {0}")]
    InvalidScale(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown unit {0:?}, expected one of: mm, cm, m")]
pub struct UnitParseError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown output style {0:?}, expected one of: solid, shell")]
pub struct StyleParseError(pub String);
