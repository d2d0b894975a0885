pub mod document;
pub mod error;

pub use document::{
    ActionLayer, ActionSet, ControllerMappings, Group, JsonMap, LayoutDocument, Preset, RuntimeId,
};
pub use error::{LayoutError, Result};
