pub mod color;
pub mod document;
pub mod node;
pub mod transform;
