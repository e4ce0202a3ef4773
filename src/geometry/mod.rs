pub mod angle;
pub mod epicycloid;
