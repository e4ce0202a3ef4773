pub mod clock;
pub mod config;
pub mod curve_set;
pub mod driver;
