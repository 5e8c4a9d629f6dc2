pub mod coordinate;
pub mod geometry;
pub mod image;
