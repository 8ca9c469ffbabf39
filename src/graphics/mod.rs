pub mod primitives;
pub mod renderer;
