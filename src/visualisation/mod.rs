pub mod animation;
pub mod layers;
pub mod visualiser;
