use rand::Rng;

use crate::effect::speed::SpeedCoefficient;

pub const SPARKLE_COUNT: usize = 100;

/// css px
pub const SPARKLE_SIZE: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SparkleDot {
  /// percent of the viewport, top-left corner of the dot
  pub position: (f32, f32),
  /// seconds, fixed at creation
  pub period: f32,
  /// seconds, never positive so dots start mid-animation
  pub delay: f32,
}

/// Generated once per mount. The stored periods use the coefficient at
/// creation and are not rescaled later.
pub fn scatter<R: Rng + ?Sized>(rng: &mut R, count: usize, speed: SpeedCoefficient) -> Vec<SparkleDot> {
  (0..count)
    .map(|_| SparkleDot {
      position: (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)),
      period: speed.scale(rng.random_range(2.0..10.0)),
      delay: -rng.random_range(0.0..8.0),
    })
    .collect()
}
