use std::sync::Arc;

use rand::Rng;

use crate::effect::speed::SpeedCoefficient;

pub const PATTERN_COUNT: usize = 10;

/// Base period in seconds between regenerations, before speed scaling.
pub const REGENERATE_PERIOD: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
  Normal,
  Difference,
  Screen,
  Overlay,
  ColorDodge,
  ColorBurn,
}

impl BlendMode {
  /// Modes a pattern layer may draw.
  pub const PATTERN_MODES: [BlendMode; 5] = [
    BlendMode::Difference,
    BlendMode::Screen,
    BlendMode::Overlay,
    BlendMode::ColorDodge,
    BlendMode::ColorBurn,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      BlendMode::Normal => "normal",
      BlendMode::Difference => "difference",
      BlendMode::Screen => "screen",
      BlendMode::Overlay => "overlay",
      BlendMode::ColorDodge => "color-dodge",
      BlendMode::ColorBurn => "color-burn",
    }
  }
}

/// Repeating radial gradient: `hues[0]` at the center, `hues[1]` at
/// `inner_radius`, `hues[2]` at `outer_radius`, then repeat.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
  /// percent of the viewport
  pub center: (f32, f32),
  /// degrees, full saturation and half lightness
  pub hues: [f32; 3],
  /// css px
  pub inner_radius: f32,
  /// css px
  pub outer_radius: f32,
}

/// Periods in seconds of the three keyframe animations a layer runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationDirective {
  pub spin: f32,
  pub pulse: f32,
  pub travel: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternDescriptor {
  pub gradient: RadialGradient,
  pub animation: AnimationDirective,
  pub opacity: f32,
  pub blend: BlendMode,
  pub z_index: usize,
}

/// One regeneration's output.
#[derive(Clone, Debug, Default)]
pub struct PatternSet {
  pub generation: u64,
  pub patterns: Arc<[PatternDescriptor]>,
}

/// Draw `count` fresh descriptors. Nothing carries over between calls.
pub fn regenerate<R: Rng + ?Sized>(
  rng: &mut R,
  count: usize,
  speed: SpeedCoefficient,
) -> Vec<PatternDescriptor> {
  (0..count).map(|i| generate(rng, i, speed)).collect()
}

fn generate<R: Rng + ?Sized>(rng: &mut R, z_index: usize, speed: SpeedCoefficient) -> PatternDescriptor {
  let center = (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0));
  let hues = [random_hue(rng), random_hue(rng), random_hue(rng)];
  let inner_radius = rng.random_range(5.0..15.0);
  let outer_radius = rng.random_range(10.0..30.0);

  let animation = AnimationDirective {
    spin: speed.scale(rng.random_range(3.0..10.0)),
    pulse: speed.scale(rng.random_range(1.0..3.0)),
    travel: speed.scale(rng.random_range(10.0..30.0)),
  };

  let opacity = rng.random_range(0.7..=1.0);
  let blend = BlendMode::PATTERN_MODES[rng.random_range(0..BlendMode::PATTERN_MODES.len())];

  PatternDescriptor {
    gradient: RadialGradient {
      center,
      hues,
      inner_radius,
      outer_radius,
    },
    animation,
    opacity,
    blend,
    z_index,
  }
}

fn random_hue<R: Rng + ?Sized>(rng: &mut R) -> f32 {
  rng.random_range(0.0..360.0)
}

#[cfg(test)]
mod tests {
  use super::*;

  use rand::SeedableRng;
  use rand::rngs::StdRng;

  #[test]
  fn produces_exactly_count() {
    let mut rng = StdRng::seed_from_u64(1);
    let patterns = regenerate(&mut rng, PATTERN_COUNT, SpeedCoefficient::default());
    assert_eq!(patterns.len(), 10);
    for (i, p) in patterns.iter().enumerate() {
      assert_eq!(p.z_index, i);
    }
  }

  #[test]
  fn fields_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..50 {
      for p in regenerate(&mut rng, PATTERN_COUNT, SpeedCoefficient::new(2.5)) {
        assert!((0.7..=1.0).contains(&p.opacity));
        assert!(BlendMode::PATTERN_MODES.contains(&p.blend));
        for hue in p.gradient.hues {
          assert!((0.0..360.0).contains(&hue));
        }
        assert!((0.0..100.0).contains(&p.gradient.center.0));
        assert!((0.0..100.0).contains(&p.gradient.center.1));
        assert!((5.0..15.0).contains(&p.gradient.inner_radius));
        assert!((10.0..30.0).contains(&p.gradient.outer_radius));
      }
    }
  }

  #[test]
  fn periods_shrink_with_speed() {
    let mut rng = StdRng::seed_from_u64(3);
    let slow = regenerate(&mut rng, 200, SpeedCoefficient::new(1.0));
    let fast = regenerate(&mut rng, 200, SpeedCoefficient::new(6.0));
    for p in &slow {
      assert!((3.0..10.0).contains(&p.animation.spin));
      assert!((1.0..3.0).contains(&p.animation.pulse));
      assert!((10.0..30.0).contains(&p.animation.travel));
    }
    for p in &fast {
      assert!((0.5..10.0 / 6.0).contains(&p.animation.spin));
      assert!((1.0 / 6.0..0.5).contains(&p.animation.pulse));
      assert!((10.0 / 6.0..5.0).contains(&p.animation.travel));
    }
  }

  #[test]
  fn successive_calls_are_independent() {
    let mut rng = StdRng::seed_from_u64(4);
    let a = regenerate(&mut rng, PATTERN_COUNT, SpeedCoefficient::default());
    let b = regenerate(&mut rng, PATTERN_COUNT, SpeedCoefficient::default());
    assert_ne!(a, b);
  }

  #[test]
  fn every_pattern_mode_shows_up() {
    let mut rng = StdRng::seed_from_u64(5);
    let patterns = regenerate(&mut rng, 500, SpeedCoefficient::default());
    for mode in BlendMode::PATTERN_MODES {
      assert!(patterns.iter().any(|p| p.blend == mode));
    }
  }
}
