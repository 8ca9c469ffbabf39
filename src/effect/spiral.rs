use std::time::Duration;

use crate::effect::speed::SpeedCoefficient;

/// Fixed cadence of the spiral timer (~60 Hz).
pub const SPIRAL_TICK: Duration = Duration::from_millis(16);

/// Degrees advanced per tick at speed 1.
pub const SPIRAL_STEP: f32 = 5.0;

/// Base period in seconds of the overlay's spin animation.
pub const SPIRAL_SPIN_PERIOD: f32 = 5.0;

/// Start angle of the conic overlay, always in `[0, 360)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpiralAngle(f32);

impl SpiralAngle {
  pub fn degrees(self) -> f32 {
    self.0
  }

  pub fn advance(self, speed: SpeedCoefficient) -> Self {
    Self(wrap_degrees(self.0 + SPIRAL_STEP * speed.get()))
  }
}

pub fn wrap_degrees(value: f32) -> f32 {
  let wrapped = value.rem_euclid(360.0);
  // rem_euclid can round up to exactly 360 for tiny negative inputs
  if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn after(ticks: usize, speed: f32) -> f32 {
    let speed = SpeedCoefficient::new(speed);
    (0..ticks)
      .fold(SpiralAngle::default(), |angle, _| angle.advance(speed))
      .degrees()
  }

  #[test]
  fn ticks_accumulate_modulo_full_turn() {
    for (ticks, speed) in [(1, 1.0), (72, 1.0), (100, 1.0), (7, 2.5), (41, 2.5), (300, 6.0)] {
      let expected = (SPIRAL_STEP * speed * ticks as f32) % 360.0;
      assert!(
        (after(ticks, speed) - expected).abs() < 1e-3,
        "{} ticks at {}",
        ticks,
        speed
      );
    }
  }

  #[test]
  fn angle_stays_in_range() {
    let speed = SpeedCoefficient::new(5.3);
    let mut angle = SpiralAngle::default();
    for _ in 0..10_000 {
      angle = angle.advance(speed);
      assert!((0.0..360.0).contains(&angle.degrees()));
    }
  }

  #[test]
  fn wrap_handles_negative_and_exact_turns() {
    assert_eq!(wrap_degrees(360.0), 0.0);
    assert_eq!(wrap_degrees(-90.0), 270.0);
    assert_eq!(wrap_degrees(725.0), 5.0);
  }
}
