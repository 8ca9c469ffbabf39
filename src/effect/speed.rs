use std::sync::Arc;

use tokio::sync::watch;

/// Shared animation speed multiplier, always within `[MIN, MAX]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct SpeedCoefficient(f32);

impl SpeedCoefficient {
  pub const MIN: f32 = 1.0;
  pub const MAX: f32 = 6.0;

  pub fn new(value: f32) -> Self {
    if value.is_nan() {
      return Self::default();
    }
    Self(value.clamp(Self::MIN, Self::MAX))
  }

  /// `1 + energy * 5` for a normalized bass energy in `[0, 1]`.
  pub fn from_energy(energy: f32) -> Self {
    Self::new(Self::MIN + energy * (Self::MAX - Self::MIN))
  }

  pub fn get(self) -> f32 {
    self.0
  }

  /// Divide a base period by the coefficient; faster means shorter.
  pub fn scale(self, seconds: f32) -> f32 {
    seconds / self.0
  }
}

impl Default for SpeedCoefficient {
  fn default() -> Self {
    Self(Self::MIN)
  }
}

/// Single-writer cell holding the current coefficient.
#[derive(Clone)]
pub struct SpeedCell {
  tx: Arc<watch::Sender<SpeedCoefficient>>,
}

impl SpeedCell {
  pub fn new() -> Self {
    let (tx, _) = watch::channel(SpeedCoefficient::default());
    Self { tx: Arc::new(tx) }
  }

  pub fn get(&self) -> SpeedCoefficient {
    *self.tx.borrow()
  }

  /// Store a new value. Returns whether it differed from the current one;
  /// only then are subscribers woken.
  pub fn publish(&self, speed: SpeedCoefficient) -> bool {
    self.tx.send_if_modified(|current| {
      if *current == speed {
        false
      } else {
        *current = speed;
        true
      }
    })
  }

  pub fn reset(&self) {
    self.publish(SpeedCoefficient::default());
  }

  pub fn subscribe(&self) -> watch::Receiver<SpeedCoefficient> {
    self.tx.subscribe()
  }
}

impl Default for SpeedCell {
  fn default() -> Self {
    Self::new()
  }
}
