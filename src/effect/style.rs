//! Declarative style text for the effect's layers, in CSS property syntax.
//! The compositor evaluates the same descriptors directly; this is what a
//! stylesheet-driven host would be handed.

use std::fmt::{self, Display, Formatter};

use crate::effect::pattern::{BlendMode, PatternDescriptor};
use crate::effect::sparkle::{SPARKLE_SIZE, SparkleDot};
use crate::effect::speed::SpeedCoefficient;
use crate::effect::spiral::{SPIRAL_SPIN_PERIOD, SpiralAngle};

pub const KEYFRAMES: &str = "\
@keyframes spin {
  0% { transform: rotate(0deg); }
  100% { transform: rotate(360deg); }
}
@keyframes pulse {
  0%, 100% { transform: scale(1); }
  50% { transform: scale(1.5); }
}
@keyframes moveAround {
  0%, 100% { transform: translate(0, 0); }
  25% { transform: translate(100px, 100px); }
  50% { transform: translate(0, 200px); }
  75% { transform: translate(-100px, 100px); }
}
@keyframes spiral {
  0% { transform: rotate(0deg) scale(0); }
  100% { transform: rotate(360deg) scale(1); }
}
";

struct Hsl(f32);

impl Display for Hsl {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "hsl({:.1}, 100%, 50%)", self.0)
  }
}

impl Display for BlendMode {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Display for PatternDescriptor {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let g = &self.gradient;
    let a = &self.animation;
    write!(
      f,
      "background: repeating-radial-gradient(circle at {:.2}% {:.2}%, {}, {} {:.2}px, {} {:.2}px); ",
      g.center.0,
      g.center.1,
      Hsl(g.hues[0]),
      Hsl(g.hues[1]),
      g.inner_radius,
      Hsl(g.hues[2]),
      g.outer_radius,
    )?;
    write!(
      f,
      "animation: spin {:.3}s linear infinite, pulse {:.3}s ease-in-out infinite alternate, \
       moveAround {:.3}s ease-in-out infinite; ",
      a.spin, a.pulse, a.travel,
    )?;
    write!(
      f,
      "opacity: {:.3}; mix-blend-mode: {}; z-index: {};",
      self.opacity, self.blend, self.z_index
    )
  }
}

/// Style of the rotating conic overlay.
pub fn spiral_css(angle: SpiralAngle, speed: SpeedCoefficient) -> String {
  format!(
    "background: conic-gradient(from {:.1}deg, black, white); \
     animation: spin {:.3}s linear infinite; mix-blend-mode: {};",
    angle.degrees(),
    speed.scale(SPIRAL_SPIN_PERIOD),
    BlendMode::Difference,
  )
}

impl Display for SparkleDot {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "left: {:.2}%; top: {:.2}%; width: {}px; height: {}px; border-radius: 50%; \
       background: white; animation: spiral {:.3}s linear infinite; animation-delay: {:.3}s;",
      self.position.0, self.position.1, SPARKLE_SIZE, SPARKLE_SIZE, self.period, self.delay,
    )
  }
}
