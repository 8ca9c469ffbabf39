//! Keyframe evaluation for the effect's four animations.

/// `cubic-bezier(x1, y1, x2, y2)` timing function.
#[derive(Clone, Copy, Debug)]
pub struct CubicBezier {
  x1: f32,
  y1: f32,
  x2: f32,
  y2: f32,
}

impl CubicBezier {
  pub const LINEAR: CubicBezier = CubicBezier::new(0.0, 0.0, 1.0, 1.0);
  pub const EASE_IN_OUT: CubicBezier = CubicBezier::new(0.42, 0.0, 0.58, 1.0);

  pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
    Self { x1, y1, x2, y2 }
  }

  fn sample(a1: f32, a2: f32, t: f32) -> f32 {
    // bernstein form with fixed end points 0 and 1
    let u = 1.0 - t;
    3.0 * u * u * t * a1 + 3.0 * u * t * t * a2 + t * t * t
  }

  fn slope(a1: f32, a2: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * u * u * a1 + 6.0 * u * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
  }

  /// Eased output for input progress `x` in `[0, 1]`.
  pub fn apply(&self, x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    if x == 0.0 || x == 1.0 {
      return x;
    }

    // newton first, bisection if the slope flattens out
    let mut t = x;
    for _ in 0..8 {
      let err = Self::sample(self.x1, self.x2, t) - x;
      if err.abs() < 1e-6 {
        return Self::sample(self.y1, self.y2, t);
      }
      let d = Self::slope(self.x1, self.x2, t);
      if d.abs() < 1e-6 {
        break;
      }
      t = (t - err / d).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    t = x;
    for _ in 0..32 {
      let v = Self::sample(self.x1, self.x2, t);
      if (v - x).abs() < 1e-6 {
        break;
      }
      if v < x {
        lo = t;
      } else {
        hi = t;
      }
      t = (lo + hi) * 0.5;
    }
    Self::sample(self.y1, self.y2, t)
  }
}

/// Progress through the current iteration, in `[0, 1)`. A negative delay
/// means the animation started that long before `time` zero.
pub fn progress(time: f32, period: f32, delay: f32) -> f32 {
  if period <= 0.0 {
    return 0.0;
  }
  ((time - delay) / period).rem_euclid(1.0)
}

/// Which iteration `time` falls in, counting from zero.
fn iteration(time: f32, period: f32) -> u64 {
  if period <= 0.0 || time <= 0.0 {
    return 0;
  }
  (time / period).floor() as u64
}

/// Interpolate between keyframes, easing each segment separately.
fn keyframes<const N: usize>(frames: &[(f32, [f32; N])], p: f32, easing: CubicBezier) -> [f32; N] {
  let Some(first) = frames.first() else {
    return [0.0; N];
  };
  let mut prev = first;
  for next in &frames[1..] {
    if p <= next.0 {
      let span = next.0 - prev.0;
      let local = if span > 0.0 { (p - prev.0) / span } else { 1.0 };
      let e = easing.apply(local);
      let mut out = [0.0; N];
      for (i, o) in out.iter_mut().enumerate() {
        *o = prev.1[i] + (next.1[i] - prev.1[i]) * e;
      }
      return out;
    }
    prev = next;
  }
  prev.1
}

/// `spin`: rotate 0 to 360 degrees, linear.
pub fn spin(time: f32, period: f32) -> f32 {
  360.0 * progress(time, period, 0.0)
}

/// `pulse`: scale 1 to 1.5 and back, ease-in-out, alternating direction.
pub fn pulse(time: f32, period: f32) -> f32 {
  const FRAMES: [(f32, [f32; 1]); 3] = [(0.0, [1.0]), (0.5, [1.5]), (1.0, [1.0])];
  let mut p = progress(time, period, 0.0);
  if iteration(time, period) % 2 == 1 {
    p = 1.0 - p;
  }
  keyframes(&FRAMES, p, CubicBezier::EASE_IN_OUT)[0]
}

/// `moveAround`: a diamond through four css px offsets, ease-in-out.
pub fn move_around(time: f32, period: f32) -> (f32, f32) {
  const FRAMES: [(f32, [f32; 2]); 5] = [
    (0.0, [0.0, 0.0]),
    (0.25, [100.0, 100.0]),
    (0.5, [0.0, 200.0]),
    (0.75, [-100.0, 100.0]),
    (1.0, [0.0, 0.0]),
  ];
  let [x, y] = keyframes(&FRAMES, progress(time, period, 0.0), CubicBezier::EASE_IN_OUT);
  (x, y)
}

/// `spiral`: rotate 0 to 360 degrees while growing from nothing, linear.
pub fn spiral(time: f32, period: f32, delay: f32) -> (f32, f32) {
  const FRAMES: [(f32, [f32; 2]); 2] = [(0.0, [0.0, 0.0]), (1.0, [360.0, 1.0])];
  let [angle, scale] = keyframes(&FRAMES, progress(time, period, delay), CubicBezier::LINEAR);
  (angle, scale)
}
