use crate::effect::pattern::BlendMode;

/// sRGB colour, channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
  pub r: f32,
  pub g: f32,
  pub b: f32,
}

impl Rgb {
  pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
  pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

  pub const fn new(r: f32, g: f32, b: f32) -> Self {
    Self { r, g, b }
  }

  /// `hsl(hue, saturation, lightness)` with hue in degrees.
  pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
    let h = hue.rem_euclid(360.0) / 30.0;
    let a = saturation * lightness.min(1.0 - lightness);
    let f = |n: f32| {
      let k = (n + h) % 12.0;
      lightness - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0)
    };
    Self::new(f(0.0), f(8.0), f(4.0))
  }

  pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
    Rgb::new(
      self.r + (other.r - self.r) * t,
      self.g + (other.g - self.g) * t,
      self.b + (other.b - self.b) * t,
    )
  }

  pub fn to_u32(self) -> u32 {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (c(self.r) << 16) | (c(self.g) << 8) | c(self.b)
  }

  fn map2(self, other: Rgb, f: impl Fn(f32, f32) -> f32) -> Rgb {
    Rgb::new(f(self.r, other.r), f(self.g, other.g), f(self.b, other.b))
  }
}

/// Separable blend of `source` onto `backdrop`.
pub fn blend(mode: BlendMode, backdrop: Rgb, source: Rgb) -> Rgb {
  match mode {
    BlendMode::Normal => source,
    BlendMode::Difference => backdrop.map2(source, |b, s| (b - s).abs()),
    BlendMode::Screen => backdrop.map2(source, screen),
    // overlay is hard-light with the layers swapped
    BlendMode::Overlay => backdrop.map2(source, |b, s| hard_light(b, s)),
    BlendMode::ColorDodge => backdrop.map2(source, color_dodge),
    BlendMode::ColorBurn => backdrop.map2(source, color_burn),
  }
}

/// Blend then mix by opacity over an opaque backdrop.
pub fn composite(backdrop: Rgb, source: Rgb, mode: BlendMode, opacity: f32) -> Rgb {
  let blended = blend(mode, backdrop, source);
  backdrop.lerp(blended, opacity.clamp(0.0, 1.0))
}

fn screen(b: f32, s: f32) -> f32 {
  b + s - b * s
}

fn hard_light(top: f32, bottom: f32) -> f32 {
  if top <= 0.5 {
    bottom * 2.0 * top
  } else {
    screen(bottom, 2.0 * top - 1.0)
  }
}

fn color_dodge(b: f32, s: f32) -> f32 {
  if b == 0.0 {
    0.0
  } else if s >= 1.0 {
    1.0
  } else {
    (b / (1.0 - s)).min(1.0)
  }
}

fn color_burn(b: f32, s: f32) -> f32 {
  if b >= 1.0 {
    1.0
  } else if s <= 0.0 {
    0.0
  } else {
    1.0 - ((1.0 - b) / s).min(1.0)
  }
}

pub fn fill_disc(
  pixels: &mut [Rgb],
  width: usize,
  height: usize,
  (cx, cy): (f32, f32),
  radius: f32,
  color: Rgb,
  mode: BlendMode,
) {
  if radius <= 0.0 {
    return;
  }
  let x0 = (cx - radius).floor().max(0.0) as usize;
  let y0 = (cy - radius).floor().max(0.0) as usize;
  let x1 = ((cx + radius).ceil().max(0.0) as usize).min(width);
  let y1 = ((cy + radius).ceil().max(0.0) as usize).min(height);
  let r2 = radius * radius;

  for y in y0..y1 {
    for x in x0..x1 {
      let dx = x as f32 + 0.5 - cx;
      let dy = y as f32 + 0.5 - cy;
      if dx * dx + dy * dy <= r2 {
        let px = &mut pixels[y * width + x];
        *px = composite(*px, color, mode, 1.0);
      }
    }
  }
}
