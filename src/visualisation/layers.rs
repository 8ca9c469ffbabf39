use crate::effect::pattern::{BlendMode, PatternDescriptor, RadialGradient};
use crate::effect::sparkle::{SPARKLE_SIZE, SparkleDot};
use crate::effect::speed::SpeedCoefficient;
use crate::effect::spiral::{SPIRAL_SPIN_PERIOD, SpiralAngle, wrap_degrees};

use crate::graphics::primitives::Rgb;
use crate::graphics::renderer::Renderer;

use crate::visualisation::animation;

/// Logical size of the stage in css px.
pub const VIEWPORT: (f32, f32) = (960.0, 540.0);

/// Maps buffer pixels onto css px of the stage.
#[derive(Clone, Copy, Debug)]
pub struct Space {
  sx: f32,
  sy: f32,
}

impl Space {
  pub fn new(width: usize, height: usize) -> Self {
    Self {
      sx: VIEWPORT.0 / width.max(1) as f32,
      sy: VIEWPORT.1 / height.max(1) as f32,
    }
  }

  /// Center of buffer pixel `(x, y)` in css px.
  pub fn to_css(self, x: usize, y: usize) -> (f32, f32) {
    ((x as f32 + 0.5) * self.sx, (y as f32 + 0.5) * self.sy)
  }

  pub fn to_buffer(self, (x, y): (f32, f32)) -> (f32, f32) {
    (x / self.sx, y / self.sy)
  }

  pub fn length_to_buffer(self, length: f32) -> f32 {
    length * 2.0 / (self.sx + self.sy)
  }
}

const ORIGIN: (f32, f32) = (VIEWPORT.0 * 0.5, VIEWPORT.1 * 0.5);

/// Colour of the repeating gradient at `distance` css px from its center.
pub fn repeating_radial(gradient: &RadialGradient, stops: &[Rgb; 3], distance: f32) -> Rgb {
  let inner = gradient.inner_radius.max(0.0);
  // a stop can't sit before the one preceding it
  let outer = gradient.outer_radius.max(inner);
  if outer <= 0.0 {
    return stops[0];
  }
  let u = distance.rem_euclid(outer);
  if u < inner {
    stops[0].lerp(stops[1], u / inner)
  } else if outer > inner {
    stops[1].lerp(stops[2], (u - inner) / (outer - inner))
  } else {
    stops[2]
  }
}

/// A pattern layer under its composed translate, rotate and scale.
pub fn paint_pattern(pattern: &PatternDescriptor, time: f32, space: Space, renderer: &mut Renderer) {
  let g = &pattern.gradient;
  let a = &pattern.animation;

  let (sin, cos) = animation::spin(time, a.spin).to_radians().sin_cos();
  let scale = animation::pulse(time, a.pulse);
  let (tx, ty) = animation::move_around(time, a.travel);

  let center = (g.center.0 / 100.0 * VIEWPORT.0, g.center.1 / 100.0 * VIEWPORT.1);
  let stops = g.hues.map(|h| Rgb::from_hsl(h, 1.0, 0.5));

  renderer.paint_layer(pattern.blend, pattern.opacity, |x, y| {
    let (px, py) = space.to_css(x, y);
    // back into the element's own frame
    let dx = px - ORIGIN.0 - tx;
    let dy = py - ORIGIN.1 - ty;
    let ex = (dx * cos + dy * sin) / scale + ORIGIN.0 - center.0;
    let ey = (dy * cos - dx * sin) / scale + ORIGIN.1 - center.1;
    repeating_radial(g, &stops, (ex * ex + ey * ey).sqrt())
  });
}

/// Two-tone conic overlay starting at the spiral angle.
pub fn paint_spiral(
  angle: SpiralAngle,
  speed: SpeedCoefficient,
  time: f32,
  space: Space,
  renderer: &mut Renderer,
) {
  let rotation = animation::spin(time, speed.scale(SPIRAL_SPIN_PERIOD));
  let start = angle.degrees() + rotation;

  renderer.paint_layer(BlendMode::Difference, 1.0, |x, y| {
    let (px, py) = space.to_css(x, y);
    // clockwise from twelve o'clock
    let theta = (px - ORIGIN.0).atan2(ORIGIN.1 - py).to_degrees();
    let t = wrap_degrees(theta - start) / 360.0;
    Rgb::BLACK.lerp(Rgb::WHITE, t)
  });
}

pub fn paint_sparkles(dots: &[SparkleDot], time: f32, space: Space, renderer: &mut Renderer) {
  let half = SPARKLE_SIZE * 0.5;
  for dot in dots {
    // rotation of a round dot is invisible, only the scale shows
    let (_, scale) = animation::spiral(time, dot.period, dot.delay);
    let center = (
      dot.position.0 / 100.0 * VIEWPORT.0 + half,
      dot.position.1 / 100.0 * VIEWPORT.1 + half,
    );
    renderer.fill_disc(
      space.to_buffer(center),
      space.length_to_buffer(half * scale),
      Rgb::WHITE,
      BlendMode::Normal,
    );
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::effect::pattern::AnimationDirective;

  fn gradient(inner: f32, outer: f32) -> RadialGradient {
    RadialGradient {
      center: (50.0, 50.0),
      hues: [0.0, 120.0, 240.0],
      inner_radius: inner,
      outer_radius: outer,
    }
  }

  const STOPS: [Rgb; 3] = [Rgb::new(1.0, 0.0, 0.0), Rgb::new(0.0, 1.0, 0.0), Rgb::new(0.0, 0.0, 1.0)];

  #[test]
  fn radial_stops_and_repeat() {
    let g = gradient(10.0, 20.0);
    assert_eq!(repeating_radial(&g, &STOPS, 0.0), STOPS[0]);
    assert_eq!(repeating_radial(&g, &STOPS, 10.0), STOPS[1]);
    assert_eq!(repeating_radial(&g, &STOPS, 5.0), Rgb::new(0.5, 0.5, 0.0));
    // one full period later the pattern repeats
    assert_eq!(repeating_radial(&g, &STOPS, 25.0), repeating_radial(&g, &STOPS, 5.0));
  }

  #[test]
  fn outer_stop_clamped_to_inner() {
    let g = gradient(12.0, 8.0);
    // period collapses to the inner radius, the last stop is never reached
    assert_eq!(repeating_radial(&g, &STOPS, 12.0), STOPS[0]);
    assert_eq!(repeating_radial(&g, &STOPS, 6.0), Rgb::new(0.5, 0.5, 0.0));
  }

  #[test]
  fn space_round_trips_pixel_centres() {
    let space = Space::new(96, 54);
    let css = space.to_css(10, 20);
    assert_eq!(css, (105.0, 205.0));
    assert_eq!(space.to_buffer(css), (10.5, 20.5));
    assert_eq!(space.length_to_buffer(10.0), 1.0);
  }

  #[test]
  fn spiral_seam_sits_at_twelve_o_clock() {
    let mut renderer = Renderer::new(96, 54);
    let space = Space::new(96, 54);
    paint_spiral(
      SpiralAngle::default(),
      SpeedCoefficient::default(),
      0.0,
      space,
      &mut renderer,
    );
    // just left of the seam is almost white, just right almost black
    assert!(renderer.pixel(47, 0).map(|c| c.r > 0.9).unwrap_or(false));
    assert!(renderer.pixel(48, 0).map(|c| c.r < 0.1).unwrap_or(false));
  }

  #[test]
  fn pattern_paints_colour_over_black() {
    let mut renderer = Renderer::new(48, 27);
    let pattern = PatternDescriptor {
      gradient: gradient(5.0, 20.0),
      animation: AnimationDirective {
        spin: 4.0,
        pulse: 2.0,
        travel: 12.0,
      },
      opacity: 1.0,
      blend: BlendMode::Screen,
      z_index: 0,
    };
    paint_pattern(&pattern, 0.0, Space::new(48, 27), &mut renderer);
    let lit = renderer.present().iter().filter(|&&p| p != 0).count();
    assert!(lit > 48 * 27 / 2);
  }

  #[test]
  fn sparkles_grow_from_nothing() {
    let dot = SparkleDot {
      position: (50.0, 50.0),
      period: 4.0,
      delay: 0.0,
    };
    let space = Space::new(960, 540);

    let mut renderer = Renderer::new(960, 540);
    paint_sparkles(&[dot], 0.0, space, &mut renderer);
    assert!(renderer.present().iter().all(|&p| p == 0));

    let mut renderer = Renderer::new(960, 540);
    paint_sparkles(&[dot], 3.9, space, &mut renderer);
    assert_eq!(renderer.pixel(484, 274), Some(Rgb::WHITE));
  }
}
