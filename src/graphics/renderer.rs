use crate::effect::pattern::BlendMode;

use crate::graphics::primitives::{self, Rgb};

pub struct Renderer {
  width: usize,
  height: usize,
  // working colour per pixel
  pixels: Vec<Rgb>,
  // packed 0RGB for the window
  buffer: Vec<u32>,
}

impl Renderer {
  pub fn new(width: usize, height: usize) -> Self {
    Self {
      width,
      height,
      pixels: vec![Rgb::BLACK; width * height],
      buffer: vec![0; width * height],
    }
  }

  pub fn resize(&mut self, width: usize, height: usize) {
    if self.width != width || self.height != height {
      self.width = width;
      self.height = height;
      self.pixels.resize(width * height, Rgb::BLACK);
      self.buffer.resize(width * height, 0);
    }
  }

  /// Opaque black background.
  pub fn clear(&mut self) {
    self.pixels.fill(Rgb::BLACK);
  }

  /// Composite a full-area layer, asking `shade` for the source colour of
  /// every pixel.
  pub fn paint_layer<F>(&mut self, mode: BlendMode, opacity: f32, mut shade: F)
  where
    F: FnMut(usize, usize) -> Rgb,
  {
    for y in 0..self.height {
      let row = &mut self.pixels[y * self.width..(y + 1) * self.width];
      for (x, px) in row.iter_mut().enumerate() {
        *px = primitives::composite(*px, shade(x, y), mode, opacity);
      }
    }
  }

  pub fn fill_disc(&mut self, center: (f32, f32), radius: f32, color: Rgb, mode: BlendMode) {
    primitives::fill_disc(
      &mut self.pixels,
      self.width,
      self.height,
      center,
      radius,
      color,
      mode,
    );
  }

  #[cfg(test)]
  pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
    if x < self.width && y < self.height {
      Some(self.pixels[y * self.width + x])
    } else {
      None
    }
  }

  /// Pack the working colours for display.
  pub fn present(&mut self) -> &[u32] {
    for (out, px) in self.buffer.iter_mut().zip(&self.pixels) {
      *out = px.to_u32();
    }
    &self.buffer
  }

  pub fn dimensions(&self) -> (usize, usize) {
    (self.width, self.height)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clear_then_present_is_black() {
    let mut renderer = Renderer::new(3, 2);
    renderer.paint_layer(BlendMode::Normal, 1.0, |_, _| Rgb::WHITE);
    renderer.clear();
    assert!(renderer.present().iter().all(|&p| p == 0));
  }

  #[test]
  fn paint_layer_visits_every_pixel() {
    let mut renderer = Renderer::new(4, 3);
    let mut visited = 0;
    renderer.paint_layer(BlendMode::Screen, 1.0, |_, _| {
      visited += 1;
      Rgb::WHITE
    });
    assert_eq!(visited, 12);
    assert_eq!(renderer.pixel(3, 2), Some(Rgb::WHITE));
    assert_eq!(renderer.pixel(4, 0), None);
  }

  #[test]
  fn resize_keeps_buffers_in_step() {
    let mut renderer = Renderer::new(2, 2);
    renderer.resize(5, 4);
    assert_eq!(renderer.dimensions(), (5, 4));
    assert_eq!(renderer.present().len(), 20);
  }
}
