use crate::effect::Frame;
use crate::effect::pattern::PatternDescriptor;

use crate::graphics::renderer::Renderer;

use crate::visualisation::layers::{self, Space};

/// One painted element of the stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Layer<'a> {
  Pattern(&'a PatternDescriptor),
  Spiral,
  Sparkles,
}

impl Layer<'_> {
  fn z_index(&self) -> usize {
    match self {
      Layer::Pattern(p) => p.z_index,
      // unindexed elements stack with index zero
      Layer::Spiral | Layer::Sparkles => 0,
    }
  }
}

/// Document order, then stably sorted by stacking index: pattern 0, the
/// overlay and the sparkles share level zero, patterns 1.. go on top.
pub fn stacking_order(frame: &Frame) -> Vec<Layer<'_>> {
  let mut order: Vec<Layer<'_>> = frame.patterns.patterns.iter().map(Layer::Pattern).collect();
  order.push(Layer::Spiral);
  order.push(Layer::Sparkles);
  order.sort_by_key(|layer| layer.z_index());
  order
}

#[derive(Default)]
pub struct Visualiser;

impl Visualiser {
  pub fn new() -> Self {
    Self
  }

  pub fn render(&self, frame: &Frame, renderer: &mut Renderer) {
    let (width, height) = renderer.dimensions();
    let space = Space::new(width, height);

    renderer.clear();
    for layer in stacking_order(frame) {
      match layer {
        Layer::Pattern(p) => layers::paint_pattern(p, frame.time, space, renderer),
        Layer::Spiral => layers::paint_spiral(frame.spiral, frame.speed, frame.time, space, renderer),
        Layer::Sparkles => layers::paint_sparkles(&frame.sparkles, frame.time, space, renderer),
      }
    }
  }
}
