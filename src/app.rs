use minifb::{Key, Scale, ScaleMode, Window, WindowOptions};

use tokio::time::{self, Duration, MissedTickBehavior};

use crate::audio::AudioConfig;
use crate::audio::microphone::MicrophoneBackend;

use crate::effect::HypnoticEffect;

use crate::graphics::renderer::Renderer;

use crate::visualisation::visualiser::Visualiser;

// window size; the stage is rendered at half resolution and stretched
const DEFAULT_WIDTH: usize = 960;
const DEFAULT_HEIGHT: usize = 540;
const RENDER_DIVISOR: usize = 2;

const FRAME_PERIOD: Duration = Duration::from_micros(16_667);

pub struct App {
  config: AudioConfig,
  window: Window,
  renderer: Renderer,
  visualiser: Visualiser,
  effect: HypnoticEffect,
}

impl App {
  pub fn new(config: AudioConfig) -> Result<Self, anyhow::Error> {
    // create window
    let window_options = WindowOptions {
      resize: true,
      scale: Scale::X2,
      scale_mode: ScaleMode::Stretch,
      ..Default::default()
    };
    let window = Window::new(
      "hypnotic",
      DEFAULT_WIDTH / RENDER_DIVISOR,
      DEFAULT_HEIGHT / RENDER_DIVISOR,
      window_options,
    )?;

    let renderer = Renderer::new(DEFAULT_WIDTH / RENDER_DIVISOR, DEFAULT_HEIGHT / RENDER_DIVISOR);

    Ok(Self {
      window,
      renderer,
      visualiser: Visualiser::new(),
      effect: HypnoticEffect::new(config.clone()),
      config,
    })
  }

  pub async fn run(&mut self) -> Result<(), anyhow::Error> {
    self
      .effect
      .start(MicrophoneBackend::new(self.config.clone()));

    let mut frames = time::interval(FRAME_PERIOD);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while self.window.is_open() && !self.window.is_key_down(Key::Escape) {
      // wait for the next frame, letting the timers and sampler run
      frames.tick().await;
      // observe current window size...
      let (width, height) = self.window.get_size();
      self.resize(width, height);
      // snapshot shared state and render a frame...
      let frame = self.effect.state().snapshot();
      self.visualiser.render(&frame, &mut self.renderer);
      let (w, h) = self.renderer.dimensions();
      self.window.update_with_buffer(self.renderer.present(), w, h)?;
    }

    self.effect.stop();
    Ok(())
  }

  fn resize(&mut self, width: usize, height: usize) {
    let width = (width / RENDER_DIVISOR).max(1);
    let height = (height / RENDER_DIVISOR).max(1);
    self.renderer.resize(width, height);
  }
}

impl Drop for App {
  fn drop(&mut self) {
    self.effect.stop();
  }
}
