pub mod pattern;
pub mod sparkle;
pub mod speed;
pub mod spiral;
pub mod style;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use tracing::{debug, info, trace, warn};

use crate::audio::AudioConfig;
use crate::audio::backend::AudioBackend;
use crate::audio::sampler::AudioEnergySampler;

use pattern::{PATTERN_COUNT, PatternSet, REGENERATE_PERIOD};
use sparkle::{SPARKLE_COUNT, SparkleDot};
use speed::{SpeedCell, SpeedCoefficient};
use spiral::{SPIRAL_TICK, SpiralAngle};

/// Everything the compositor needs for one frame.
#[derive(Clone, Debug)]
pub struct Frame {
  /// seconds since the effect started
  pub time: f32,
  pub speed: SpeedCoefficient,
  pub patterns: PatternSet,
  pub spiral: SpiralAngle,
  pub sparkles: Arc<[SparkleDot]>,
}

/// Shared state written by the timers and the sampler, read by the renderer.
#[derive(Clone)]
pub struct SceneState {
  pub speed: SpeedCell,
  patterns: Arc<watch::Sender<PatternSet>>,
  spiral: Arc<watch::Sender<SpiralAngle>>,
  sparkles: Arc<watch::Sender<Arc<[SparkleDot]>>>,
  started: Arc<watch::Sender<Instant>>,
}

impl SceneState {
  pub fn new() -> Self {
    Self {
      speed: SpeedCell::new(),
      patterns: Arc::new(watch::channel(PatternSet::default()).0),
      spiral: Arc::new(watch::channel(SpiralAngle::default()).0),
      sparkles: Arc::new(watch::channel(Arc::from(Vec::<SparkleDot>::new())).0),
      started: Arc::new(watch::channel(Instant::now()).0),
    }
  }

  pub fn snapshot(&self) -> Frame {
    Frame {
      time: self.started.borrow().elapsed().as_secs_f32(),
      speed: self.speed.get(),
      patterns: self.patterns.borrow().clone(),
      spiral: *self.spiral.borrow(),
      sparkles: Arc::clone(&self.sparkles.borrow()),
    }
  }

  pub fn spiral(&self) -> SpiralAngle {
    *self.spiral.borrow()
  }

  /// Back to the freshly mounted state: speed 1, angle 0, new sparkles.
  fn reset(&self, rng: &mut StdRng) {
    self.speed.reset();
    self.spiral.send_replace(SpiralAngle::default());
    let dots = sparkle::scatter(rng, SPARKLE_COUNT, self.speed.get());
    for (i, dot) in dots.iter().enumerate() {
      trace!(dot = i, "{}", dot);
    }
    self.sparkles.send_replace(Arc::from(dots));
    self.started.send_replace(Instant::now());
  }

  /// Replace the pattern set wholesale.
  fn regenerate(&self, rng: &mut StdRng) {
    let speed = self.speed.get();
    let patterns = pattern::regenerate(rng, PATTERN_COUNT, speed);
    for p in &patterns {
      trace!(layer = p.z_index, "{}", p);
    }
    self.patterns.send_modify(|set| {
      set.generation += 1;
      set.patterns = Arc::from(patterns);
    });
  }

  fn advance_spiral(&self) {
    let speed = self.speed.get();
    self.spiral.send_modify(|angle| *angle = angle.advance(speed));
  }
}

impl Default for SceneState {
  fn default() -> Self {
    Self::new()
  }
}

/// The audio-reactive effect with an explicit lifecycle. `start` acquires
/// the timers and the capture device, `stop` releases all of them.
pub struct HypnoticEffect {
  config: AudioConfig,
  state: SceneState,
  stop: Arc<AtomicBool>,
  tasks: Vec<JoinHandle<()>>,
}

impl HypnoticEffect {
  pub fn new(config: AudioConfig) -> Self {
    Self {
      config,
      state: SceneState::new(),
      stop: Arc::new(AtomicBool::new(true)),
      tasks: Vec::new(),
    }
  }

  pub fn state(&self) -> &SceneState {
    &self.state
  }

  pub fn is_running(&self) -> bool {
    !self.tasks.is_empty()
  }

  /// Must be called from within a tokio runtime.
  pub fn start<B: AudioBackend>(&mut self, backend: B) {
    if self.is_running() {
      warn!("effect already running...");
      return;
    }

    let mut rng = StdRng::from_os_rng();
    self.state.reset(&mut rng);
    self.state.regenerate(&mut rng);
    debug!("keyframes:\n{}", style::KEYFRAMES);

    self.stop = Arc::new(AtomicBool::new(false));
    self.tasks.push(tokio::spawn(pattern_timer(self.state.clone(), rng)));
    self.tasks.push(tokio::spawn(spiral_timer(self.state.clone())));

    let sampler = AudioEnergySampler::new(
      self.config.clone(),
      self.state.speed.clone(),
      Arc::clone(&self.stop),
    );
    self.tasks.push(tokio::spawn(sampler.run(backend)));

    info!("effect started...");
  }

  /// Cancel every timer and release the capture device. Safe to call twice.
  pub fn stop(&mut self) {
    if !self.is_running() {
      return;
    }
    // the capture thread watches the flag, the tasks are aborted outright
    self.stop.store(true, Ordering::Relaxed);
    for task in self.tasks.drain(..) {
      task.abort();
    }
    info!("effect stopped...");
  }
}

impl Drop for HypnoticEffect {
  fn drop(&mut self) {
    self.stop();
  }
}

fn regenerate_period(speed: SpeedCoefficient) -> Duration {
  Duration::from_secs_f32(speed.scale(REGENERATE_PERIOD))
}

/// Regenerates on a `2000 / speed` ms interval. Any speed change tears the
/// interval down, regenerates at once and starts a new one.
async fn pattern_timer(state: SceneState, mut rng: StdRng) {
  let mut speed_rx = state.speed.subscribe();
  loop {
    let period = regenerate_period(*speed_rx.borrow_and_update());
    let mut ticker = time::interval_at(time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
      tokio::select! {
        _ = ticker.tick() => state.regenerate(&mut rng),
        changed = speed_rx.changed() => {
          if changed.is_err() {
            return;
          }
          break;
        }
      }
    }

    state.regenerate(&mut rng);
  }
}

async fn spiral_timer(state: SceneState) {
  let mut ticker = time::interval_at(time::Instant::now() + SPIRAL_TICK, SPIRAL_TICK);
  ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
  loop {
    ticker.tick().await;
    state.advance_spiral();
    trace!("{}", style::spiral_css(state.spiral(), state.speed.get()));
  }
}
