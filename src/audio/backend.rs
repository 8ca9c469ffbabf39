use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use tokio::sync::oneshot;

use triple_buffer::Input;

#[derive(Clone)]
pub struct AudioPacket {
  /// most recent mono samples, oldest first
  pub samples: Vec<f32>,
  pub is_silent: bool,
}

impl Default for AudioPacket {
  fn default() -> Self {
    Self {
      samples: Vec::new(),
      is_silent: true,
    }
  }
}

/// Describes the device once capture is live.
#[derive(Clone, Debug)]
pub struct CaptureInfo {
  pub device: String,
  pub sample_rate: f32,
  pub channels: u16,
}

/// Every way acquiring or running the capture device can fail. The effect
/// treats all of them as "capture unavailable".
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
  #[error("no input device available")]
  NoDevice,

  #[error("microphone access denied")]
  Denied,

  #[error("failed to query input config: {0}")]
  Config(#[from] cpal::DefaultStreamConfigError),

  #[error("failed to build input stream: {0}")]
  Build(#[from] cpal::BuildStreamError),

  #[error("failed to start input stream: {0}")]
  Play(#[from] cpal::PlayStreamError),

  #[error("unsupported sample format: {0}")]
  UnsupportedFormat(String),

  #[error("capture thread failed: {0}")]
  Thread(#[from] tokio::task::JoinError),
}

/// Stop flag plus the one-shot acquisition signal.
pub struct CaptureControl {
  stop: Arc<AtomicBool>,
  acquired: Option<oneshot::Sender<CaptureInfo>>,
}

impl CaptureControl {
  /// Called once the device is streaming. Later calls are ignored.
  pub fn acquired(&mut self, info: CaptureInfo) {
    if let Some(tx) = self.acquired.take() {
      let _ = tx.send(info);
    }
  }

  pub fn is_stopped(&self) -> bool {
    self.stop.load(Ordering::Relaxed)
  }
}

/// Everything a backend needs to talk back to the sampler.
pub struct CaptureLink {
  tx: Input<AudioPacket>,
  control: CaptureControl,
}

impl CaptureLink {
  pub fn new(
    tx: Input<AudioPacket>,
    stop: Arc<AtomicBool>,
    acquired: oneshot::Sender<CaptureInfo>,
  ) -> Self {
    Self {
      tx,
      control: CaptureControl {
        stop,
        acquired: Some(acquired),
      },
    }
  }

  /// Separates the packet input, which usually moves into a device
  /// callback, from the control kept by the capture thread.
  pub fn split(self) -> (Input<AudioPacket>, CaptureControl) {
    (self.tx, self.control)
  }
}

/// A source of microphone audio. `run` holds the device until the link's
/// stop flag is raised; returning an error before `acquired` was signalled
/// means the device never became available.
#[async_trait]
pub trait AudioBackend: Send + 'static {
  async fn run(self, link: CaptureLink) -> Result<(), CaptureError>;
}

/// Rolling mono window fed from interleaved device frames.
pub struct MonoWindow {
  samples: Vec<f32>,
  head: usize,
  channels: usize,
  // partial frame carried between device callbacks
  pending_sum: f32,
  pending: usize,
}

impl MonoWindow {
  pub fn new(len: usize, channels: u16) -> Self {
    Self {
      samples: vec![0.0; len],
      head: 0,
      channels: channels.max(1) as usize,
      pending_sum: 0.0,
      pending: 0,
    }
  }

  /// Mix interleaved frames down to mono and append them.
  pub fn push_interleaved<I>(&mut self, data: I)
  where
    I: IntoIterator<Item = f32>,
  {
    let len = self.samples.len();
    if len == 0 {
      return;
    }
    for s in data {
      self.pending_sum += s;
      self.pending += 1;
      if self.pending == self.channels {
        self.samples[self.head] = self.pending_sum / self.channels as f32;
        self.head = (self.head + 1) % len;
        self.pending_sum = 0.0;
        self.pending = 0;
      }
    }
  }

  /// Copy the current window into `out`, oldest sample first. `out` keeps
  /// its capacity, so a reused buffer never reallocates.
  pub fn copy_ordered(&self, out: &mut Vec<f32>) {
    out.clear();
    out.extend_from_slice(&self.samples[self.head..]);
    out.extend_from_slice(&self.samples[..self.head]);
  }
}
