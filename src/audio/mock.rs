//! Capture backends for tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::backend::{AudioBackend, AudioPacket, CaptureError, CaptureInfo, CaptureLink};

const PACKET_INTERVAL: Duration = Duration::from_millis(5);

/// Refuses access, like a user declining the permission prompt.
pub struct DeniedBackend;

#[async_trait]
impl AudioBackend for DeniedBackend {
  async fn run(self, _link: CaptureLink) -> Result<(), CaptureError> {
    Err(CaptureError::Denied)
  }
}

const SAMPLE_RATE: f32 = 44_100.0;

/// Streams a fixed packet until stopped and flags when the "device" is let go.
pub struct LoopBackend {
  packet: AudioPacket,
  released: Arc<AtomicBool>,
}

impl LoopBackend {
  pub fn new(samples: Vec<f32>) -> Self {
    let is_silent = samples.iter().all(|s| *s == 0.0);
    Self {
      packet: AudioPacket { samples, is_silent },
      released: Arc::new(AtomicBool::new(false)),
    }
  }

  pub fn released(&self) -> Arc<AtomicBool> {
    Arc::clone(&self.released)
  }
}

#[async_trait]
impl AudioBackend for LoopBackend {
  async fn run(self, link: CaptureLink) -> Result<(), CaptureError> {
    let (mut tx, mut control) = link.split();
    control.acquired(CaptureInfo {
      device: "mock".into(),
      sample_rate: SAMPLE_RATE,
      channels: 1,
    });
    while !control.is_stopped() {
      tx.write(self.packet.clone());
      tokio::time::sleep(PACKET_INTERVAL).await;
    }
    self.released.store(true, Ordering::Relaxed);
    Ok(())
  }
}

impl LoopBackend {
  pub fn silent(len: usize) -> Self {
    Self::new(vec![0.0; len])
  }

  /// Broadband noise far above the analyser's decibel ceiling.
  pub fn loud(len: usize) -> Self {
    let mut rng = StdRng::seed_from_u64(11);
    Self::new((0..len).map(|_| rng.random_range(-1000.0..1000.0)).collect())
  }
}
