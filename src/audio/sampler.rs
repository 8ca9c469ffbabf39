use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::{self, MissedTickBehavior};

use tracing::{error, info, warn};

use crate::audio::AudioConfig;
use crate::audio::analyser::ByteAnalyser;
use crate::audio::backend::{AudioBackend, AudioPacket, CaptureLink};

use crate::effect::speed::{SpeedCell, SpeedCoefficient};

/// Mean of the first `bins` bytes, normalized into `[0, 1]`.
pub fn bass_energy(spectrum: &[u8], bins: usize) -> f32 {
  let bins = bins.min(spectrum.len());
  if bins == 0 {
    return 0.0;
  }
  let sum: u32 = spectrum[..bins].iter().map(|&b| b as u32).sum();
  let average = sum as f32 / bins as f32;
  average / u8::MAX as f32
}

pub fn speed_from_spectrum(spectrum: &[u8], bins: usize) -> SpeedCoefficient {
  SpeedCoefficient::from_energy(bass_energy(spectrum, bins))
}

/// Turns microphone bass energy into the shared speed coefficient, once per
/// display refresh.
pub struct AudioEnergySampler {
  config: AudioConfig,
  speed: SpeedCell,
  stop: Arc<AtomicBool>,
}

impl AudioEnergySampler {
  pub fn new(config: AudioConfig, speed: SpeedCell, stop: Arc<AtomicBool>) -> Self {
    Self {
      config,
      speed,
      stop,
    }
  }

  /// Acquire the device through `backend`, then sample until stopped.
  /// A failed acquisition is logged and leaves the coefficient untouched.
  pub async fn run<B: AudioBackend>(self, backend: B) {
    let (tx, mut rx) = triple_buffer::triple_buffer(&AudioPacket::default());
    let (acquired_tx, acquired_rx) = oneshot::channel();
    let link = CaptureLink::new(tx, Arc::clone(&self.stop), acquired_tx);

    let capture = tokio::spawn(backend.run(link));

    match acquired_rx.await {
      Ok(device) => {
        let cutoff = self.config.bass_bins as f32 * device.sample_rate / self.config.fft_size as f32;
        info!(
          "sampling bass energy from {} (below ~{:.0} Hz)...",
          device.device, cutoff
        );
      }
      Err(_) => {
        // the backend returned without ever acquiring the device
        match capture.await {
          Ok(Err(e)) => error!("error accessing microphone - {}", e),
          Ok(Ok(())) => warn!("microphone backend exited before capturing"),
          Err(e) => error!("error accessing microphone - {}", e),
        }
        return;
      }
    }

    let mut analyser = ByteAnalyser::new(&self.config);
    let period = Duration::from_secs_f32(1.0 / self.config.refresh_rate.max(1.0));
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while !self.stop.load(Ordering::Relaxed) {
      ticker.tick().await;
      let packet = rx.read();
      if packet.is_silent {
        analyser.process(&[]);
      } else {
        analyser.process(&packet.samples);
      }
      let speed = speed_from_spectrum(analyser.byte_frequency_data(), self.config.bass_bins);
      self.speed.publish(speed);
    }

    if let Ok(Err(e)) = capture.await {
      error!("microphone capture ended with error - {}", e);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::audio::mock::{DeniedBackend, LoopBackend};

  #[test]
  fn max_bass_maps_to_six() {
    let spectrum = [255u8; 128];
    assert_eq!(speed_from_spectrum(&spectrum, 10).get(), 6.0);
  }

  #[test]
  fn zero_spectrum_maps_to_one() {
    let spectrum = [0u8; 128];
    assert_eq!(speed_from_spectrum(&spectrum, 10).get(), 1.0);
  }

  #[test]
  fn only_the_bass_band_counts() {
    let mut spectrum = [0u8; 128];
    spectrum[10..].fill(255);
    assert_eq!(bass_energy(&spectrum, 10), 0.0);
    spectrum[..5].fill(255);
    assert_eq!(bass_energy(&spectrum, 10), 0.5);
  }

  #[test]
  fn any_byte_average_stays_in_range() {
    for value in 0..=255u8 {
      let spectrum = [value; 10];
      let speed = speed_from_spectrum(&spectrum, 10).get();
      assert!((1.0..=6.0).contains(&speed));
    }
  }

  #[test]
  fn short_spectrum_is_handled() {
    assert_eq!(bass_energy(&[], 10), 0.0);
    assert_eq!(bass_energy(&[255, 255], 10), 1.0);
  }

  async fn wait_for_speed(speed: &SpeedCell, target: f32) -> bool {
    for _ in 0..200 {
      if (speed.get().get() - target).abs() < 1e-6 {
        return true;
      }
      time::sleep(Duration::from_millis(10)).await;
    }
    false
  }

  #[tokio::test]
  async fn denied_capture_keeps_default_speed() {
    let speed = SpeedCell::new();
    let stop = Arc::new(AtomicBool::new(false));
    let sampler = AudioEnergySampler::new(AudioConfig::default(), speed.clone(), stop);
    // returns on its own instead of looping
    sampler.run(DeniedBackend).await;
    assert_eq!(speed.get().get(), 1.0);
  }

  #[tokio::test]
  async fn loud_input_drives_speed_to_max() {
    let speed = SpeedCell::new();
    let stop = Arc::new(AtomicBool::new(false));
    let backend = LoopBackend::loud(AudioConfig::default().fft_size);
    let released = backend.released();
    let sampler = AudioEnergySampler::new(AudioConfig::default(), speed.clone(), Arc::clone(&stop));
    let handle = tokio::spawn(sampler.run(backend));

    assert!(wait_for_speed(&speed, 6.0).await);

    stop.store(true, Ordering::Relaxed);
    handle.await.unwrap();
    assert!(released.load(Ordering::Relaxed));
  }

  #[tokio::test]
  async fn silent_input_stays_at_one() {
    let speed = SpeedCell::new();
    speed.publish(SpeedCoefficient::new(4.0));
    let stop = Arc::new(AtomicBool::new(false));
    let sampler = AudioEnergySampler::new(AudioConfig::default(), speed.clone(), Arc::clone(&stop));
    let handle = tokio::spawn(sampler.run(LoopBackend::silent(256)));

    assert!(wait_for_speed(&speed, 1.0).await);

    stop.store(true, Ordering::Relaxed);
    handle.await.unwrap();
  }
}
