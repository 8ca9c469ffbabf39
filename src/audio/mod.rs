pub mod analyser;
pub mod backend;
pub mod microphone;
pub mod sampler;

#[cfg(test)]
pub mod mock;

#[derive(Clone, Debug)]
pub struct AudioConfig {
  /// transform size, yields `fft_size / 2` frequency bins
  pub fft_size: usize,
  /// number of lowest bins averaged into the bass energy
  pub bass_bins: usize,
  /// sampler ticks per second (display refresh cadence)
  pub refresh_rate: f32,
  pub smoothing: f32,
  pub min_decibels: f32,
  pub max_decibels: f32,
}

impl Default for AudioConfig {
  fn default() -> Self {
    Self {
      fft_size: 256,
      bass_bins: 10,
      refresh_rate: 60.0,
      smoothing: 0.8,
      min_decibels: -100.0,
      max_decibels: -30.0,
    }
  }
}

impl AudioConfig {
  pub fn bin_count(&self) -> usize {
    self.fft_size / 2
  }
}
