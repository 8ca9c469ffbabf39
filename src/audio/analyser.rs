use std::sync::Arc;

use apodize::blackman_iter;

use num_complex::Complex;

use realfft::{RealFftPlanner, RealToComplex};

use crate::audio::AudioConfig;

/// Frequency-domain analysis context producing byte-valued magnitudes,
/// one byte per bin, in the usual analyser-node convention.
pub struct ByteAnalyser {
  fft_size: usize,
  smoothing: f32,
  min_decibels: f32,
  max_decibels: f32,
  fft: Arc<dyn RealToComplex<f32>>,
  window_function: Vec<f32>,
  // windowed time-domain block, rewritten every frame
  fft_real_input: Vec<f32>,
  // spectrum incl. the nyquist bin, which is never reported
  fft_complex: Vec<Complex<f32>>,
  fft_scratch: Vec<Complex<f32>>,
  // per-bin magnitudes blended with the previous frame
  smoothed: Vec<f32>,
  bytes: Vec<u8>,
}

impl ByteAnalyser {
  pub fn new(config: &AudioConfig) -> Self {
    let mut planner = RealFftPlanner::<f32>::new();
    let r2c = planner.plan_fft_forward(config.fft_size);

    let window_function: Vec<f32> = blackman_iter(config.fft_size).map(|v| v as f32).collect();

    // every buffer is sized from the plan up front
    let fft_real_input = r2c.make_input_vec();
    let fft_complex = r2c.make_output_vec();
    let fft_scratch = r2c.make_scratch_vec();

    let bins = config.bin_count();
    Self {
      fft_size: config.fft_size,
      smoothing: config.smoothing.clamp(0.0, 1.0),
      min_decibels: config.min_decibels,
      max_decibels: config.max_decibels,
      fft: r2c,
      window_function,
      fft_real_input,
      fft_complex,
      fft_scratch,
      smoothed: vec![0.0; bins],
      bytes: vec![0; bins],
    }
  }

  /// Analyse the most recent `fft_size` samples. Shorter input is treated as
  /// zero-padded at the front, empty input as silence.
  pub fn process(&mut self, samples: &[f32]) {
    let count = self.fft_size.min(samples.len());
    let offset = self.fft_size - count;
    let recent = &samples[samples.len() - count..];

    self.fft_real_input.fill(0.0);
    self.fft_real_input[offset..]
      .iter_mut()
      .zip(self.window_function[offset..].iter())
      .zip(recent)
      .for_each(|((out, w), s)| {
        *out = s * w;
      });

    // the buffers are sized by the plan, so this cannot fail on length
    if self
      .fft
      .process_with_scratch(
        &mut self.fft_real_input,
        &mut self.fft_complex,
        &mut self.fft_scratch,
      )
      .is_err()
    {
      return;
    }

    let scale = 1.0 / self.fft_size as f32;
    let k = self.smoothing;
    for (s, c) in self.smoothed.iter_mut().zip(&self.fft_complex) {
      let magnitude = c.norm() * scale;
      *s = k * *s + (1.0 - k) * magnitude;
    }

    let range = self.max_decibels - self.min_decibels;
    for (byte, &s) in self.bytes.iter_mut().zip(&self.smoothed) {
      *byte = to_byte(s, self.min_decibels, range);
    }
  }

  /// Byte-valued magnitudes from the last `process` call.
  pub fn byte_frequency_data(&self) -> &[u8] {
    &self.bytes
  }
}

fn to_byte(magnitude: f32, min_decibels: f32, range: f32) -> u8 {
  if magnitude <= 0.0 || range <= 0.0 {
    return 0;
  }
  let db = 20.0 * magnitude.log10();
  let scaled = (255.0 / range) * (db - min_decibels);
  scaled.floor().clamp(0.0, 255.0) as u8
}
