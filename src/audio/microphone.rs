use std::time::Duration;

use async_trait::async_trait;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};

use tokio::task;

use tracing::{error, info};

use triple_buffer::Input;

use crate::audio::AudioConfig;
use crate::audio::backend::{
  AudioBackend, AudioPacket, CaptureError, CaptureInfo, CaptureLink, MonoWindow,
};

/// how often the capture thread looks at the stop flag
const STOP_POLL: Duration = Duration::from_millis(20);

/// Default input device of the default host.
pub struct MicrophoneBackend {
  config: AudioConfig,
}

impl MicrophoneBackend {
  pub fn new(config: AudioConfig) -> Self {
    Self { config }
  }
}

#[async_trait]
impl AudioBackend for MicrophoneBackend {
  async fn run(self, link: CaptureLink) -> Result<(), CaptureError> {
    task::spawn_blocking(move || capture_loop(self.config, link)).await??;
    Ok(())
  }
}

fn capture_loop(config: AudioConfig, link: CaptureLink) -> Result<(), CaptureError> {
  let host = cpal::default_host();
  let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;
  let name = device.name().unwrap_or_else(|_| "unknown input".to_string());

  let supported = device.default_input_config()?;
  let sample_format = supported.sample_format();
  let stream_config: StreamConfig = supported.into();
  let sample_rate = stream_config.sample_rate.0 as f32;
  let channels = stream_config.channels;

  let (tx, mut control) = link.split();
  let sink = PacketSink {
    tx,
    window: MonoWindow::new(config.fft_size, channels),
  };

  let stream = match sample_format {
    SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, sink)?,
    SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, sink)?,
    SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, sink)?,
    other => return Err(CaptureError::UnsupportedFormat(other.to_string())),
  };
  stream.play()?;

  info!(
    "microphone capture started on {} ({} Hz, {} ch)...",
    name, sample_rate, channels
  );
  control.acquired(CaptureInfo {
    device: name,
    sample_rate,
    channels,
  });

  while !control.is_stopped() {
    std::thread::sleep(STOP_POLL);
  }

  // dropping the stream releases the device
  drop(stream);
  info!("microphone capture released...");
  Ok(())
}

fn build_stream<T>(
  device: &Device,
  config: &StreamConfig,
  mut sink: PacketSink,
) -> Result<Stream, CaptureError>
where
  T: SizedSample,
  f32: FromSample<T>,
{
  let stream = device.build_input_stream(
    config,
    move |data: &[T], _: &cpal::InputCallbackInfo| sink.push(data),
    |err| error!("input stream error - {}", err),
    None,
  );
  match stream {
    Ok(stream) => Ok(stream),
    // the device is listed but refuses to open, usually a permission issue
    Err(cpal::BuildStreamError::DeviceNotAvailable) => Err(CaptureError::Denied),
    Err(e) => Err(e.into()),
  }
}

/// Lives inside the device callback.
struct PacketSink {
  tx: Input<AudioPacket>,
  window: MonoWindow,
}

impl PacketSink {
  fn push<T>(&mut self, data: &[T])
  where
    T: SizedSample,
    f32: FromSample<T>,
  {
    if data.is_empty() {
      return;
    }
    self
      .window
      .push_interleaved(data.iter().map(|s| s.to_sample::<f32>()));
    // fill the back buffer in place, no allocation once it has grown
    let packet = self.tx.input_buffer();
    self.window.copy_ordered(&mut packet.samples);
    packet.is_silent = packet.samples.iter().all(|s| *s == 0.0);
    self.tx.publish();
  }
}
