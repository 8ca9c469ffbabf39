#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use tracing::info;

use tracing_subscriber::filter::LevelFilter;

mod app;
mod audio;
mod effect;
mod graphics;
mod visualisation;

use app::App;
use audio::AudioConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
  tracing_subscriber::fmt()
    .with_max_level(LevelFilter::INFO)
    .with_target(false)
    .init();

  // default config...
  let config = AudioConfig {
    fft_size: 256,
    bass_bins: 10,
    refresh_rate: 60.0,
    ..Default::default()
  };

  info!("hypnotic spinning up...");

  let mut app = App::new(config)?;
  app.run().await?;

  info!("hypnotic spinning down...");
  Ok(())
}
