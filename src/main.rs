use anyhow::anyhow;
use clap::Parser;
use tracing::info;

use chromatic_typewriter::{
    audio::run_audio_synthesizer, config::Cli, keymap::frequency_map, state::AppState, ui::run_ui,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .init();

    // Build the key table before any key event can arrive.
    info!("{} keys mapped", frequency_map().len());

    let config = cli.synth_config();
    info!("Starting with {:?}", config);
    let state = AppState::new(config);

    let audio = tokio::spawn(run_audio_synthesizer(state.clone()));

    let result = run_ui(state.clone());

    state.release_all();
    state.shutdown();
    audio.await?;

    result.map_err(|e| anyhow!("UI failed: {}", e))
}
