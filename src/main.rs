// ============================================
// Backrooms World - демо стриминга без рендера
// ============================================

use std::env;
use std::process::ExitCode;

use ultraviolet::Vec3;

use backrooms_world::world::{BackgroundStreamer, ChunkLayout, InstanceSink};
use backrooms_world::{StreamingController, WorldConfig};

/// Шагов прогулки и длина шага в мировых единицах
const WALK_STEPS: usize = 2000;
const STEP_LENGTH: f32 = 0.5;

fn walk_position(step: usize) -> Vec3 {
    // Раскручивающаяся спираль от спавна
    let t = step as f32 * STEP_LENGTH / 40.0;
    let r = 8.0 + t * 12.0;
    Vec3::new(r * t.cos(), 1.6, r * t.sin())
}

fn load_config(path: Option<&String>) -> Result<WorldConfig, backrooms_world::ConfigError> {
    match path {
        Some(path) => WorldConfig::from_file(path),
        None => Ok(WorldConfig::default()),
    }
}

fn run_sync(config: WorldConfig) -> Result<(), backrooms_world::ConfigError> {
    let sink = InstanceSink::new(ChunkLayout::from_config(&config));
    let mut controller = StreamingController::new(config, sink)?;

    controller.initialize(walk_position(0));
    let (mut loaded, mut evicted) = (0, 0);
    let mut last_effect = None;

    for step in 1..WALK_STEPS {
        let position = walk_position(step);
        let report = controller.on_player_moved(position);
        loaded += report.loaded.len();
        evicted += report.evicted.len();

        let effect = controller.dream_effect_at(position).map(|sample| sample.effect);
        if effect != last_effect {
            if let Some(effect) = effect {
                log::info!("Entered {:?} zone at step {}", effect, step);
            }
            last_effect = effect;
        }
    }

    println!("Resident chunks: {}", controller.store().len());
    println!("Loaded during walk: {}, evicted: {}", loaded, evicted);
    println!("Instance memory: {} bytes", controller.store().sink().used_bytes());
    Ok(())
}

fn run_background(config: WorldConfig) -> Result<(), backrooms_world::ConfigError> {
    let sink = InstanceSink::new(ChunkLayout::from_config(&config));
    let mut streamer = BackgroundStreamer::new(config, sink)?;

    let mut loaded = 0;
    for step in 0..WALK_STEPS {
        streamer.update(walk_position(step));
        loaded += streamer.poll().loaded.len();
    }
    loaded += streamer.wait().loaded.len();

    let controller = streamer.controller();
    println!("Resident chunks: {}", controller.store().len());
    println!("Loaded in background: {}", loaded);
    println!("Instance memory: {} bytes", controller.store().sink().used_bytes());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let background = args.iter().any(|a| a == "--background");
    let config_path = args.iter().find(|a| !a.starts_with("--"));

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid world config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("=== Backrooms World ===");
    println!("Seed: {}", config.world_seed);
    println!("Chunk size: {}", config.chunk_size);
    println!("Load radius: {}", config.load_radius);
    println!("Mode: {}", if background { "background" } else { "synchronous" });
    println!("=======================");

    let result = if background {
        run_background(config)
    } else {
        run_sync(config)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
