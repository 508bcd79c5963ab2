//! Headless driver for the particle core
//!
//! A synthetic finger spawns particles from a background task while the main
//! task renders frames into a recording backend.
//!
//! Run with: cargo run --features cli --bin sparks-cli

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::time::Duration;
    use touch_sparks::core::{RecordingBackend, SparksConfig, Visualizer};
    use touch_sparks::headless::StrokeGenerator;
    use tracing::info;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,touch_sparks=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let config = match std::env::var("SPARKS_CONFIG") {
        Ok(path) => SparksConfig::load(&path)?,
        Err(_) => SparksConfig::default(),
    };
    let headless = config.headless.clone();

    let mut visualizer = match std::env::var("SPARKS_SEED").ok().and_then(|s| s.parse().ok()) {
        Some(seed) => {
            info!(seed, "Using fixed seed");
            Visualizer::with_seed(&config, seed)
        }
        None => Visualizer::new(&config),
    };
    visualizer.on_surface_resized(headless.surface_width, headless.surface_height);

    info!(
        width = headless.surface_width,
        height = headless.surface_height,
        fps = headless.frames_per_second,
        mode = ?config.render_mode,
        "Starting headless run"
    );

    // Input side: runs on a runtime worker, concurrently with frames
    let input = visualizer.input();
    let mut strokes = StrokeGenerator::new(
        visualizer.store().seed().wrapping_add(1),
        headless.surface_width,
        headless.surface_height,
    );
    let touch_interval = Duration::from_millis(headless.touch_interval_ms.max(1));
    let producer = tokio::spawn(async move {
        let mut tick = tokio::time::interval(touch_interval);
        loop {
            tick.tick().await;
            if let Some(event) = strokes.next() {
                input.on_touch(event.x, event.y, event.action);
            }
        }
    });

    let mut backend = RecordingBackend::default();
    let mut frame_tick =
        tokio::time::interval(Duration::from_secs_f64(1.0 / headless.frames_per_second as f64));
    let mut stats_tick = tokio::time::interval(Duration::from_secs(5));

    let deadline = async {
        match headless.duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);
    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    let mut skipped_frames = 0u64;

    loop {
        tokio::select! {
            _ = frame_tick.tick() => {
                if visualizer.should_render() {
                    visualizer.on_frame(&mut backend);
                } else {
                    skipped_frames += 1;
                }
            }
            _ = stats_tick.tick() => {
                info!(
                    live = visualizer.live_count(),
                    frames = visualizer.stats().total_frames(),
                    fps = visualizer.stats().last_fps(),
                    draw_calls = backend.draw_calls,
                    skipped = skipped_frames,
                    "stats"
                );
            }
            _ = &mut deadline => {
                info!("Run duration elapsed");
                break;
            }
            _ = &mut interrupted => {
                info!("Interrupted");
                break;
            }
        }
    }

    producer.abort();
    info!(
        frames = visualizer.stats().total_frames(),
        draw_calls = backend.draw_calls,
        points = backend.points_drawn,
        bytes = backend.bytes_uploaded,
        live = visualizer.live_count(),
        "Finished"
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
