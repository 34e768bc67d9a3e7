mod cli;
mod window;

use anyhow::{Context, Result};

use glint_core::{load_scene, SceneDescription};
use glint_renderer::{Display, ImageSaver, PngSaver, RenderError, RenderManager};

use window::WindowDisplay;

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let options = cli::parse(std::env::args_os());

    let description = match &options.scene_file {
        Some(path) => load_scene(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            log::info!("No scene file given, rendering the demo scene");
            SceneDescription::demo()
        }
    };

    let mut manager = RenderManager::new();
    manager.setup(&description).context("Failed to set up render")?;
    let (width, height) = (manager.frame_width(), manager.frame_height());

    let mut saver = PngSaver::open(&options.output_file, width, height)
        .with_context(|| format!("Failed to create {}", options.output_file.display()))?;

    let mut display = if options.display {
        WindowDisplay::open(width, height).context("Failed to open preview window")?
    } else {
        None
    };

    log::info!("Rendering {}x{} to {}", width, height, saver.path().display());
    let stream = manager.render().context("Failed to start render")?;
    let mut drawn = 0u64;

    for pixel in stream {
        saver.set_pixel(pixel.x, pixel.y, pixel.color)?;

        if let Some(window) = display.as_mut() {
            window.draw_pixel(pixel.x, pixel.y, pixel.color);
            drawn += 1;
            if drawn % u64::from(width) == 0 {
                window.present()?;
            }
            if !window.is_open() {
                log::warn!("Preview window closed, cancelling render");
                manager.cancel();
                display = None;
            }
        }
    }

    match manager.wait() {
        Ok(_) => {}
        Err(RenderError::Cancelled) => log::warn!("Render cancelled, saving the partial frame"),
        Err(err) => return Err(err).context("Render failed"),
    }

    saver.save()?;
    saver.close()?;

    if let Some(window) = display.as_mut() {
        window.present()?;
        window.keep_open()?;
    }

    Ok(())
}
