use anyhow::Result;
use eframe::egui;
use log::{error, info, warn};

mod camera;
mod classifier;
mod config;
mod error;
mod model;
mod session;
mod texture;
mod ui;

use crate::camera::CameraController;
use crate::config::Config;
use crate::model::DetectorModel;
use crate::session::CaptureSession;
use crate::ui::GarmentApp;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("=== Garment Detection ===");

    match run() {
        Ok(()) => info!("Session finished"),
        Err(e) => {
            // Unexpected fault during construction: surface it, wait for an
            // acknowledgement, exit non-zero.
            error!("Fatal error: {:#}", e);
            eprintln!("Press Enter to exit...");
            let _ = std::io::stdin().read_line(&mut String::new());
            std::process::exit(1);
        }
    }
}

fn run() -> Result<()> {
    let config = Config::load()?;
    config.validate()?;

    // The detector model is only loaded; every frame still goes through the
    // color/contour heuristic.
    let detector_model = match DetectorModel::load(&config.model.weights_path) {
        Ok(model) => Some(model),
        Err(e) => {
            warn!("{}. Falling back to heuristic detection", e);
            None
        }
    };

    let camera = match CameraController::open(&config.camera) {
        Ok(camera) => camera,
        Err(e) => {
            // Device unavailable: the session never starts, but this is a
            // clean exit, not a fault.
            error!("{}", e);
            return Ok(());
        }
    };

    info!("Commands: 'q' quit, 's' save snapshot, 'r' reset detection");

    let session = CaptureSession::new(camera, config.capture.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                config.camera.width as f32,
                config.camera.height as f32,
            ])
            .with_resizable(false),
        ..Default::default()
    };

    let title = config.display.window_title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Box::new(GarmentApp::new(session, detector_model, config))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}
