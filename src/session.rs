use std::path::PathBuf;

use anyhow::{Context, Result};
use image::RgbImage;

use crate::config::CaptureConfig;
use crate::error::CaptureError;

/// Seam between the capture loop and the physical camera, so dispatch and
/// shutdown logic can be exercised without a device.
pub trait FrameSource {
    fn grab(&mut self) -> Result<RgbImage, CaptureError>;
    fn release(&mut self);
}

/// The three keyboard commands of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    Save,
    Reset,
}

/// Owns the session lifecycle: the run flag, the snapshot counter and the
/// frame source. The source is released exactly once no matter how the
/// session ends.
pub struct CaptureSession<S: FrameSource> {
    source: S,
    capture: CaptureConfig,
    running: bool,
    released: bool,
    captures_saved: u32,
}

impl<S: FrameSource> CaptureSession<S> {
    pub fn new(source: S, capture: CaptureConfig) -> Self {
        Self {
            source,
            capture,
            running: true,
            released: false,
            captures_saved: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn captures_saved(&self) -> u32 {
        self.captures_saved
    }

    /// Pull the next frame. Returns `None` once the session has stopped; a
    /// read failure is terminal and stops the session itself. Either way the
    /// source is released before this returns anything but a frame.
    pub fn next_frame(&mut self) -> Option<Result<RgbImage, CaptureError>> {
        if !self.running {
            self.release_source();
            return None;
        }

        match self.source.grab() {
            Ok(frame) => Some(Ok(frame)),
            Err(e) => {
                log::error!("{}", e);
                self.running = false;
                self.release_source();
                Some(Err(e))
            }
        }
    }

    /// Handle one keyboard command. Commands are observed at the top of the
    /// iteration; quit takes effect on the next `next_frame` call.
    pub fn dispatch(&mut self, command: Command, frame: Option<&RgbImage>) {
        match command {
            Command::Quit => {
                log::info!("Stopping session...");
                self.running = false;
            }
            Command::Save => match frame {
                Some(frame) => match self.save_snapshot(frame) {
                    Ok(path) => log::info!("Snapshot saved: {}", path.display()),
                    Err(e) => log::warn!("Snapshot failed: {:#}", e),
                },
                None => log::warn!("No frame available to save yet"),
            },
            Command::Reset => {
                // Deliberately a no-op beyond the log line.
                log::info!("Restarting detection...");
            }
        }
    }

    /// Write the raw frame as `<prefix>_<N>.jpg`. The counter is session
    /// local, starts at 0 and only advances on a successful write, so files
    /// are never overwritten within a session.
    fn save_snapshot(&mut self, frame: &RgbImage) -> Result<PathBuf> {
        let path = self.next_capture_path();

        frame
            .save(&path)
            .with_context(|| format!("Failed to save snapshot to {}", path.display()))?;

        self.captures_saved += 1;
        Ok(path)
    }

    fn next_capture_path(&self) -> PathBuf {
        self.capture.output_dir.join(format!(
            "{}_{}.jpg",
            self.capture.file_prefix, self.captures_saved
        ))
    }

    fn release_source(&mut self) {
        if !self.released {
            self.source.release();
            self.released = true;
        }
    }
}

impl<S: FrameSource> Drop for CaptureSession<S> {
    fn drop(&mut self) {
        // Abnormal teardown still releases the camera, exactly once.
        self.release_source();
    }
}
