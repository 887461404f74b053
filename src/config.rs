use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "garmentcam.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub camera: CameraConfig,
    pub display: DisplayConfig,
    pub capture: CaptureConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub device_index: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub window_title: String,
    /// Inset of the detection border rectangle, in pixels from each edge.
    pub border_inset: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub output_dir: PathBuf,
    pub file_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub weights_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera: CameraConfig {
                device_index: 0,
                width: 640,
                height: 480,
                fps: 30,
            },
            display: DisplayConfig {
                window_title: "Garment Detection".to_string(),
                border_inset: 50.0,
            },
            capture: CaptureConfig {
                output_dir: PathBuf::from("."),
                file_prefix: "capture".to_string(),
            },
            model: ModelConfig {
                weights_path: PathBuf::from("model/garment_net.onnx"),
            },
        }
    }
}

impl Config {
    /// Load the optional config file, falling back to defaults. Unlike a
    /// persistent-settings app we never write the file ourselves; running
    /// without one is the normal case.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from(CONFIG_FILE);

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            log::info!("No {} found, using default configuration", CONFIG_FILE);
            Ok(Self::default())
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| "Failed to parse configuration file")?;

        log::info!("Configuration loaded from {}", path.as_ref().display());
        Ok(config)
    }

    #[cfg(test)]
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path.as_ref(), contents)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(anyhow::anyhow!(
                "Invalid camera resolution: {}x{}",
                self.camera.width,
                self.camera.height
            ));
        }

        if self.camera.fps == 0 {
            return Err(anyhow::anyhow!("Camera frame rate must be non-zero"));
        }

        if self.capture.file_prefix.is_empty() {
            return Err(anyhow::anyhow!("Capture file prefix must not be empty"));
        }

        if self.display.border_inset < 0.0 {
            return Err(anyhow::anyhow!(
                "Invalid border inset: {}",
                self.display.border_inset
            ));
        }

        Ok(())
    }
}
