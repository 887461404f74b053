use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;

use crate::config::CameraConfig;
use crate::error::CaptureError;
use crate::session::FrameSource;

/// The live webcam behind the capture session. The stream is opened once at
/// construction and stopped exactly once, either explicitly or on drop.
pub struct CameraController {
    camera: Camera,
    streaming: bool,
}

impl CameraController {
    /// Open the configured device and start streaming. The requested mode is
    /// best effort; whatever the driver negotiates is logged, not verified.
    pub fn open(config: &CameraConfig) -> Result<Self, CaptureError> {
        log::info!(
            "Opening camera {} at {}x{} @ {} fps",
            config.device_index,
            config.width,
            config.height,
            config.fps
        );

        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(
                Resolution::new(config.width, config.height),
                FrameFormat::MJPEG,
                config.fps,
            ),
        ));

        let mut camera = Camera::new(CameraIndex::Index(config.device_index), requested).map_err(
            |source| CaptureError::DeviceUnavailable {
                index: config.device_index,
                source,
            },
        )?;

        camera
            .open_stream()
            .map_err(|source| CaptureError::DeviceUnavailable {
                index: config.device_index,
                source,
            })?;

        let format = camera.camera_format();
        log::info!(
            "Camera opened: {}x{} @ {} fps ({})",
            format.resolution().width(),
            format.resolution().height(),
            format.frame_rate(),
            format.format()
        );

        Ok(Self {
            camera,
            streaming: true,
        })
    }
}

impl FrameSource for CameraController {
    fn grab(&mut self) -> Result<RgbImage, CaptureError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|source| CaptureError::FrameRead { source })?;

        let frame = buffer
            .decode_image::<RgbFormat>()
            .map_err(|source| CaptureError::FrameRead { source })?;

        Ok(frame)
    }

    fn release(&mut self) {
        if self.streaming {
            if let Err(e) = self.camera.stop_stream() {
                log::warn!("Error while stopping camera stream: {}", e);
            }
            self.streaming = false;
            log::info!("Camera released");
        }
    }
}

impl Drop for CameraController {
    fn drop(&mut self) {
        self.release();
    }
}
