use egui::{Context, TextureOptions};
use image::RgbImage;

use crate::ui::GarmentApp;

impl GarmentApp {
    pub fn update_preview_texture(&mut self, ctx: &Context, frame: &RgbImage) {
        if frame.width() == 0 || frame.height() == 0 {
            return; // Skip invalid frames
        }

        let size = [frame.width() as usize, frame.height() as usize];
        let pixels = frame.as_flat_samples();
        let color_image = egui::ColorImage::from_rgb(size, pixels.as_slice());

        // Reuse the texture between frames; recreate only on a size change
        // so the preview does not flash at 30 fps.
        match &mut self.preview_texture {
            Some(texture) if texture.size() == size => {
                texture.set(color_image, TextureOptions::NEAREST);
            }
            _ => {
                self.preview_texture =
                    Some(ctx.load_texture("camera_preview", color_image, TextureOptions::NEAREST));
            }
        }
    }
}
