use std::time::Duration;

use eframe::egui;
use image::RgbImage;

use crate::camera::CameraController;
use crate::classifier::{self, GarmentLabel};
use crate::config::Config;
use crate::model::DetectorModel;
use crate::session::{CaptureSession, Command};

const LABEL_FONT_SIZE: f32 = 28.0;
const INSTRUCTIONS_FONT_SIZE: f32 = 14.0;
const INSTRUCTIONS: &str = "Press 'q' to quit, 's' to save, 'r' to reset detection";

/// Highlight color for a t-shirt match; everything else renders in the
/// alternate color, instructions and border in white.
const COLOR_TSHIRT: egui::Color32 = egui::Color32::from_rgb(0, 255, 0);
const COLOR_OTHER: egui::Color32 = egui::Color32::from_rgb(255, 40, 40);
const COLOR_TEXT: egui::Color32 = egui::Color32::WHITE;

/// Per-iteration pause to cap CPU usage; roughly matches the 30 fps target.
const FRAME_PACING: Duration = Duration::from_millis(30);

pub struct GarmentApp {
    session: CaptureSession<CameraController>,
    config: Config,
    current_frame: Option<RgbImage>,
    current_label: GarmentLabel,
    pub(crate) preview_texture: Option<egui::TextureHandle>,
    // Loaded for parity with the model-based detector, never consulted.
    _detector_model: Option<DetectorModel>,
}

impl GarmentApp {
    pub fn new(
        session: CaptureSession<CameraController>,
        detector_model: Option<DetectorModel>,
        config: Config,
    ) -> Self {
        Self {
            session,
            config,
            current_frame: None,
            current_label: GarmentLabel::NoGarment,
            preview_texture: None,
            _detector_model: detector_model,
        }
    }

    /// Keyboard commands, observed at the top of the iteration. Quit takes
    /// effect before the next frame read.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (quit, save, reset) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Q),
                i.key_pressed(egui::Key::S),
                i.key_pressed(egui::Key::R),
            )
        });

        if quit {
            self.session.dispatch(Command::Quit, None);
        }
        if save {
            self.session.dispatch(Command::Save, self.current_frame.as_ref());
        }
        if reset {
            self.session.dispatch(Command::Reset, None);
        }
    }

    fn render_preview(&self, ui: &mut egui::Ui) {
        let Some(texture) = &self.preview_texture else {
            return;
        };

        let available = ui.available_rect_before_wrap();
        let frame_size = texture.size_vec2();

        // Fit the frame to the window, preserving aspect ratio
        let scale = (available.width() / frame_size.x).min(available.height() / frame_size.y);
        let draw_size = frame_size * scale;
        let draw_rect = egui::Rect::from_center_size(available.center(), draw_size);

        let painter = ui.painter();
        painter.image(
            texture.id(),
            draw_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        // Fixed border around the detection area
        let border = draw_rect.shrink(self.config.display.border_inset * scale);
        painter.rect_stroke(border, 0.0, egui::Stroke::new(2.0, COLOR_TEXT));

        let label_color = if self.current_label == GarmentLabel::TShirt {
            COLOR_TSHIRT
        } else {
            COLOR_OTHER
        };

        // Label on a dark backing strip so it stays readable over the frame
        let font_id = egui::FontId::proportional(LABEL_FONT_SIZE);
        let text_pos = draw_rect.min + egui::vec2(12.0, 10.0);
        let galley = painter.layout_no_wrap(
            self.current_label.as_str().to_string(),
            font_id,
            label_color,
        );
        let backing = egui::Rect::from_min_size(text_pos, galley.size()).expand(6.0);
        painter.rect_filled(backing, 4.0, egui::Color32::from_black_alpha(180));
        painter.galley(text_pos, galley);

        painter.text(
            egui::pos2(draw_rect.min.x + 10.0, draw_rect.max.y - 10.0),
            egui::Align2::LEFT_BOTTOM,
            INSTRUCTIONS,
            egui::FontId::proportional(INSTRUCTIONS_FONT_SIZE),
            COLOR_TEXT,
        );
    }
}

impl eframe::App for GarmentApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        match self.session.next_frame() {
            Some(Ok(frame)) => {
                self.current_label = classifier::classify(&frame);
                self.update_preview_texture(ctx, &frame);
                self.current_frame = Some(frame);
            }
            Some(Err(_)) | None => {
                // Already logged by the session; the camera is released.
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                self.render_preview(ui);
            });

        ctx.request_repaint_after(FRAME_PACING);
    }
}
