use eframe::egui;
use glam::Vec2;

use crate::{
    colormap::ColourMap,
    config::{Settings, SettingsBus},
    export::FrameExporter,
    session::Session,
};

const EXPORT_SIZE: u32 = 512;
const RESOLUTION_CHOICES: [usize; 5] = [64, 100, 150, 200, 256];

/// Interactive canvas application: paint density with the held pointer,
/// stir velocity by moving it, tune everything else from the control row.
pub struct CanvasApp {
    bus: SettingsBus,
    session: Session,
    texture: Option<egui::TextureHandle>,
    paused: bool,
    frame_count: usize,
    cell_size: f32,
    last_error: Option<String>,
}

impl CanvasApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let stored = cc
            .storage
            .and_then(|storage| storage.get_string(eframe::APP_KEY))
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();
        Self::with_settings(stored)
    }

    fn with_settings(settings: Settings) -> Self {
        let mut bus = SettingsBus::new(settings);
        let changes = bus.subscribe();
        match Session::new(bus.settings(), changes) {
            Ok(session) => Self {
                bus,
                session,
                texture: None,
                paused: false,
                frame_count: 0,
                cell_size: 6.0,
                last_error: None,
            },
            Err(err) => {
                // Stored settings can carry a resolution this build no
                // longer supports; defaults always construct.
                log::warn!("stored settings rejected ({err}), using defaults");
                Self::with_settings(Settings::default())
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Pause/Resume").clicked() {
                self.paused = !self.paused;
            }

            if ui.button("Splat").clicked() {
                let settings = self.bus.settings();
                let radius = settings.brush_radius;
                let w = self.session.engine().width() as f32;
                let h = self.session.engine().height() as f32;
                let pos = Vec2::new(rand::random::<f32>() * w, rand::random::<f32>() * h);
                self.session.paint_density(pos, radius);
            }

            if ui.button("Export PNG").clicked() {
                let settings = self.bus.settings();
                let exporter = FrameExporter::new(EXPORT_SIZE, EXPORT_SIZE);
                if let Err(err) = exporter.export_density_png(
                    self.session.engine(),
                    &settings.colour_map,
                    settings.colourmap_interpolation,
                    std::path::Path::new("frame.png"),
                ) {
                    log::warn!("export failed: {err}");
                    self.last_error = Some(err.to_string());
                }
            }

            ui.add(egui::Slider::new(&mut self.cell_size, 1.0..=10.0).text("Cell Size"));
        });

        ui.horizontal(|ui| {
            let mut dt = self.bus.settings().dt;
            if ui
                .add(
                    egui::Slider::new(&mut dt, 0.00001..=0.01)
                        .logarithmic(true)
                        .text("dt"),
                )
                .changed()
            {
                self.bus.set_dt(dt);
            }

            let mut iterations = self.bus.settings().iterations;
            if ui
                .add(egui::Slider::new(&mut iterations, 1..=40).text("Iterations"))
                .changed()
            {
                self.bus.set_iterations(iterations);
            }

            let mut radius = self.bus.settings().brush_radius;
            if ui
                .add(egui::Slider::new(&mut radius, 1.0..=32.0).text("Brush"))
                .changed()
            {
                self.bus.set_brush_radius(radius);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Resolution:");
            let current = self.bus.settings().resolution;
            for &resolution in &RESOLUTION_CHOICES {
                let label = format!("{resolution}");
                if ui.selectable_label(current == resolution, label).clicked()
                    && resolution != current
                {
                    self.bus.set_resolution(resolution);
                }
            }

            ui.separator();

            ui.label("Colour map:");
            let is_blues = self.bus.settings().colour_map == ColourMap::blues();
            if ui.selectable_label(is_blues, "Blues").clicked() && !is_blues {
                self.bus.set_colour_map(ColourMap::blues());
            }
            let is_pinks = self.bus.settings().colour_map == ColourMap::pinks();
            if ui.selectable_label(is_pinks, "Pinks").clicked() && !is_pinks {
                self.bus.set_colour_map(ColourMap::pinks());
            }

            let mut interpolate = self.bus.settings().colourmap_interpolation;
            if ui.checkbox(&mut interpolate, "Interpolate").changed() {
                self.bus.set_interpolation(interpolate);
            }
        });
    }
}

impl eframe::App for CanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("inkflow");

            self.controls(ui);

            if let Some(err) = &self.last_error {
                ui.colored_label(egui::Color32::LIGHT_RED, err.as_str());
            }

            ui.separator();

            let settings = self.bus.settings().clone();
            if let Err(err) = self.session.apply_changes(&settings) {
                log::warn!("resolution change rejected: {err}");
                self.last_error = Some(err.to_string());
                // Fold the settings record back to the resolution that is
                // actually running so the UI and engine agree.
                self.bus.set_resolution(self.session.engine().width());
            }
            let settings = self.bus.settings().clone();

            let sim_w = self.session.engine().width();
            let sim_h = self.session.engine().height();
            let canvas_size =
                egui::Vec2::new(sim_w as f32 * self.cell_size, sim_h as f32 * self.cell_size);

            let (rect, response) =
                ui.allocate_exact_size(canvas_size, egui::Sense::click_and_drag());

            if response.is_pointer_button_down_on() {
                self.session.pointer_pressed();
            } else {
                self.session.pointer_released();
            }

            let canvas = Vec2::new(canvas_size.x, canvas_size.y);
            if let Some(pos) = response.interact_pointer_pos().or_else(|| response.hover_pos()) {
                let local = pos - rect.min;
                self.session
                    .pointer_moved(canvas, Vec2::new(local.x, local.y), &settings);
            }

            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let local = pos - rect.min;
                    self.session
                        .pointer_clicked(canvas, Vec2::new(local.x, local.y), &settings);
                }
            }

            if !self.paused {
                self.session.advance(&settings);
                self.frame_count += 1;
            }

            let image = egui::ColorImage::from_rgba_unmultiplied(
                [sim_w, sim_h],
                self.session.frame().rgba(),
            );
            if let Some(texture) = &mut self.texture {
                texture.set(image, egui::TextureOptions::NEAREST);
            } else {
                self.texture =
                    Some(ctx.load_texture("field", image, egui::TextureOptions::NEAREST));
            }

            if let Some(texture) = &self.texture {
                ui.painter().image(
                    texture.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }

            ui.label(format!(
                "Frame: {} | Resolution: {}x{} | Hold to paint, move to stir | Brush: {:.0}",
                self.frame_count, sim_w, sim_h, settings.brush_radius
            ));
        });

        ctx.request_repaint();
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(json) = serde_json::to_string(self.bus.settings()) {
            storage.set_string(eframe::APP_KEY, json);
        }
    }
}
