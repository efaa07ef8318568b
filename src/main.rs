use std::path::Path;

use glam::Vec2;
use inkflow::{FrameExporter, Session, Settings, SettingsBus};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "demo" {
        run_headless_demo()?;
    } else {
        run_gui_app()?;
    }

    Ok(())
}

/// Paint a synthetic drag stroke into a fresh session and export PNG frames
/// of the result. Useful for inspecting the pipeline without a window.
fn run_headless_demo() -> Result<(), Box<dyn std::error::Error>> {
    println!("Running headless paint demo...");

    let mut bus = SettingsBus::new(Settings::default());
    let changes = bus.subscribe();
    let mut session = Session::new(bus.settings(), changes)?;
    let exporter = FrameExporter::new(400, 400);

    // Canvas sized to the grid, so canvas and grid coordinates coincide.
    let canvas = Vec2::splat(bus.settings().resolution as f32);

    session.pointer_pressed();
    for step in 0..=40 {
        let pos = Vec2::new(50.0, 20.0 + step as f32);
        session.pointer_moved(canvas, pos, bus.settings());
        session.advance(bus.settings());
    }
    session.pointer_released();

    for frame in 1..=60 {
        session.advance(bus.settings());

        if frame % 10 == 0 {
            let path = format!("demo_frame_{frame:04}.png");
            let settings = bus.settings();
            exporter.export_density_png(
                session.engine(),
                &settings.colour_map,
                settings.colourmap_interpolation,
                Path::new(&path),
            )?;
            println!("wrote {path}");
        }
    }

    println!("Demo completed.");
    Ok(())
}

fn run_gui_app() -> Result<(), Box<dyn std::error::Error>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 800.0])
            .with_title("inkflow - Interactive Fluid Canvas"),
        ..Default::default()
    };

    eframe::run_native(
        "inkflow",
        options,
        Box::new(|cc| Box::new(inkflow::CanvasApp::new(cc))),
    )?;

    Ok(())
}
