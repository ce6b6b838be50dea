mod app;

use app::HistoViewApp;
use eframe::egui;
use histoview::histogram::accumulate_slice;
use histoview::render::{render, RenderSpec};
use histoview::settings::Settings;

fn main() -> eframe::Result<()> {
    let settings = Settings::load();
    histoview::logging::init_tracing(settings.debug_logging);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 700.0])
            .with_min_inner_size([640.0, 400.0])
            .with_icon(load_icon())
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "HistoView",
        native_options,
        Box::new(move |cc| Ok(Box::new(HistoViewApp::new(cc, settings)))),
    )
}

/// Icon drawn with the renderer itself: the histogram of a bell-shaped ramp.
fn load_icon() -> egui::IconData {
    let size = 64u32;
    let samples: Vec<u8> = (0..=255u32)
        .flat_map(|v| {
            let d = v.abs_diff(128);
            let weight = 64u32.saturating_sub(d * d / 256) as usize;
            std::iter::repeat(v as u8).take(weight)
        })
        .collect();

    let spec = RenderSpec::default().with_background([40, 40, 48, 255]);
    let bitmap = render(&accumulate_slice(&samples), size, &spec);

    let rgba = match bitmap.to_rgba_image() {
        Ok(full) => image::imageops::resize(&full, size, size, image::imageops::FilterType::Triangle)
            .into_raw(),
        Err(_) => vec![0u8; (size * size * 4) as usize],
    };

    egui::IconData {
        rgba,
        width: size,
        height: size,
    }
}
