use histoview::image_loader::{self, is_supported_image, SUPPORTED_EXTENSIONS};
use histoview::settings::{Settings, MAX_HORIZONTAL_SCALE};
use histoview::{process, GrayscaleMode, HistogramOutput, ImageRequest, ProcessOptions};

use eframe::egui::{self, Color32, ColorImage, RichText, TextureHandle, TextureOptions, Vec2};
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

// Background decoding reports back through these
pub enum LoaderMessage {
    ImageLoaded(PathBuf, DynamicImage),
    LoadError(PathBuf, String),
}

pub struct HistoViewApp {
    pub settings: Settings,

    // Current image state
    pub current_path: Option<PathBuf>,
    current_image: Option<DynamicImage>,
    source_texture: Option<TextureHandle>,
    histogram_texture: Option<TextureHandle>,
    output: Option<HistogramOutput>,
    pub is_loading: bool,
    pub load_error: Option<String>,

    loader_tx: Sender<LoaderMessage>,
    loader_rx: Receiver<LoaderMessage>,

    ctx: egui::Context,
}

impl HistoViewApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let (tx, rx) = channel();

        let mut app = Self {
            settings,
            current_path: None,
            current_image: None,
            source_texture: None,
            histogram_texture: None,
            output: None,
            is_loading: false,
            load_error: None,
            loader_tx: tx,
            loader_rx: rx,
            ctx: cc.egui_ctx.clone(),
        };

        if let Some(path) = std::env::args().nth(1).map(PathBuf::from) {
            if path.is_file() && is_supported_image(&path) {
                app.load_image_file(path);
            } else {
                tracing::warn!(path = %path.display(), "ignoring unsupported argument");
            }
        }

        app
    }

    pub fn load_image_file(&mut self, path: PathBuf) {
        self.is_loading = true;
        self.load_error = None;
        self.current_path = Some(path.clone());

        if let Some(parent) = path.parent() {
            self.settings.last_folder = Some(parent.to_path_buf());
        }

        let tx = self.loader_tx.clone();
        let ctx = self.ctx.clone();
        rayon::spawn(move || {
            let message = match image_loader::load_image(&path) {
                Ok(image) => LoaderMessage::ImageLoaded(path, image),
                Err(e) => {
                    e.log();
                    LoaderMessage::LoadError(path, e.user_message())
                }
            };
            let _ = tx.send(message);
            ctx.request_repaint();
        });
    }

    fn open_file_dialog(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("Images", SUPPORTED_EXTENSIONS);
        if let Some(folder) = &self.settings.last_folder {
            dialog = dialog.set_directory(folder);
        }
        if let Some(path) = dialog.pick_file() {
            self.load_image_file(path);
        }
    }

    fn export_histogram(&mut self) {
        let Some(output) = &self.output else {
            return;
        };

        let file_name = self
            .current_path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| format!("{}_histogram.png", s.to_string_lossy()))
            .unwrap_or_else(|| "histogram.png".to_string());

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(file_name)
            .save_file()
        {
            if let Err(e) = output.bitmap.save_png(&path) {
                e.log();
                self.load_error = Some(e.user_message());
            }
        }
    }

    fn process_messages(&mut self) {
        while let Ok(message) = self.loader_rx.try_recv() {
            match message {
                LoaderMessage::ImageLoaded(path, image) => {
                    // A newer request superseded this one
                    if self.current_path.as_ref() != Some(&path) {
                        continue;
                    }
                    self.is_loading = false;
                    self.source_texture = Some(self.ctx.load_texture(
                        format!("source_{}", path.display()),
                        to_color_image(&image),
                        TextureOptions::LINEAR,
                    ));
                    self.current_image = Some(image);
                    self.recompute_histogram();
                }
                LoaderMessage::LoadError(path, error) => {
                    if self.current_path.as_ref() == Some(&path) {
                        self.is_loading = false;
                        self.load_error = Some(error);
                    }
                }
            }
        }
    }

    /// Runs the pipeline for the current image with the current settings.
    fn recompute_histogram(&mut self) {
        let Some(image) = &self.current_image else {
            return;
        };

        let options = ProcessOptions {
            mode: self.settings.grayscale_mode,
            render: self.settings.render_spec(),
        };

        match process(ImageRequest::from_image(image), &options) {
            Ok(output) => {
                let bitmap = &output.bitmap;
                self.histogram_texture = (bitmap.height() > 0).then(|| {
                    self.ctx.load_texture(
                        "histogram",
                        ColorImage::from_rgba_unmultiplied(
                            [bitmap.width() as usize, bitmap.height() as usize],
                            bitmap.as_bytes(),
                        ),
                        TextureOptions::NEAREST,
                    )
                });
                self.output = Some(output);
            }
            Err(e) => {
                e.log();
                self.load_error = Some(e.user_message());
                self.histogram_texture = None;
                self.output = None;
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });

        if let Some(path) = dropped.into_iter().find(|p| is_supported_image(p)) {
            self.load_image_file(path);
        }
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        let before = self.settings.clone();

        ui.horizontal(|ui| {
            if ui.button("Open…").clicked() {
                self.open_file_dialog();
            }
            if ui
                .add_enabled(self.output.is_some(), egui::Button::new("Export histogram…"))
                .clicked()
            {
                self.export_histogram();
            }

            ui.separator();

            egui::ComboBox::from_label("Intensity")
                .selected_text(self.settings.grayscale_mode.name())
                .show_ui(ui, |ui| {
                    for mode in GrayscaleMode::all() {
                        ui.selectable_value(&mut self.settings.grayscale_mode, *mode, mode.name());
                    }
                });

            ui.add(
                egui::Slider::new(&mut self.settings.horizontal_scale, 1..=MAX_HORIZONTAL_SCALE)
                    .text("px / bin"),
            );

            ui.label("Bars");
            ui.color_edit_button_srgba_unmultiplied(&mut self.settings.fill_color);
            ui.label("Background");
            ui.color_edit_button_srgba_unmultiplied(&mut self.settings.background_color);

            ui.checkbox(&mut self.settings.show_source_image, "Show image");
        });

        if self.settings != before {
            let rerender = self.settings.grayscale_mode != before.grayscale_mode
                || self.settings.render_spec() != before.render_spec();
            if rerender {
                self.recompute_histogram();
            }
            self.settings.save();
        }
    }

    fn render_statusbar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(path) = &self.current_path {
                ui.label(RichText::new(path.display().to_string()).small());
            }
            if let Some(output) = &self.output {
                let hist = &output.histogram;
                ui.separator();
                ui.label(format!("{} px", hist.total()));
                match hist.peak_bin() {
                    Some(peak) => {
                        ui.label(format!("peak {} ({} px)", peak, hist.max_count()));
                    }
                    None => {
                        ui.label("empty image");
                    }
                }
            }
        });
    }

    fn render_content(&self, ui: &mut egui::Ui) {
        if self.is_loading {
            ui.centered_and_justified(|ui| ui.spinner());
            return;
        }

        if let Some(error) = &self.load_error {
            ui.colored_label(Color32::from_rgb(255, 100, 100), error);
            return;
        }

        let Some(histogram) = &self.histogram_texture else {
            ui.centered_and_justified(|ui| {
                ui.label("Open or drop an image to see its histogram");
            });
            return;
        };

        let available = ui.available_size();
        ui.horizontal_top(|ui| {
            let panel = if self.settings.show_source_image {
                Vec2::new(available.x / 2.0 - 8.0, available.y)
            } else {
                available
            };

            if self.settings.show_source_image {
                if let Some(source) = &self.source_texture {
                    ui.add(egui::Image::new(source).max_size(panel).maintain_aspect_ratio(true));
                }
            }

            // Stretched to the image's displayed height so bars line up with it
            ui.add(egui::Image::new(histogram).max_size(panel).maintain_aspect_ratio(false));
        });
    }
}

fn to_color_image(image: &DynamicImage) -> ColorImage {
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, rgba.as_raw())
}

impl eframe::App for HistoViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_messages();
        self.handle_dropped_files(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.render_toolbar(ui));
        egui::TopBottomPanel::bottom("statusbar").show(ctx, |ui| self.render_statusbar(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.render_content(ui));
    }
}
