use crate::display::interface::{Display, Screen};
use crate::image_source::interface::ImageSelection;
use eframe::egui;
use parking_lot::Mutex;
use std::error::Error;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

const PREVIEW_SIZE: f32 = 320.0;

/// Window state shared between the analyzer thread, which pushes screens,
/// and the UI thread, which draws them.
#[derive(Clone, Default)]
struct Shared {
    screen: Arc<Mutex<Option<Screen>>>,
    ctx: Arc<Mutex<Option<egui::Context>>>,
}

pub struct DisplayGui {
    shared: Shared,
}

impl DisplayGui {
    pub fn new() -> Self {
        Self {
            shared: Shared::default(),
        }
    }

    /// The window that draws what this display is shown. Selections made in
    /// the window (dropped files, typed paths) go to `selections`.
    pub fn window(&self, selections: Sender<ImageSelection>) -> GuiWindow {
        let (paths, path_receiver) = channel();
        std::thread::spawn(move || decode_paths(path_receiver, selections));

        GuiWindow {
            shared: self.shared.clone(),
            paths,
            path_input: String::new(),
            texture: None,
        }
    }
}

/// Decodes picked files in pick order, off the UI thread. Ends when the
/// window drops its sender or nobody listens for selections any more.
fn decode_paths(paths: Receiver<PathBuf>, selections: Sender<ImageSelection>) {
    for path in paths {
        if selections.send(ImageSelection::from_path(&path)).is_err() {
            return;
        }
    }
}

impl Display for DisplayGui {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn show(&mut self, screen: &Screen) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.shared.screen.lock() = Some(screen.clone());
        if let Some(ctx) = self.shared.ctx.lock().as_ref() {
            ctx.request_repaint();
        }
        Ok(())
    }
}

pub struct GuiWindow {
    shared: Shared,
    paths: Sender<PathBuf>,
    path_input: String,
    texture: Option<(usize, egui::TextureHandle)>,
}

impl GuiWindow {
    pub fn select(&self, path: PathBuf) {
        let _ = self.paths.send(path);
    }

    fn preview_texture(&mut self, ctx: &egui::Context, screen: &Screen) -> Option<egui::TextureHandle> {
        let preview = match &screen.preview {
            Some(preview) => preview,
            None => {
                self.texture = None;
                return None;
            }
        };

        if let Some((key, texture)) = &self.texture {
            if *key == preview.key() {
                return Some(texture.clone());
            }
        }

        let image = preview.image();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [image.width() as usize, image.height() as usize],
            image.as_raw(),
        );
        let texture = ctx.load_texture("preview", color_image, egui::TextureOptions::LINEAR);
        self.texture = Some((preview.key(), texture.clone()));
        Some(texture)
    }
}

impl eframe::App for GuiWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        {
            let mut shared_ctx = self.shared.ctx.lock();
            if shared_ctx.is_none() {
                *shared_ctx = Some(ctx.clone());
            }
        }

        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        for path in dropped {
            self.select(path);
        }

        let screen = match self.shared.screen.lock().clone() {
            Some(screen) => screen,
            None => return,
        };
        let texture = self.preview_texture(ctx, &screen);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(screen.title);
                ui.add_space(12.0);

                if let Some(notice) = screen.notice {
                    ui.label(
                        egui::RichText::new("⚠")
                            .size(32.0)
                            .color(egui::Color32::from_rgb(255, 165, 0)),
                    );
                    ui.colored_label(egui::Color32::from_rgb(255, 165, 0), notice);
                }

                if let Some(texture) = &texture {
                    ui.add(
                        egui::Image::new(texture)
                            .max_size(egui::vec2(PREVIEW_SIZE, PREVIEW_SIZE))
                            .maintain_aspect_ratio(true),
                    );
                }

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if screen.busy {
                        ui.spinner();
                    }
                    ui.label(egui::RichText::new(&screen.status).size(18.0));
                });

                ui.add_space(12.0);
                ui.label(screen.instructions);

                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.path_input);
                    if ui.button("Choose a photo").clicked() && !self.path_input.trim().is_empty() {
                        let path = PathBuf::from(self.path_input.trim());
                        self.select(path);
                    }
                });
            });
        });
    }
}

pub fn run_window(window: GuiWindow) -> Result<(), Box<dyn Error + Send + Sync>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([440.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Skin Lesion Analyzer",
        options,
        Box::new(|_cc| Box::new(window)),
    )
    .map_err(|e| e.to_string().into())
}
