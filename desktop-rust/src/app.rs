use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use depth_estimator_common::layout::ABSENT_VALUE;
use depth_estimator_common::report::{PARSE_FAILURE_NOTICE, SUCCESS_NOTICE};
use depth_estimator_common::{DepthEstimate, Interpretation, ParseFailure, REPORT_FIELDS};
use eframe::egui::{self, Color32, RichText};
use image::ImageReader;

use crate::io::{resolve_cli_binary, run_estimate};
use crate::model::{AppState, Outcome};

const PREVIEW_SIZE: [u32; 2] = [640, 480];

pub struct DepthApp {
    state: AppState,
    preview: Option<egui::TextureHandle>,
    preview_rx: Receiver<PreviewData>,
    preview_tx: Sender<PreviewData>,
    pending_preview: Option<PreviewData>,
    preview_inflight: bool,
    estimate_rx: Option<Receiver<UiMessage>>,
}

enum UiMessage {
    EstimateDone(Result<Interpretation, String>),
}

struct PreviewData {
    path: PathBuf,
    size: [usize; 2],
    pixels: Vec<u8>,
}

impl DepthApp {
    fn upload_image(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", &["jpg", "jpeg", "png"])
            .pick_file()
        else {
            return;
        };

        self.preview = None;
        self.pending_preview = None;
        self.state.image_path = Some(path.clone());
        self.request_preview(path.clone());
        self.run_estimate(path);
    }

    fn request_preview(&mut self, path: PathBuf) {
        self.preview_inflight = true;
        let sender = self.preview_tx.clone();
        std::thread::spawn(move || {
            let image = ImageReader::open(&path).ok().and_then(|r| r.decode().ok());
            let message = match image {
                Some(image) => {
                    let thumb = image.thumbnail(PREVIEW_SIZE[0], PREVIEW_SIZE[1]);
                    PreviewData {
                        size: [thumb.width() as usize, thumb.height() as usize],
                        pixels: thumb.to_rgba8().into_raw(),
                        path,
                    }
                }
                None => PreviewData {
                    path,
                    size: [0, 0],
                    pixels: Vec::new(),
                },
            };
            let _ = sender.send(message);
        });
    }

    fn run_estimate(&mut self, image: PathBuf) {
        let cli = resolve_cli_binary();
        let (tx, rx) = mpsc::channel();
        self.estimate_rx = Some(rx);
        self.state.outcome = Outcome::Analyzing;

        std::thread::spawn(move || {
            let result = run_estimate(&cli, &image).map_err(|err| format!("{err:#}"));
            let _ = tx.send(UiMessage::EstimateDone(result));
        });
    }

    fn poll_messages(&mut self, ctx: &egui::Context) {
        while let Ok(msg) = self.preview_rx.try_recv() {
            self.preview_inflight = false;
            // 古いアップロードのプレビューは捨てる
            if self.state.image_path.as_ref() == Some(&msg.path) {
                self.pending_preview = Some(msg);
            }
        }

        if let Some(msg) = self.pending_preview.take() {
            if msg.size[0] > 0 && msg.size[1] > 0 {
                let color_image = egui::ColorImage::from_rgba_unmultiplied(msg.size, &msg.pixels);
                let name = msg.path.to_string_lossy().to_string();
                self.preview = Some(ctx.load_texture(name, color_image, egui::TextureOptions::default()));
            }
        }

        if let Some(rx) = &self.estimate_rx {
            if let Ok(UiMessage::EstimateDone(result)) = rx.try_recv() {
                self.state.outcome = match result {
                    Ok(interpretation) => Outcome::Complete(interpretation),
                    Err(message) => Outcome::Failed(message),
                };
                self.estimate_rx = None;
            }
        }
    }

    fn render_outcome(&self, ui: &mut egui::Ui) {
        match &self.state.outcome {
            Outcome::Idle => {
                ui.label("Upload an image of a hole or excavation site to estimate its depth.");
            }
            Outcome::Analyzing => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Analyzing image...");
                });
            }
            Outcome::Complete(Interpretation::Estimate(estimate)) => render_estimate(ui, estimate),
            Outcome::Complete(Interpretation::Unparsed(failure)) => render_failure(ui, failure),
            Outcome::Failed(message) => {
                ui.label(RichText::new(message).color(Color32::from_rgb(235, 87, 87)));
            }
        }
    }
}

fn render_estimate(ui: &mut egui::Ui, estimate: &DepthEstimate) {
    ui.label(RichText::new(SUCCESS_NOTICE).strong().color(Color32::from_rgb(80, 200, 120)));
    ui.add_space(6.0);

    for field in REPORT_FIELDS {
        ui.group(|ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(field.label).strong());
            ui.label(estimate.value_by_key(field.key).unwrap_or(ABSENT_VALUE));
        });
    }
}

fn render_failure(ui: &mut egui::Ui, failure: &ParseFailure) {
    ui.label(RichText::new(PARSE_FAILURE_NOTICE).strong().color(Color32::from_rgb(235, 87, 87)));
    ui.add_space(6.0);
    ui.label("Raw Response:");
    let mut raw = failure.raw();
    ui.add(
        egui::TextEdit::multiline(&mut raw)
            .desired_width(f32::INFINITY)
            .desired_rows(8),
    );
}

impl Default for DepthApp {
    fn default() -> Self {
        let (preview_tx, preview_rx) = mpsc::channel();
        Self {
            state: AppState::default(),
            preview: None,
            preview_rx,
            preview_tx,
            pending_preview: None,
            preview_inflight: false,
            estimate_rx: None,
        }
    }
}

impl eframe::App for DepthApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.is_busy() || self.preview_inflight {
            ctx.request_repaint();
        }
        self.poll_messages(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.heading("Hole Depth Estimator");
            ui.label(RichText::new("Estimate the depth of a hole or excavation site from a photo.").color(Color32::from_gray(170)));
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                if ui
                    .add_enabled(!self.state.is_busy(), egui::Button::new("Upload Image"))
                    .clicked()
                {
                    self.upload_image();
                }

                if let Some(path) = &self.state.image_path {
                    ui.label(RichText::new(path.display().to_string()).color(Color32::from_gray(170)).size(12.0));
                }
                ui.separator();

                if let Some(texture) = &self.preview {
                    ui.add(egui::Image::new(texture).max_size(egui::vec2(
                        PREVIEW_SIZE[0] as f32,
                        PREVIEW_SIZE[1] as f32,
                    )));
                    ui.label(RichText::new("Uploaded Image").size(12.0));
                    ui.separator();
                }

                self.render_outcome(ui);
            });
        });
    }
}
