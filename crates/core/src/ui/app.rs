//! Main application logic for the desktop client.
//!
//! The window is a single vertical flow: input row, preview, the Analyze
//! trigger, then the latest diagnosis or failure. All network and decode
//! work happens on background threads; the UI thread only drains a channel.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::client::{PredictionClient, PredictionResult};
use crate::config::Config;
use crate::error::AppError;
use crate::selection::{PreviewSource, SelectionController};
use crate::ui::preview::spawn_preview_load;
use crate::ui::settings::Settings;
use crate::ui::state::{UiState, WorkerEvent};

/// How long a transient notice stays on screen.
const NOTICE_DURATION_SECS: u64 = 4;

/// Accent color for the diagnosis heading.
const HEALTHY_GREEN: egui::Color32 = egui::Color32::from_rgb(129, 199, 132);

/// Desktop client window for the leaf classification service.
pub struct LeafScanApp {
    selection: SelectionController,
    state: UiState,
    url_input: String,
    settings: Settings,
    show_settings: bool,
    preview_texture: Option<egui::TextureHandle>,
    pending_preview: Option<egui::ColorImage>,
    preview_loading: bool,
    preview_error: Option<String>,
    preview_generation: u64,
    result_fresh: bool,
    notice: Option<(String, Instant)>,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
}

impl LeafScanApp {
    pub fn new(config: Config) -> Self {
        let (tx, rx) = channel();
        Self {
            selection: SelectionController::new(),
            state: UiState::Idle,
            url_input: String::new(),
            settings: Settings::load(&config),
            show_settings: false,
            preview_texture: None,
            pending_preview: None,
            preview_loading: false,
            preview_error: None,
            preview_generation: 0,
            result_fresh: false,
            notice: None,
            tx,
            rx,
        }
    }

    fn show_notice(&mut self, message: impl Into<String>) {
        self.notice = Some((message.into(), Instant::now()));
    }

    /// Requests a fresh preview for the given source.
    ///
    /// Bumps the generation stamp first so any load still running for the
    /// previous selection is dropped when it reports back.
    fn request_preview(&mut self, source: PreviewSource) {
        self.preview_generation += 1;
        self.preview_loading = true;
        self.preview_error = None;
        spawn_preview_load(source, self.preview_generation, self.tx.clone());
    }

    fn open_file_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", &["jpg", "jpeg", "png", "webp", "gif", "bmp"])
            .pick_file();
        if let Some(path) = picked {
            let source = self.selection.file_picked(path);
            self.request_preview(source);
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        // Only the last drop wins, matching a fresh selection
        if let Some(path) = dropped.into_iter().last() {
            let source = self.selection.file_dropped(path);
            self.request_preview(source);
        }
    }

    /// Spawns a background thread for the submission and moves the UI into
    /// the in-flight state.
    fn try_submit(&mut self) {
        if !self.state.begin_submission() {
            return;
        }

        // Save settings before making request
        if let Err(e) = self.settings.save() {
            eprintln!("Warning: Failed to save settings: {}", e);
        }

        let tx = self.tx.clone();
        let input = self.selection.snapshot();
        let settings = self.settings.clone();

        // Spawn background thread for async work
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build();

            match runtime {
                Ok(rt) => {
                    rt.block_on(async {
                        let task_config = Config::builder()
                            .with_server_url(&settings.server_url)
                            .with_timeout_secs(settings.timeout_secs)
                            .build();

                        let task_config = match task_config {
                            Ok(c) => c,
                            Err(e) => {
                                let _ = tx.send(WorkerEvent::Outcome(Err(e)));
                                return;
                            }
                        };

                        let client = match PredictionClient::new(&task_config) {
                            Ok(c) => c,
                            Err(e) => {
                                let _ = tx.send(WorkerEvent::Outcome(Err(e)));
                                return;
                            }
                        };

                        let outcome = client.submit(&input).await;
                        let _ = tx.send(WorkerEvent::Outcome(outcome));
                    });
                }
                Err(e) => {
                    let _ = tx.send(WorkerEvent::Outcome(Err(AppError::transport(format!(
                        "Failed to create async runtime: {}",
                        e
                    )))));
                }
            }
        });
    }

    /// Drains worker events, applying only previews for the latest
    /// generation.
    fn process_worker_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.rx.try_recv() {
            match event {
                WorkerEvent::Outcome(Ok(result)) => {
                    self.state = UiState::Succeeded(result);
                    self.result_fresh = true;
                    ctx.request_repaint();
                }
                WorkerEvent::Outcome(Err(error)) => {
                    let message = error.user_message();
                    self.show_notice(message.clone());
                    self.state = UiState::Failed(message);
                    self.result_fresh = true;
                    ctx.request_repaint();
                }
                WorkerEvent::Preview { generation, image } => {
                    if generation == self.preview_generation {
                        self.pending_preview = Some(image);
                        self.preview_loading = false;
                        ctx.request_repaint();
                    }
                }
                WorkerEvent::PreviewFailed {
                    generation,
                    message,
                } => {
                    if generation == self.preview_generation {
                        self.preview_loading = false;
                        self.preview_error = Some(message);
                        ctx.request_repaint();
                    }
                }
            }
        }
    }

    fn upload_preview_texture(&mut self, ctx: &egui::Context) {
        if let Some(image) = self.pending_preview.take() {
            self.preview_texture = Some(ctx.load_texture(
                "selected-image-preview",
                image,
                egui::TextureOptions::LINEAR,
            ));
        }
    }

    fn input_row(&mut self, ui: &mut egui::Ui) {
        let in_flight = self.state.in_flight();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!in_flight, egui::Button::new("Open Image…"))
                .clicked()
            {
                self.open_file_dialog();
            }
            ui.label("or paste an image URL:");
        });
        ui.add_space(4.0);

        let url_edit = ui.add_enabled(
            !in_flight,
            egui::TextEdit::singleline(&mut self.url_input)
                .hint_text("https://example.com/leaf.jpg")
                .desired_width(f32::INFINITY),
        );
        if url_edit.changed() {
            if let Some(source) = self.selection.url_text_changed(&self.url_input) {
                self.request_preview(source);
            }
        }
    }

    fn preview_panel(&mut self, ui: &mut egui::Ui) {
        if let Some(message) = &self.preview_error {
            ui.colored_label(egui::Color32::LIGHT_RED, message);
            return;
        }
        if self.preview_loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading preview...");
            });
            return;
        }
        if let Some(texture) = &self.preview_texture {
            ui.add(
                egui::Image::new(texture)
                    .max_height(280.0)
                    .maintain_aspect_ratio(true),
            );
        } else {
            ui.weak("Select a leaf photo or paste an image URL to begin.");
        }
    }

    fn analyze_row(&mut self, ui: &mut egui::Ui) {
        let in_flight = self.state.in_flight();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!in_flight, egui::Button::new("Analyze"))
                .clicked()
            {
                self.try_submit();
            }
            if in_flight {
                ui.spinner();
                ui.label("Analyzing...");
            }
        });
    }

    fn result_panel(&mut self, ui: &mut egui::Ui) {
        match &self.state {
            UiState::Idle | UiState::InFlight => {}
            UiState::Succeeded(result) => {
                let result = result.clone();
                self.diagnosis_card(ui, &result);
            }
            UiState::Failed(message) => {
                let message = message.clone();
                self.failure_card(ui, &message);
            }
        }
    }

    fn diagnosis_card(&mut self, ui: &mut egui::Ui, result: &PredictionResult) {
        ui.separator();
        let heading = ui.colored_label(
            HEALTHY_GREEN,
            egui::RichText::new(&result.disease).heading().strong(),
        );
        if self.result_fresh {
            heading.scroll_to_me(Some(egui::Align::Min));
            self.result_fresh = false;
        }

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(result.confidence_percent()).strong());
            ui.weak("confidence");
        });
        ui.add_space(8.0);

        ui.label(egui::RichText::new("Treatment").strong());
        ui.label(&result.treatment);
        ui.add_space(8.0);

        ui.label(egui::RichText::new("Prevention").strong());
        ui.label(&result.prevention);
        ui.add_space(8.0);

        if ui.button("Copy report").clicked() {
            let report = format!(
                "{} ({})\n\nTreatment:\n{}\n\nPrevention:\n{}",
                result.disease,
                result.confidence_percent(),
                result.treatment,
                result.prevention
            );
            match arboard::Clipboard::new() {
                Ok(mut clipboard) => {
                    if clipboard.set_text(report).is_ok() {
                        self.show_notice("Report copied to clipboard");
                    } else {
                        self.show_notice("Failed to copy report");
                    }
                }
                Err(_) => self.show_notice("Clipboard unavailable"),
            }
        }
    }

    fn failure_card(&mut self, ui: &mut egui::Ui, message: &str) {
        ui.separator();
        let heading = ui.colored_label(
            egui::Color32::RED,
            egui::RichText::new("Analysis Failed").heading().strong(),
        );
        if self.result_fresh {
            heading.scroll_to_me(Some(egui::Align::Min));
            self.result_fresh = false;
        }

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("!").strong());
            ui.weak("no confidence available");
        });
        ui.add_space(8.0);

        ui.label(egui::RichText::new("Treatment").strong());
        ui.label(message);
        ui.add_space(8.0);

        ui.label(egui::RichText::new("Prevention").strong());
        ui.label("Check server logs for details.");
    }

    fn settings_panel(&mut self, ui: &mut egui::Ui) {
        ui.separator();
        ui.label(egui::RichText::new("Settings").strong());
        ui.horizontal(|ui| {
            ui.label("Server URL:");
            ui.add(
                egui::TextEdit::singleline(&mut self.settings.server_url)
                    .desired_width(f32::INFINITY),
            );
        });
        ui.horizontal(|ui| {
            ui.label("Timeout (seconds):");
            ui.add(egui::DragValue::new(&mut self.settings.timeout_secs).range(1..=300));
        });
    }

    fn notice_overlay(&mut self, ctx: &egui::Context) {
        let Some((message, shown_at)) = &self.notice else {
            return;
        };
        if shown_at.elapsed() > Duration::from_secs(NOTICE_DURATION_SECS) {
            self.notice = None;
            return;
        }
        let message = message.clone();
        egui::Area::new(egui::Id::new("transient_notice"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(message);
                });
            });
        // Keep repainting until the notice expires
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

impl eframe::App for LeafScanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        self.process_worker_events(ctx);
        self.upload_preview_texture(ctx);
        self.handle_dropped_files(ctx);

        if self.state.in_flight() {
            // Poll the channel even without input events
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("LeafScan");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Settings").clicked() {
                        self.show_settings = !self.show_settings;
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    self.input_row(ui);
                    ui.add_space(8.0);
                    self.preview_panel(ui);
                    ui.add_space(8.0);
                    self.analyze_row(ui);
                    self.result_panel(ui);
                    if self.show_settings {
                        self.settings_panel(ui);
                    }
                });
        });

        self.notice_overlay(ctx);
    }
}
