use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

use egui::{Color32, RichText, ScrollArea, Slider};
use rfd::{MessageButtons, MessageDialog, MessageLevel};
use tracing::{error, info};

use crate::encoder::FfmpegEncoder;
use crate::engine::ConversionEngine;
use crate::error::ConvertError;
use crate::quality::{quality_to_crf, MAX_QUALITY};
use crate::types::{ConversionRequest, ConversionSettings, LogEntry, ProgressMessage};

pub struct AvifConverterApp {
    ffmpeg_path: Option<PathBuf>,
    settings: ConversionSettings,
    input_folder: Option<PathBuf>,

    // Conversion state
    is_converting: bool,
    progress_rx: Option<Receiver<ProgressMessage>>,
    current_progress: usize,
    total_files: usize,
    current_file: String,

    // UI state
    log_entries: Vec<LogEntry>,
    scroll_to_bottom: bool,
}

impl AvifConverterApp {
    pub fn new() -> Self {
        let mut app = Self {
            ffmpeg_path: None,
            settings: ConversionSettings::default(),
            input_folder: None,
            is_converting: false,
            progress_rx: None,
            current_progress: 0,
            total_files: 0,
            current_file: String::new(),
            log_entries: Vec::new(),
            scroll_to_bottom: false,
        };

        match FfmpegEncoder::locate() {
            Ok(encoder) => {
                info!("Using ffmpeg at {}", encoder.program().display());
                app.log_entries.push(LogEntry::Info(format!(
                    "ffmpeg found at {}.",
                    encoder.program().display()
                )));
                app.ffmpeg_path = Some(encoder.program().to_path_buf());
            }
            Err(e) => {
                error!("{}", e);
                app.log_entries.push(LogEntry::Error(e.to_string()));
            }
        }

        app
    }

    fn add_log(&mut self, entry: LogEntry) {
        self.log_entries.push(entry);
        self.scroll_to_bottom = true;
    }

    fn select_folder(&mut self) {
        if let Some(folder) = rfd::FileDialog::new()
            .set_title("Select Folder")
            .pick_folder()
        {
            self.add_log(LogEntry::Info(format!("Selected Folder: {}", folder.display())));
            self.input_folder = Some(folder);
        }
    }

    fn start_conversion(&mut self) {
        let Some(input_folder) = self.input_folder.clone() else {
            let e = ConvertError::NoFolderSelected;
            self.add_log(LogEntry::Warning(e.to_string()));
            show_message(MessageLevel::Warning, "Warning", &e.to_string());
            return;
        };

        let Some(ffmpeg_path) = self.ffmpeg_path.clone() else {
            self.add_log(LogEntry::Error(ConvertError::EncoderNotFound.to_string()));
            return;
        };

        self.is_converting = true;
        self.current_progress = 0;
        self.total_files = 0;
        self.current_file.clear();

        let (tx, rx) = channel();
        self.progress_rx = Some(rx);

        let request = ConversionRequest::for_folder(&input_folder, &self.settings);
        let engine = ConversionEngine::new(FfmpegEncoder::with_program(ffmpeg_path));

        thread::spawn(move || {
            if let Err(e) = engine.convert_batch(&request, &tx) {
                error!("{}", e);
                let _ = tx.send(ProgressMessage::Aborted { error: e.to_string() });
            }
        });

        self.add_log(LogEntry::Info(format!(
            "Conversion started (CRF {})...",
            quality_to_crf(self.settings.quality)
        )));
    }

    fn finish_conversion(&mut self) {
        self.is_converting = false;
        self.progress_rx = None;
        self.current_file.clear();
    }

    fn process_progress_messages(&mut self) {
        // Collect all messages first to avoid borrow checker issues
        let mut messages = Vec::new();
        if let Some(rx) = &self.progress_rx {
            while let Ok(msg) = rx.try_recv() {
                messages.push(msg);
            }
        }

        for msg in messages {
            match msg {
                ProgressMessage::Started { total } => {
                    self.total_files = total;
                    self.add_log(LogEntry::Info(format!("Processing {} image(s)...", total)));
                }
                ProgressMessage::Progress { current, total, file } => {
                    self.current_progress = current;
                    self.total_files = total;
                    self.current_file = file;
                }
                ProgressMessage::Success { file } => {
                    self.add_log(LogEntry::Success(format!("✓ {}", file)));
                }
                ProgressMessage::Error { file, error } => {
                    self.add_log(LogEntry::Error(format!("✗ {}: {}", file, error)));
                    show_message(
                        MessageLevel::Error,
                        "Error",
                        &format!("Failed to convert {}: {}", file, error),
                    );
                }
                ProgressMessage::Skipped { file, reason } => {
                    self.add_log(LogEntry::Warning(format!("⊘ {}: {}", file, reason)));
                }
                ProgressMessage::Completed(summary) => {
                    self.finish_conversion();
                    let text = format!(
                        "Successfully converted {} images to AVIF.\nSaved to: {}",
                        summary.converted,
                        summary.output_dir.display()
                    );
                    self.add_log(LogEntry::Info(text.replace('\n', " ")));
                    show_message(MessageLevel::Info, "Conversion Complete", &text);
                }
                ProgressMessage::Aborted { error } => {
                    self.finish_conversion();
                    self.add_log(LogEntry::Error(error.clone()));
                    show_message(MessageLevel::Error, "Error", &error);
                }
            }
        }
    }

    fn render_input_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Input");
        ui.add_space(5.0);

        let text = match &self.input_folder {
            Some(folder) => format!("Selected Folder: {}", folder.display()),
            None => "Select a folder to convert images to AVIF format:".to_string(),
        };
        ui.label(RichText::new(text).color(Color32::LIGHT_GRAY));

        ui.add_space(5.0);

        if ui
            .add_enabled(!self.is_converting, egui::Button::new("📂 Select Folder"))
            .clicked()
        {
            self.select_folder();
        }
    }

    fn render_options_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("Conversion Options");
        ui.add_space(5.0);

        ui.label(format!(
            "Quality: {} (Higher = Better Quality, Larger File Size)",
            self.settings.quality
        ));
        ui.horizontal(|ui| {
            ui.add(Slider::new(&mut self.settings.quality, 0..=MAX_QUALITY));
            ui.label(
                RichText::new(format!("CRF {}", quality_to_crf(self.settings.quality)))
                    .small()
                    .color(Color32::GRAY),
            );
        });

        ui.add_space(5.0);
        ui.checkbox(&mut self.settings.overwrite, "Overwrite existing files");
    }

    fn render_controls_section(&mut self, ui: &mut egui::Ui) {
        ui.add_space(10.0);

        let can_start =
            !self.is_converting && self.ffmpeg_path.is_some() && self.input_folder.is_some();

        if ui
            .add_enabled(can_start, egui::Button::new("▶ Convert to AVIF"))
            .clicked()
        {
            self.start_conversion();
        }

        if self.is_converting {
            ui.add_space(10.0);
            let progress = if self.total_files > 0 {
                self.current_progress as f32 / self.total_files as f32
            } else {
                0.0
            };

            ui.add(egui::ProgressBar::new(progress).text(format!(
                "{} / {}",
                self.current_progress, self.total_files
            )));

            if !self.current_file.is_empty() {
                ui.label(RichText::new(&self.current_file).small().italics());
            }
        }
    }

    fn render_log_section(&mut self, ui: &mut egui::Ui) {
        ui.add_space(5.0);
        ui.heading("Log");
        ui.add_space(5.0);

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for entry in &self.log_entries {
                    let (color, text) = match entry {
                        LogEntry::Info(s) => (Color32::LIGHT_GRAY, s),
                        LogEntry::Success(s) => (Color32::from_rgb(100, 255, 100), s),
                        LogEntry::Error(s) => (Color32::from_rgb(255, 100, 100), s),
                        LogEntry::Warning(s) => (Color32::from_rgb(255, 200, 100), s),
                    };

                    ui.label(RichText::new(text).color(color).small());
                }

                if self.scroll_to_bottom {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    self.scroll_to_bottom = false;
                }
            });
    }
}

fn show_message(level: MessageLevel, title: &str, description: &str) {
    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

impl eframe::App for AvifConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_progress_messages();

        // Keep polling the worker channel while a batch runs
        if self.is_converting {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(10.0);

            ui.group(|ui| {
                self.render_input_section(ui);
            });

            ui.add_space(10.0);

            ui.group(|ui| {
                self.render_options_section(ui);
            });

            ui.group(|ui| {
                self.render_controls_section(ui);
            });

            ui.group(|ui| {
                self.render_log_section(ui);
            });
        });
    }
}
