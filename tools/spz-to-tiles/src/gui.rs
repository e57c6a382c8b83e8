use crate::form::{Dialog, Form};
use anyhow::{anyhow, Result};
use eframe::egui;
use spz_tiles::{Converter, Level, Settings, SystemEnvironment, SystemRunner};
use std::time::Duration;

const TITLE: &str = "SPZ to glTF Converter";

/// Opens the converter window and blocks until it is closed.
pub fn run(settings: Settings) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITLE)
            .with_inner_size([600.0, 400.0]),
        ..Default::default()
    };
    let app = ConverterApp {
        form: Form::new(Converter::new(settings)),
        dialog: None,
    };
    eframe::run_native(TITLE, options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|err| anyhow!("Failed to open window: {err}"))
}

struct ConverterApp {
    form: Form<SystemEnvironment, SystemRunner>,
    dialog: Option<Dialog>,
}

impl ConverterApp {
    fn fields(&mut self, ui: &mut egui::Ui) {
        let idle = !self.form.is_running();

        ui.label("Input SPZ File:");
        ui.horizontal(|ui| {
            ui.add_enabled(
                idle,
                egui::TextEdit::singleline(&mut self.form.input).desired_width(450.0),
            );
            if ui.add_enabled(idle, egui::Button::new("Browse")).clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .set_title("Select SPZ file")
                    .add_filter("SPZ files", &["spz"])
                    .add_filter("All files", &["*"])
                    .pick_file()
                {
                    self.form.input = path.display().to_string();
                }
            }
        });
        ui.add_space(10.0);

        ui.label("Output Directory:");
        ui.horizontal(|ui| {
            ui.add_enabled(
                idle,
                egui::TextEdit::singleline(&mut self.form.output_dir).desired_width(450.0),
            );
            if ui.add_enabled(idle, egui::Button::new("Browse")).clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .set_title("Select output directory")
                    .pick_folder()
                {
                    self.form.output_dir = path.display().to_string();
                }
            }
        });
        ui.add_space(10.0);

        ui.label("Content Filename:");
        ui.add_enabled(
            idle,
            egui::TextEdit::singleline(&mut self.form.content_name).desired_width(220.0),
        );
        ui.add_space(15.0);

        ui.horizontal(|ui| {
            if ui.add_enabled(idle, egui::Button::new("Convert")).clicked() {
                if let Err(dialog) = self.form.submit() {
                    self.dialog = Some(dialog);
                }
            }
            if !idle {
                if ui.button("Cancel").clicked() {
                    self.form.cancel();
                }
                ui.spinner();
            }
        });
    }

    fn log(&self, ui: &mut egui::Ui) {
        ui.add_space(10.0);
        ui.label("Log:");
        egui::ScrollArea::vertical()
            .stick_to_bottom(true)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for line in self.form.log() {
                    let text = egui::RichText::new(&line.text).monospace();
                    match line.level {
                        Level::Failure => ui.colored_label(ui.visuals().error_fg_color, text),
                        Level::Info | Level::Success => ui.label(text),
                    };
                }
            });
    }

    fn dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &self.dialog else {
            return;
        };
        let (title, message) = match dialog {
            Dialog::Info { title, message } | Dialog::Error { title, message } => (title, message),
        };

        let mut close = false;
        egui::Window::new(title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message.as_str());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    close = true;
                }
            });
        if close {
            self.dialog = None;
        }
    }
}

impl eframe::App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(dialog) = self.form.poll() {
            self.dialog = Some(dialog);
        }
        if self.form.is_running() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            // Fields stay locked while a dialog is open
            ui.add_enabled_ui(self.dialog.is_none(), |ui| {
                self.fields(ui);
                self.log(ui);
            });
        });
        self.dialog(ctx);
    }
}
