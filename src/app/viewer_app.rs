//! Main viewer application
//!
//! Implements the egui App trait: collects input into commands, drives the
//! playback controller, and draws what it produced.

use std::time::Instant;

use egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Vec2};
use tracing::info;

use crate::config::ViewerConfig;
use crate::playback::PlaybackController;
use crate::render::NoticeKind;
use crate::video::FfmpegBackend;

use super::command::{keymap_text, Command};
use super::frame_view::FrameView;
use super::state::{NoticeBoard, PlayState};

/// Main viewer application
pub struct ViewerApp {
    /// Navigation and playback
    controller: PlaybackController<FfmpegBackend, FrameView>,
    /// Transient notice area
    notices: NoticeBoard,
    /// Current frame texture
    frame_texture: Option<egui::TextureHandle>,
    /// Keymap dialog visibility
    show_keymap: bool,
}

impl ViewerApp {
    /// Create new viewer application
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ViewerConfig) -> Self {
        info!(
            "Viewer initialized: canvas {}x{}, play interval {:?}",
            config.canvas_size.0, config.canvas_size.1, config.play_interval
        );
        let notices = NoticeBoard::new(config.notice_duration);
        Self {
            controller: PlaybackController::new(config, FfmpegBackend, FrameView::default()),
            notices,
            frame_texture: None,
            show_keymap: false,
        }
    }

    /// Keyboard commands pressed this frame
    fn collect_key_commands(ctx: &egui::Context) -> Vec<Command> {
        ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } => Command::from_key(*key, *modifiers),
                    _ => None,
                })
                .collect()
        })
    }

    /// Run one command against the controller
    ///
    /// Failures are already surfaced as notices by the controller.
    fn dispatch(&mut self, ctx: &egui::Context, command: Command) {
        let skip = self.controller.config().skip_delta();
        match command {
            Command::Open => self.open_dialog(),
            Command::SaveFrame => {
                let _ = self.controller.save_current_frame();
            }
            Command::TogglePlay => {
                let _ = self.controller.toggle_play();
            }
            Command::PrevFrame => {
                let _ = self.controller.prev_frame();
            }
            Command::NextFrame => {
                let _ = self.controller.next_frame();
            }
            Command::SkipBack => {
                let _ = self.controller.skip(-skip);
            }
            Command::SkipForward => {
                let _ = self.controller.skip(skip);
            }
            Command::FirstFrame => {
                let _ = self.controller.seek_to(0);
            }
            Command::LastFrame => {
                let _ = self.controller.seek_to(usize::MAX);
            }
            Command::ShowKeymap => self.show_keymap = true,
            Command::Quit => {
                info!("Quit requested");
                self.controller.shutdown();
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    /// Ask for a video file and open it; cancelling changes nothing
    fn open_dialog(&mut self) {
        let extensions = self.controller.config().video_extensions.clone();
        let picked = rfd::FileDialog::new()
            .add_filter("Video", extensions.as_slice())
            .pick_file();

        match picked {
            Some(path) => {
                let _ = self.controller.open(&path);
            }
            None => info!("Open dialog cancelled"),
        }
    }

    /// Move controller output into the texture and notice board
    fn sync_view(&mut self, ctx: &egui::Context) {
        let view = self.controller.sink_mut();

        if let Some(image) = view.take_image() {
            if let Some(ref mut texture) = self.frame_texture {
                texture.set(image, egui::TextureOptions::LINEAR);
            } else {
                self.frame_texture =
                    Some(ctx.load_texture("frame", image, egui::TextureOptions::LINEAR));
            }
        }
        if view.placement().is_none() {
            self.frame_texture = None;
        }

        let now = Instant::now();
        for notice in view.drain_notices() {
            self.notices.post(notice, now);
        }
    }

    /// Frame or, with nothing loaded, the keymap
    fn render_canvas(&mut self, ui: &mut egui::Ui) {
        let (canvas, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        self.controller
            .resize_viewport(canvas.width() as u32, canvas.height() as u32);
        self.sync_view(ui.ctx());

        let painter = ui.painter_at(canvas);
        match (&self.frame_texture, self.controller.sink().placement()) {
            (Some(texture), Some(placement)) => {
                let rect = Rect::from_min_size(
                    canvas.min + Vec2::new(placement.x as f32, placement.y as f32),
                    Vec2::new(placement.width as f32, placement.height as f32),
                );
                painter.image(
                    texture.id(),
                    rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            _ => {
                let color = ui.visuals().text_color();
                let skip_step = self.controller.config().skip_step;
                painter.text(
                    canvas.center() - Vec2::new(0.0, 100.0),
                    Align2::CENTER_CENTER,
                    "Keyboard Shortcuts:",
                    FontId::proportional(16.0),
                    color,
                );
                painter.text(
                    canvas.center() + Vec2::new(0.0, 20.0),
                    Align2::CENTER_CENTER,
                    keymap_text(skip_step),
                    FontId::proportional(14.0),
                    color,
                );
            }
        }
    }

    /// Buttons plus the status and notice line
    fn render_controls(&mut self, ui: &mut egui::Ui) -> Vec<Command> {
        let mut clicked = Vec::new();
        let play_state = self.controller.play_state();

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 20.0;
            if ui.button(RichText::new("Open Video File").strong()).clicked() {
                clicked.push(Command::Open);
            }
            if ui.button(RichText::new("Save Frame").strong()).clicked() {
                clicked.push(Command::SaveFrame);
            }
            if ui
                .button(RichText::new(play_state.toggle_label()).strong())
                .clicked()
            {
                clicked.push(Command::TogglePlay);
            }
            if ui.button(RichText::new("Show Keymap").strong()).clicked() {
                clicked.push(Command::ShowKeymap);
            }
        });

        ui.separator();

        let now = Instant::now();
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(self.controller.sink().status())
                    .color(Color32::LIGHT_BLUE)
                    .size(14.0),
            );
            if play_state == PlayState::Playing {
                ui.label(RichText::new(play_state.display_name()).small());
            }
            if let Some(notice) = self.notices.visible(now) {
                let color = match notice.kind {
                    NoticeKind::Info => Color32::LIGHT_GREEN,
                    NoticeKind::Boundary => Color32::from_rgb(255, 165, 0),
                    NoticeKind::Error => Color32::RED,
                };
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(&notice.text).color(color).size(14.0));
                });
            }
        });

        clicked
    }

    /// Modal keymap dialog
    fn render_keymap_dialog(&mut self, ctx: &egui::Context) {
        let skip_step = self.controller.config().skip_step;
        let mut close = false;

        egui::Window::new("Keyboard Shortcuts")
            .collapsible(false)
            .resizable(false)
            .fixed_size([400.0, 300.0])
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("Keyboard Shortcuts").strong().size(14.0));
                    ui.add_space(10.0);
                    ui.label(keymap_text(skip_step));
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        close = true;
                    }
                });
            });

        if close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.show_keymap = false;
        }
    }

    /// Wake up for the next tick or notice expiry
    fn schedule_repaint(&self, ctx: &egui::Context) {
        let now = Instant::now();
        let next = [self.controller.next_deadline(), self.notices.expires_at()]
            .into_iter()
            .flatten()
            .min();
        if let Some(deadline) = next {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // The keymap dialog is modal for the whole pass
        let keymap_open = self.show_keymap;
        for command in accepted(keymap_open, Self::collect_key_commands(ctx)) {
            self.dispatch(ctx, command);
        }

        // Fire a due playback tick
        self.controller.poll();
        self.sync_view(ctx);

        let controls_height = self.controller.config().controls_height;
        let clicked = egui::TopBottomPanel::bottom("controls")
            .exact_height(controls_height)
            .show(ctx, |ui| self.render_controls(ui))
            .inner;

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.render_canvas(ui));

        if self.show_keymap {
            self.render_keymap_dialog(ctx);
        }

        let clicked = accepted(keymap_open, clicked);
        if !clicked.is_empty() {
            for command in clicked {
                self.dispatch(ctx, command);
            }
            // Show what the clicked commands produced on the next pass
            ctx.request_repaint();
        }

        self.schedule_repaint(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.shutdown();
    }
}

/// Commands allowed to run; the keymap dialog swallows keys and clicks alike
fn accepted(keymap_open: bool, commands: Vec<Command>) -> Vec<Command> {
    if keymap_open {
        Vec::new()
    } else {
        commands
    }
}
