use std::sync::Arc;

use eframe::{App, CreationContext};
use egui::{CentralPanel, Color32, Context, Event, Key, RichText, Visuals};
use egui_plot::{Line, Plot, PlotBounds, PlotPoints};

use crate::config::PlayMode;
use crate::constants::WINDOW_TITLE;
use crate::keymap::PointerVoice;
use crate::state::AppState;

const HELP_LINES: [&str; 4] = [
    "Top Row (QWERTY): Sawtooth Wave",
    "Mid Row (ASDF):  Square Wave",
    "Bot Row (ZXCV):  Sine Wave",
    "Play multiple keys at once!",
];

/// The typewriter window: key intake, held-note readout and waveform plot.
pub struct TypewriterApp {
    state: Arc<AppState>,
}

impl TypewriterApp {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Forward this frame's keyboard events to the note registry.
    fn handle_input(&self, ctx: &Context) {
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            match event {
                Event::Key { key, pressed, .. } => {
                    let Some(c) = key_char(key) else { continue };
                    if pressed {
                        self.state.press(c);
                    } else {
                        self.state.release(c);
                    }
                }
                // Releases that happen while unfocused never reach us.
                Event::WindowFocused(false) => self.state.release_all(),
                _ => {}
            }
        }

        if self.state.config.mode == PlayMode::Pointer {
            let screen = ctx.screen_rect();
            if let Some(pos) = ctx.input(|i| i.pointer.hover_pos()) {
                let voice = PointerVoice::from_position(
                    pos.x - screen.min.x,
                    pos.y - screen.min.y,
                    screen.width(),
                    screen.height(),
                );
                self.state.set_pointer_voice(Some(voice));
            }
        }
    }
}

/// Letter keys as the lowercase character they type.
pub fn key_char(key: Key) -> Option<char> {
    let mut chars = key.name().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_lowercase()),
        _ => None,
    }
}

impl App for TypewriterApp {
    fn update(&mut self, ctx: &Context, _: &mut eframe::Frame) {
        self.handle_input(ctx);

        // Copy out under the lock, draw without it.
        let snapshot = self.state.snapshot();
        ctx.request_repaint();

        CentralPanel::default().show(ctx, |ui| {
            ui.heading(WINDOW_TITLE);
            ui.add_space(8.0);
            for line in HELP_LINES {
                ui.label(RichText::new(line).monospace().color(Color32::from_gray(200)));
            }
            ui.add_space(8.0);

            let playing: String = snapshot
                .held_keys
                .iter()
                .flat_map(|k| [*k, ' '])
                .collect();
            ui.label(
                RichText::new(format!("Playing: {}", playing))
                    .monospace()
                    .color(Color32::YELLOW),
            );

            if let Some(voice) = snapshot.pointer {
                ui.label(
                    RichText::new(format!(
                        "Pointer: {:.1} Hz, amplitude {:.2}",
                        voice.frequency, voice.amplitude
                    ))
                    .monospace(),
                );
            }

            let len = snapshot.waveform.len() as f64;
            let plot = Plot::new("Waveform")
                .view_aspect(2.0)
                .show_axes([true, true])
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false);

            plot.show(ui, |plot_ui| {
                let points: Vec<_> = snapshot
                    .waveform
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| [i as f64, v as f64])
                    .collect();

                plot_ui.set_plot_bounds(PlotBounds::from_min_max([0.0, -1.1], [len, 1.1]));
                plot_ui.line(
                    Line::new(PlotPoints::from(points))
                        .color(Color32::from_rgb(100, 255, 150))
                        .width(2.0),
                );
            });
        });
    }
}

/// Initializes and runs the eframe application. Blocks until the window closes.
pub fn run_ui(state: Arc<AppState>) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([1024.0, 768.0]),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc: &CreationContext| {
            cc.egui_ctx.set_visuals(Visuals {
                panel_fill: Color32::from_rgb(30, 30, 50),
                ..Visuals::dark()
            });
            Ok(Box::new(TypewriterApp::new(state)))
        }),
    )
}
