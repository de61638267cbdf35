/*
 * UI Module
 *
 * This module contains functions for creating and updating the user interface
 * using nannou_egui: the menu screens, the in-game HUD, toast notifications and
 * the flock controls. Parameter change detection is handled by the
 * FlockParams struct.
 */

use std::time::Instant;

use nannou::color::{rgb, Rgb};
use nannou_egui::{egui, Egui};

use crate::board::{GameOutcome, Player};
use crate::debug::DebugInfo;
use crate::lobby::ROOM_CODE_LEN;
use crate::params::FlockParams;
use crate::screens::{Screen, Shell, ToastKind};

fn color32(color: Rgb<u8>) -> egui::Color32 {
    egui::Color32::from_rgb(color.red, color.green, color.blue)
}

// Colour picker over an Rgb<u8>, returns true if it changed
fn color_button(ui: &mut egui::Ui, color: &mut Rgb<u8>) -> bool {
    let mut srgb = [color.red, color.green, color.blue];
    let changed = ui.color_edit_button_srgb(&mut srgb).changed();
    if changed {
        *color = rgb(srgb[0], srgb[1], srgb[2]);
    }
    changed
}

fn centered_window(title: &str) -> egui::Window<'static> {
    egui::Window::new(title)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .collapsible(false)
        .resizable(false)
}

// Update the UI for the current screen; returns true if anything was interacted with
pub fn update_ui(
    egui: &mut Egui,
    shell: &mut Shell,
    debug_info: &DebugInfo,
    show_debug: &mut bool,
    now: Instant,
) -> bool {
    let screen_before = shell.screen();
    let ctx = egui.begin_frame();

    match shell.screen() {
        Screen::MainMenu => {
            centered_window("Dots and Boxes").show(&ctx, |ui| main_menu(ui, shell));
        }
        Screen::LocalSetup => {
            centered_window("Local Game").show(&ctx, |ui| local_setup(ui, shell));
        }
        Screen::Join => {
            centered_window("Join Game").show(&ctx, |ui| join_screen(ui, shell, now));
        }
        Screen::Lobby => {
            centered_window("Lobby").show(&ctx, |ui| lobby_screen(ui, shell, now));
        }
        Screen::Game => {
            egui::TopBottomPanel::top("hud").show(&ctx, |ui| game_hud(ui, shell));
        }
        Screen::Winner(outcome) => {
            centered_window("Game Over").show(&ctx, |ui| winner_screen(ui, shell, outcome));
        }
    }

    if let Some(toast) = shell.toasts.iter().last() {
        let color = match toast.payload.kind {
            ToastKind::Info => egui::Color32::LIGHT_BLUE,
            ToastKind::Success => egui::Color32::LIGHT_GREEN,
            ToastKind::Warning => egui::Color32::GOLD,
        };
        egui::Window::new("toast")
            .title_bar(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -30.0])
            .show(&ctx, |ui| {
                ui.colored_label(color, toast.payload.message.as_str());
            });
    }

    let mut flock_changed = false;
    egui::Window::new("Flock Controls")
        .default_pos([10.0, 60.0])
        .show(&ctx, |ui| {
            flock_changed = flock_controls(ui, shell, debug_info, show_debug);
        });

    flock_changed || shell.screen() != screen_before || ctx.is_pointer_over_area()
}

fn main_menu(ui: &mut egui::Ui, shell: &mut Shell) {
    ui.vertical_centered(|ui| {
        if ui.button("Local Play").clicked() {
            shell.open_local_setup();
        }
        if ui.button("Create Game").clicked() {
            shell.create_room();
        }
        if ui.button("Join Game").clicked() {
            shell.open_join();
        }
    });
}

fn grid_size_buttons(ui: &mut egui::Ui, shell: &Shell, sizes: &[usize], selected: Option<usize>) -> Option<usize> {
    let mut picked = None;
    ui.horizontal(|ui| {
        for &size in sizes {
            let label = shell.grid_label(size);
            if ui.selectable_label(selected == Some(size), label).clicked() {
                picked = Some(size);
            }
        }
    });
    picked
}

fn local_setup(ui: &mut egui::Ui, shell: &mut Shell) {
    ui.label("Grid size");
    let sizes = shell.config.board.grid_sizes.clone();
    if let Some(size) = grid_size_buttons(ui, shell, &sizes, shell.setup.grid_size) {
        shell.select_grid_size(size);
    }

    ui.separator();
    ui.horizontal(|ui| {
        ui.label("Player 1");
        color_button(ui, &mut shell.setup.colors.one);
        ui.label("Player 2");
        color_button(ui, &mut shell.setup.colors.two);
    });

    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Back").clicked() {
            shell.back_to_menu();
        }
        let ready = shell.setup.grid_size.is_some();
        if ui.add_enabled(ready, egui::Button::new("Start Game")).clicked() {
            shell.start_local_game();
        }
    });
}

fn join_screen(ui: &mut egui::Ui, shell: &mut Shell, now: Instant) {
    let mut code = shell.join.room_code.clone();
    ui.horizontal(|ui| {
        ui.label("Room code");
        if ui.text_edit_singleline(&mut code).changed() {
            shell.join.set_room_code(&code);
        }
    });
    ui.horizontal(|ui| {
        ui.label("Your name");
        ui.text_edit_singleline(&mut shell.join.name);
    });
    ui.small(format!("{} letters or digits", ROOM_CODE_LEN));

    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Back").clicked() {
            shell.back_to_menu();
        }
        let complete = shell.join.is_complete();
        if ui.add_enabled(complete, egui::Button::new("Join")).clicked() {
            shell.join_room(now);
        }
    });
}

fn lobby_screen(ui: &mut egui::Ui, shell: &mut Shell, now: Instant) {
    let code = shell.lobby.room_code.clone().unwrap_or_else(|| "------".to_string());
    ui.horizontal(|ui| {
        ui.heading(code.as_str());
        if ui.button("Copy").clicked() {
            if let Some(code) = shell.copy_room_code(now) {
                ui.output().copied_text = code;
            }
        }
    });
    ui.label(format!("Players: {}", shell.lobby.player_count()));

    for player in &shell.lobby.players {
        ui.horizontal(|ui| {
            ui.colored_label(color32(player.color), "●");
            ui.label(player.name.as_str());
            if player.is_host {
                ui.small("Host");
            }
            ui.label(if player.is_ready { "✓ Ready" } else { "Not Ready" });
        });
    }

    ui.separator();
    if shell.lobby.is_host {
        let sizes = shell.config.board.grid_sizes.clone();
        if let Some(size) = grid_size_buttons(ui, shell, &sizes, Some(shell.lobby.grid_size)) {
            shell.lobby.set_grid_size(size);
        }
    } else {
        ui.label(format!("Grid: {}", shell.grid_label(shell.lobby.grid_size)));
    }

    if let Some(me) = shell.lobby.my_player().cloned() {
        let mut name = me.name;
        let mut color = me.color;
        ui.horizontal(|ui| {
            if ui.text_edit_singleline(&mut name).changed() {
                shell.lobby.update_my_name(&name);
            }
            if color_button(ui, &mut color) {
                shell.lobby.update_my_color(color);
            }
        });
    }

    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Leave").clicked() {
            shell.leave_lobby();
            return;
        }
        let label = if shell.lobby.is_ready { "Ready ✓" } else { "Ready" };
        if ui.button(label).clicked() {
            shell.lobby.toggle_ready();
        }
        if ui.button("Start Game").clicked() {
            shell.start_lobby_game(now);
        }
    });
}

fn game_hud(ui: &mut egui::Ui, shell: &mut Shell) {
    let (scores, current) = shell.hud();
    let Some(colors) = shell.session().map(|session| session.colors()) else {
        return;
    };

    ui.horizontal(|ui| {
        for player in [Player::One, Player::Two] {
            let marker = if player == current { "▶ " } else { "" };
            let text = format!("{}{}: {}", marker, player, scores.get(player));
            ui.colored_label(color32(colors.get(player)), text);
        }
        ui.separator();
        ui.label(format!("{}'s turn", current));
        ui.separator();
        if ui.button("Reset View").clicked() {
            if let Some(session) = shell.session_mut() {
                session.reset_camera();
            }
        }
        if ui.button("Exit").clicked() {
            shell.exit_game();
        }
    });
}

fn winner_screen(ui: &mut egui::Ui, shell: &mut Shell, outcome: GameOutcome) {
    ui.vertical_centered(|ui| {
        ui.heading(outcome.to_string());
        if ui.button("Play Again").clicked() {
            shell.play_again();
        }
    });
}

// Live flock parameters; returns true if anything changed
fn flock_controls(ui: &mut egui::Ui, shell: &mut Shell, debug_info: &DebugInfo, show_debug: &mut bool) -> bool {
    // Take a snapshot of current parameter values for change detection
    shell.flock.params_mut().take_snapshot();

    {
        let params = shell.flock.params_mut();
        ui.collapsing("Particles", |ui| {
            ui.add(egui::Slider::new(&mut params.num_particles, FlockParams::num_particles_range()).text("Count"));
            ui.add(egui::Slider::new(&mut params.max_speed, FlockParams::max_speed_range()).text("Max Speed"));
            ui.add(egui::Slider::new(&mut params.neighborhood_radius, FlockParams::radius_range()).text("Neighborhood"));
        });
        ui.collapsing("Flocking Behavior", |ui| {
            ui.add(egui::Slider::new(&mut params.separation_weight, FlockParams::weight_range()).text("Separation"));
            ui.add(egui::Slider::new(&mut params.alignment_weight, FlockParams::weight_range()).text("Alignment"));
            ui.add(egui::Slider::new(&mut params.cohesion_weight, FlockParams::weight_range()).text("Cohesion"));
        });
    }

    let mut paused = !shell.flock.is_running();
    let pause_changed = ui.checkbox(&mut paused, "Pause Flock").changed();
    if pause_changed {
        if paused {
            shell.flock.stop();
        } else {
            shell.flock.start();
        }
    }
    let debug_changed = ui.checkbox(show_debug, "Show Debug Info").changed();

    ui.separator();
    for line in debug_info.lines() {
        ui.label(line);
    }

    let changes = shell.flock.params().detect_changes();
    shell.apply_flock_changes(changes);
    changes.any_changed || pause_changed || debug_changed
}

// Draw debug information on the screen
pub fn draw_debug_info(draw: &nannou::Draw, debug_info: &DebugInfo, window_rect: nannou::geom::Rect) {
    // Background panel in the bottom-left corner
    let margin = 20.0;
    let line_height = 20.0;
    let lines = debug_info.lines();
    let panel_width = 200.0;
    let panel_height = line_height * lines.len() as f32 + margin;
    let panel_x = window_rect.left() + panel_width / 2.0;
    let panel_y = window_rect.bottom() + panel_height / 2.0;

    draw.rect()
        .x_y(panel_x, panel_y)
        .w_h(panel_width, panel_height)
        .color(nannou::color::rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.left() + margin;
    let text_y = window_rect.bottom() + panel_height - margin;

    for (i, text) in lines.iter().enumerate() {
        let y = text_y - (i as f32 * line_height);
        draw.text(text)
            .x_y(text_x + 70.0, y)
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
