/*
 * Screens Module
 *
 * This module defines the Shell struct, the application state around the two
 * engines: which screen is showing, the setup and join forms, the lobby,
 * toast notifications, the running game session and the background flock.
 *
 * Nothing here draws. The UI module reads the Shell and calls its
 * transitions, which keeps every transition testable without a window.
 */

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use nannou::prelude::*;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::board::{GameOutcome, Player, Scores};
use crate::config::AppConfig;
use crate::effects::TimedEffects;
use crate::layout::{GridSize, Layout};
use crate::lobby::{can_join, sanitize_room_code, Lobby};
use crate::params::ParamChanges;
use crate::physics::{Flock, Surface};
use crate::session::{ChannelObserver, GameSession, PlayerColors, SessionEvent};

const BACKEND_NOTICE: &str = "Multiplayer mode requires a backend server, which is not available in this build.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    LocalSetup,
    Join,
    Lobby,
    Game,
    Winner(GameOutcome),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SetupForm {
    pub grid_size: Option<usize>,
    pub colors: PlayerColors,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JoinForm {
    pub room_code: String,
    pub name: String,
}

impl JoinForm {
    pub fn set_room_code(&mut self, input: &str) {
        self.room_code = sanitize_room_code(input);
    }

    pub fn is_complete(&self) -> bool {
        can_join(&self.room_code, &self.name)
    }
}

pub struct Shell {
    pub config: AppConfig,
    screen: Screen,
    pub setup: SetupForm,
    pub join: JoinForm,
    pub lobby: Lobby,
    pub toasts: TimedEffects<Toast>,
    pub flock: Flock,
    session: Option<GameSession>,
    // Latest scores and turn as reported by the session
    hud: (Scores, Player),
    // Events of the running session only; replaced with every new game
    events: Option<Receiver<SessionEvent>>,
    surface: Vec2,
    rng: StdRng,
}

impl Shell {
    pub fn new(config: AppConfig, surface: Vec2, mut rng: StdRng) -> Self {
        let flock = Flock::new(config.flock.clone(), surface, &mut rng);
        let colors = match config.board.player_colors() {
            Ok((one, two)) => PlayerColors { one, two },
            Err(e) => {
                warn!("Using fallback player colours: {}", e);
                PlayerColors { one: rgb(255, 0, 0), two: rgb(0, 0, 255) }
            }
        };

        Self {
            setup: SetupForm { grid_size: None, colors },
            join: JoinForm::default(),
            lobby: Lobby::default(),
            toasts: TimedEffects::new(),
            flock,
            session: None,
            hud: (Scores::default(), Player::One),
            events: None,
            surface,
            rng,
            screen: Screen::MainMenu,
            config,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut GameSession> {
        self.session.as_mut()
    }

    pub fn hud(&self) -> (Scores, Player) {
        self.hud
    }

    pub fn surface(&self) -> Vec2 {
        self.surface
    }

    // Rows and columns a grid size choice lays out on the current surface
    pub fn grid_dimensions(&self, size: usize) -> (usize, usize) {
        let layout = Layout::new(
            GridSize::Dots(size),
            self.surface,
            self.config.board.canvas_margin,
            self.config.input.capture_radius_factor,
        );
        (layout.rows, layout.cols)
    }

    // "5 dots (5x5)", columns first, as the board will appear
    pub fn grid_label(&self, size: usize) -> String {
        let (rows, cols) = self.grid_dimensions(size);
        format!("{} dots ({}x{})", size, cols, rows)
    }

    fn show(&mut self, screen: Screen) {
        info!("Screen {:?} -> {:?}", self.screen, screen);
        self.screen = screen;
    }

    // Only one toast is visible at a time
    pub fn toast(&mut self, now: Instant, message: &str, kind: ToastKind, duration: Duration) {
        self.toasts.clear();
        self.toasts.push(now, duration, Toast { message: message.to_string(), kind });
    }

    // React to flock parameters edited in the debug panel
    pub fn apply_flock_changes(&mut self, changes: ParamChanges) {
        if changes.num_particles_changed {
            debug!("Reseeding flock with {} particles", self.flock.params().num_particles);
            self.flock.reseed(&mut self.rng);
        }
        if changes.any_changed {
            self.flock.apply_params();
        }
    }

    pub fn back_to_menu(&mut self) {
        self.show(Screen::MainMenu);
    }

    pub fn open_local_setup(&mut self) {
        self.show(Screen::LocalSetup);
    }

    pub fn open_join(&mut self) {
        self.show(Screen::Join);
    }

    pub fn create_room(&mut self) {
        self.lobby.create_room("Host", &mut self.rng);
        self.show(Screen::Lobby);
    }

    pub fn select_grid_size(&mut self, size: usize) {
        self.setup.grid_size = Some(size);
    }

    /// Starts a local two-player game with the chosen grid size and colours.
    /// Does nothing until a grid size has been picked.
    pub fn start_local_game(&mut self) -> bool {
        let Some(size) = self.setup.grid_size else {
            return false;
        };

        let (observer, events) = ChannelObserver::new();
        let session = GameSession::start(
            &self.config,
            GridSize::Dots(size),
            self.setup.colors,
            self.surface,
            Box::new(observer),
        );
        self.session = Some(session);
        self.events = Some(events);
        self.hud = (Scores::default(), Player::One);

        self.flock.move_to(Surface::GameBackground, self.surface);
        self.show(Screen::Game);
        true
    }

    pub fn join_room(&mut self, now: Instant) {
        if !self.join.is_complete() {
            return;
        }
        self.toast(now, BACKEND_NOTICE, ToastKind::Info, Duration::from_secs(5));
    }

    pub fn start_lobby_game(&mut self, now: Instant) {
        if !self.lobby.can_start_game() {
            self.toast(now, "All players must be ready to start!", ToastKind::Warning, Duration::from_secs(4));
            return;
        }
        self.toast(now, BACKEND_NOTICE, ToastKind::Info, Duration::from_secs(5));
    }

    // Returns the code to put on the clipboard
    pub fn copy_room_code(&mut self, now: Instant) -> Option<String> {
        let code = self.lobby.room_code.clone()?;
        self.toast(now, "Room code copied to clipboard!", ToastKind::Success, Duration::from_secs(2));
        Some(code)
    }

    pub fn leave_lobby(&mut self) {
        self.lobby.leave_room();
        self.show(Screen::MainMenu);
    }

    fn end_session(&mut self) {
        self.session = None;
        self.events = None;
        self.flock.move_to(Surface::Welcome, self.surface);
        self.show(Screen::MainMenu);
    }

    pub fn exit_game(&mut self) {
        self.end_session();
    }

    pub fn play_again(&mut self) {
        self.end_session();
    }

    fn drain_events(&mut self) {
        let pending: Vec<SessionEvent> = match &self.events {
            Some(events) => events.try_iter().collect(),
            None => return,
        };
        for event in pending {
            match event {
                SessionEvent::ScoresChanged { scores, current_player } => {
                    self.hud = (scores, current_player);
                }
                SessionEvent::GameOver(outcome) => self.show(Screen::Winner(outcome)),
            }
        }
    }

    // Per-frame update driven by the host's repaint loop
    pub fn tick(&mut self, now: Instant) {
        self.toasts.retain_active(now);
        if let Some(session) = &mut self.session {
            session.tick(now);
        }
        self.drain_events();
    }

    // One fixed physics step
    pub fn step(&mut self) {
        self.flock.update();
        if let Some(session) = &mut self.session {
            session.step();
        }
    }

    pub fn resize(&mut self, surface: Vec2) {
        self.surface = surface;
        self.flock.resize(surface);
        if let Some(session) = &mut self.session {
            session.resize(surface);
        }
    }

    pub fn needs_redraw(&self) -> bool {
        self.flock.is_running()
            || !self.toasts.is_empty()
            || self.session.as_ref().map_or(false, GameSession::needs_redraw)
    }
}
