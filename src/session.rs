/*
 * Game Session Module
 *
 * This module defines the GameSession struct, the explicit owner of one game:
 * board, layout, selection, input filtering, camera and effects.
 * Frame and input handlers receive it by reference; nothing about a game is
 * global.
 *
 * The host learns about score changes and the end of the game through the
 * GameObserver trait. Game over is reported exactly once, a short delay
 * after the final line, from `tick`.
 */

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::board::{line_key, Board, Dot, GameOutcome, Placement, Player, Scores};
use crate::camera::BoardCamera;
use crate::config::AppConfig;
use crate::effects::BoardEffects;
use crate::input::{InputFilter, TouchTracker};
use crate::layout::{GridSize, Layout};
use crate::selection::{Selection, TapAction};

/// Receives game events from a session.
pub trait GameObserver {
    fn on_scores_changed(&mut self, scores: Scores, current_player: Player);
    fn on_game_over(&mut self, outcome: GameOutcome);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    ScoresChanged { scores: Scores, current_player: Player },
    GameOver(GameOutcome),
}

/// Forwards session events over a channel to whoever owns the receiver.
pub struct ChannelObserver {
    sender: Sender<SessionEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, Receiver<SessionEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl GameObserver for ChannelObserver {
    fn on_scores_changed(&mut self, scores: Scores, current_player: Player) {
        // A dropped receiver just means nobody is listening anymore
        let _ = self.sender.send(SessionEvent::ScoresChanged { scores, current_player });
    }

    fn on_game_over(&mut self, outcome: GameOutcome) {
        let _ = self.sender.send(SessionEvent::GameOver(outcome));
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerColors {
    pub one: Rgb<u8>,
    pub two: Rgb<u8>,
}

impl PlayerColors {
    pub fn get(&self, player: Player) -> Rgb<u8> {
        match player {
            Player::One => self.one,
            Player::Two => self.two,
        }
    }
}

pub struct GameSession {
    board: Board,
    layout: Layout,
    selection: Selection,
    filter: InputFilter,
    touches: TouchTracker,
    // Manual zoom level when the current pinch began
    pinch_base_level: f32,
    pub camera: BoardCamera,
    effects: BoardEffects,
    colors: PlayerColors,
    observer: Box<dyn GameObserver>,
    hover: Option<Dot>,
    game_over_delay: Duration,
    game_over_at: Option<Instant>,
    game_over_reported: bool,
    rng: StdRng,
}

impl GameSession {
    pub fn start(
        config: &AppConfig,
        grid: GridSize,
        colors: PlayerColors,
        surface: Vec2,
        observer: Box<dyn GameObserver>,
    ) -> Self {
        Self::start_with_rng(config, grid, colors, surface, observer, StdRng::from_entropy())
    }

    pub fn start_with_rng(
        config: &AppConfig,
        grid: GridSize,
        colors: PlayerColors,
        surface: Vec2,
        observer: Box<dyn GameObserver>,
        rng: StdRng,
    ) -> Self {
        let layout = Layout::new(grid, surface, config.board.canvas_margin, config.input.capture_radius_factor);
        let board = Board::new(layout.rows, layout.cols);
        info!(
            "Game started: {}x{} dots, cell size {:.0}",
            layout.rows, layout.cols, layout.cell_size
        );

        Self {
            board,
            layout,
            selection: Selection::default(),
            filter: InputFilter::new(&config.input),
            touches: TouchTracker::default(),
            pinch_base_level: 1.0,
            camera: BoardCamera::new(surface),
            effects: BoardEffects::new(config.effects.clone()),
            colors,
            observer,
            hover: None,
            game_over_delay: Duration::from_millis(config.board.game_over_delay_ms),
            game_over_at: None,
            game_over_reported: false,
            rng,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn effects(&self) -> &BoardEffects {
        &self.effects
    }

    pub fn colors(&self) -> PlayerColors {
        self.colors
    }

    pub fn hover_dot(&self) -> Option<Dot> {
        self.hover
    }

    pub fn active_touches(&self) -> &TouchTracker {
        &self.touches
    }

    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    // Recentre the fixed lattice in a resized window
    pub fn resize(&mut self, surface: Vec2) {
        self.layout.center_in(surface);
        self.camera.resize(surface);
    }

    // Dot under a view-space point, through the inverse camera transform
    pub fn dot_at(&self, point: Vec2) -> Option<Dot> {
        self.layout.nearest_dot(self.camera.view_to_surface(point))
    }

    // Returns true if the hovered dot changed
    pub fn update_hover(&mut self, point: Vec2) -> bool {
        let hover = self.dot_at(point);
        let changed = hover != self.hover;
        self.hover = hover;
        changed
    }

    /// Resolves a tap at `point` (view space) and advances the selection.
    /// Taps that miss every dot, or land after the game ended, do nothing.
    pub fn tap(&mut self, point: Vec2, now: Instant) -> Option<TapAction> {
        if self.board.is_game_over() {
            return None;
        }
        let dot = self.dot_at(point)?;

        let action = self.selection.tap(dot);
        match action {
            TapAction::Anchor(dot) | TapAction::Reanchor { to: dot, .. } => {
                debug!("Anchored dot {}", dot);
                self.camera.focus_on(self.layout.dot_position(dot));
            }
            TapAction::Cancel(dot) => debug!("Selection of dot {} cleared", dot),
            TapAction::Connect(a, b) => {
                self.place_line(a, b, now);
            }
        }
        Some(action)
    }

    pub fn pointer_click(&mut self, point: Vec2, now: Instant) -> Option<TapAction> {
        if !self.filter.accept_pointer_click(now) {
            return None;
        }
        self.tap(point, now)
    }

    pub fn touch_start(&mut self, id: u64, point: Vec2, now: Instant) {
        let was_pinching = self.touches.is_pinching();
        self.touches.start(id, point, now);
        if !was_pinching && self.touches.is_pinching() {
            self.pinch_base_level = self.camera.zoom_level;
        }
        self.effects.add_ripple(now, self.camera.view_to_surface(point));
    }

    // Moving a finger never changes the selection; two fingers pinch-zoom
    pub fn touch_move(&mut self, id: u64, point: Vec2) {
        if !self.touches.move_to(id, point) {
            return;
        }
        if let Some(scale) = self.touches.pinch_scale() {
            self.camera.set_zoom_level(self.pinch_base_level * scale);
        }
    }

    pub fn touch_end(&mut self, id: u64, point: Vec2, now: Instant) -> Option<TapAction> {
        let touch = self.touches.end(id, point)?;
        if !self.filter.accept_touch_release(now) {
            return None;
        }
        self.tap(touch.position, now)
    }

    pub fn touch_cancel(&mut self, id: u64) {
        self.touches.cancel(id);
    }

    /// Commits the line between `a` and `b` for the current player, with
    /// its animations and observer notifications.
    pub fn place_line(&mut self, a: Dot, b: Dot, now: Instant) -> Option<Placement> {
        let Some(placement) = self.board.place_line(a, b) else {
            debug!("Line {} rejected", line_key(a, b));
            return None;
        };
        debug!(
            "{} drew {}, completing {} square(s)",
            placement.player,
            placement.line,
            placement.completed.len()
        );

        if placement.turn_passed {
            self.camera.stop_zooming();
        }
        self.effects.on_placement(now, &placement, &self.layout, &mut self.rng);
        self.observer.on_scores_changed(self.board.scores(), self.board.current_player());

        if self.board.is_game_over() && self.game_over_at.is_none() {
            self.game_over_at = Some(now + self.game_over_delay);
        }
        Some(placement)
    }

    /// Per-frame housekeeping: expire effects, ease the camera and report
    /// game over once its delay has passed.
    pub fn tick(&mut self, now: Instant) {
        self.effects.retain_active(now);
        self.camera.update(self.selection.is_anchored());

        if self.game_over_reported {
            return;
        }
        if let Some(at) = self.game_over_at {
            if now >= at {
                if let Some(outcome) = self.board.outcome() {
                    info!("Game over: {}", outcome);
                    self.observer.on_game_over(outcome);
                }
                self.game_over_reported = true;
            }
        }
    }

    // One fixed physics step of the burst particles
    pub fn step(&mut self) {
        self.effects.step();
    }

    pub fn needs_redraw(&self) -> bool {
        !self.effects.is_idle()
            || self.selection.is_anchored()
            || self.camera.is_zoomed()
            || (self.game_over_at.is_some() && !self.game_over_reported)
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::SquareKey;
    use crate::camera::MAX_ZOOM_LEVEL;
    use nannou::color::rgb;

    fn colors() -> PlayerColors {
        PlayerColors { one: rgb(255, 0, 0), two: rgb(0, 0, 255) }
    }

    fn session(dots: usize) -> (GameSession, Receiver<SessionEvent>) {
        let (observer, events) = ChannelObserver::new();
        let session = GameSession::start_with_rng(
            &AppConfig::default(),
            GridSize::Dots(dots),
            colors(),
            vec2(400.0, 400.0),
            Box::new(observer),
            StdRng::seed_from_u64(1),
        );
        (session, events)
    }

    fn at(session: &GameSession, row: usize, col: usize) -> Vec2 {
        session.layout().dot_position(Dot::new(row, col))
    }

    #[test]
    fn test_two_taps_commit_a_line() {
        let (mut session, events) = session(3);
        let now = Instant::now();

        let first = at(&session, 0, 0);
        let second = at(&session, 0, 1);
        assert_eq!(session.tap(first, now), Some(TapAction::Anchor(Dot::new(0, 0))));
        assert!(session.camera.zooming);
        assert_eq!(
            session.tap(second, now),
            Some(TapAction::Connect(Dot::new(0, 0), Dot::new(0, 1)))
        );

        assert_eq!(session.board().line_count(), 1);
        assert_eq!(session.board().current_player(), Player::Two);
        assert!(!session.selection().is_anchored());
        // Turn passed, so the selection zoom is switched off
        assert!(!session.camera.zooming);
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::ScoresChanged { scores: Scores::default(), current_player: Player::Two }
        );
        assert_eq!(session.effects().pulses.len(), 1);
    }

    #[test]
    fn test_tap_off_grid_is_ignored() {
        let (mut session, _events) = session(3);
        let between = (at(&session, 0, 0) + at(&session, 0, 1)) / 2.0;
        assert_eq!(session.tap(between, Instant::now()), None);
        assert_eq!(session.tap(vec2(-50.0, -50.0), Instant::now()), None);
        assert!(!session.selection().is_anchored());
    }

    #[test]
    fn test_game_over_is_reported_once_after_delay() {
        let (mut session, events) = session(2);
        let t0 = Instant::now();

        session.place_line(Dot::new(0, 0), Dot::new(0, 1), t0);
        session.place_line(Dot::new(1, 0), Dot::new(1, 1), t0);
        session.place_line(Dot::new(0, 0), Dot::new(1, 0), t0);
        let last = session.place_line(Dot::new(0, 1), Dot::new(1, 1), t0).unwrap();
        assert_eq!(last.completed, vec![SquareKey::new(0, 0)]);
        assert!(session.is_game_over());
        assert_eq!(events.try_iter().count(), 4);

        session.tick(t0 + Duration::from_millis(100));
        assert!(events.try_recv().is_err());
        assert!(session.needs_redraw());

        session.tick(t0 + Duration::from_millis(600));
        session.tick(t0 + Duration::from_millis(700));
        let reported: Vec<_> = events.try_iter().collect();
        assert_eq!(reported.len(), 1);
        assert!(matches!(
            reported[0],
            SessionEvent::GameOver(GameOutcome::Winner { player: Player::Two, winning_score: 1, losing_score: 0 })
        ));

        // No moves after the end
        assert_eq!(session.tap(at(&session, 0, 0), t0), None);
    }

    #[test]
    fn test_touch_commits_on_release_position() {
        let (mut session, _events) = session(3);
        let t0 = Instant::now();
        let origin = at(&session, 1, 1);

        session.touch_start(4, origin + vec2(100.0, 0.0), t0);
        assert_eq!(session.effects().ripples.len(), 1);
        session.touch_move(4, origin + vec2(50.0, 0.0));
        assert!(!session.selection().is_anchored());

        let action = session.touch_end(4, origin, t0 + Duration::from_millis(80));
        assert_eq!(action, Some(TapAction::Anchor(Dot::new(1, 1))));
        assert!(session.active_touches().is_empty());
    }

    #[test]
    fn test_cancelled_touch_does_not_tap() {
        let (mut session, _events) = session(3);
        let t0 = Instant::now();
        let point = at(&session, 0, 0);
        session.touch_start(1, point, t0);
        session.touch_cancel(1);
        assert_eq!(session.touch_end(1, point, t0), None);
        assert!(!session.selection().is_anchored());
    }

    #[test]
    fn test_pointer_click_after_touch_is_suppressed() {
        let (mut session, _events) = session(3);
        let t0 = Instant::now();
        let point = at(&session, 0, 0);

        session.touch_start(1, point, t0);
        session.touch_end(1, point, t0);
        assert!(session.selection().is_anchored());

        // The emulated click that follows the touch must not cancel it
        assert_eq!(session.pointer_click(point, t0 + Duration::from_millis(30)), None);
        assert!(session.selection().is_anchored());
    }

    #[test]
    fn test_hover_tracks_nearest_dot() {
        let (mut session, _events) = session(3);
        let point = at(&session, 2, 1);
        assert!(session.update_hover(point));
        assert_eq!(session.hover_dot(), Some(Dot::new(2, 1)));
        assert!(!session.update_hover(point + vec2(1.0, 1.0)));
        assert!(session.update_hover(vec2(0.0, 0.0)));
        assert_eq!(session.hover_dot(), None);
    }

    #[test]
    fn test_redraw_settles_when_idle() {
        let (mut session, _events) = session(3);
        let t0 = Instant::now();
        assert!(!session.needs_redraw());

        session.tap(at(&session, 0, 0), t0);
        assert!(session.needs_redraw());
        session.tap(at(&session, 0, 0), t0);

        // Pending effects and the zoom eventually run out
        for i in 0..200 {
            session.tick(t0 + Duration::from_millis(i * 10));
        }
        assert!(!session.needs_redraw());
    }

    #[test]
    fn test_pinch_out_zooms_without_tapping() {
        let (mut session, _events) = session(3);
        let t0 = Instant::now();

        session.touch_start(1, vec2(380.0, 300.0), t0);
        session.touch_start(2, vec2(420.0, 300.0), t0);
        session.touch_move(1, vec2(370.0, 300.0));
        session.touch_move(2, vec2(430.0, 300.0));
        assert!((session.camera.zoom_level - 1.5).abs() < 1e-5);

        session.touch_move(1, vec2(250.0, 300.0));
        session.touch_move(2, vec2(550.0, 300.0));
        session.tick(t0);
        assert_eq!(session.camera.zoom_level, MAX_ZOOM_LEVEL);

        assert_eq!(session.touch_end(1, vec2(250.0, 300.0), t0 + Duration::from_millis(100)), None);
        assert_eq!(session.touch_end(2, vec2(550.0, 300.0), t0 + Duration::from_millis(200)), None);
        assert!(!session.selection().is_anchored());

        // Pinching in again starts from the level reached
        session.touch_start(3, vec2(300.0, 300.0), t0);
        session.touch_start(4, vec2(500.0, 300.0), t0);
        session.touch_move(4, vec2(400.0, 300.0));
        assert!((session.camera.zoom_level - 1.5).abs() < 1e-5);
    }
}
