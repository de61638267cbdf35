/*
 * Dots and Boxes - Module Definitions
 *
 * This file defines the module structure for the game. The board, layout,
 * selection, effects and flock engines know nothing about windows; the
 * session and shell tie them together and the app, input, ui and renderer
 * modules connect them to nannou.
 */

// Re-export key components for easier access
pub use board::{Board, Dot, GameOutcome, LineKey, Player, Scores, SquareKey};
pub use config::{AppConfig, ConfigError};
pub use layout::{GridSize, Layout};
pub use params::FlockParams;
pub use physics::{Flock, Surface};
pub use screens::{Screen, Shell};
pub use session::{ChannelObserver, GameObserver, GameSession, PlayerColors, SessionEvent};

// Define modules
pub mod app;
pub mod board;
pub mod boid;
pub mod camera;
pub mod config;
pub mod debug;
pub mod effects;
pub mod input;
pub mod layout;
pub mod lobby;
pub mod params;
pub mod physics;
pub mod renderer;
pub mod screens;
pub mod selection;
pub mod session;
pub mod spatial_grid;
pub mod ui;
