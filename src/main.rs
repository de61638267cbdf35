/*
 * Dots and Boxes
 *
 * Two players take turns joining neighbouring dots. Closing the fourth side
 * of a square claims it and earns another turn; the player with the most
 * squares when the grid is full wins. A flock of particles drifts behind the
 * menus and, dimmed, behind the board.
 *
 * Logging is configured through RUST_LOG, e.g. RUST_LOG=dots_and_boxes=debug
 */

use dots_and_boxes::app;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dots_and_boxes=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    nannou::app(app::model).update(app::update).run();
}
