/*
 * Selection Module
 *
 * Two-tap line drawing. The first tap on a dot anchors it, the second tap
 * decides what happens:
 * - same dot: cancel
 * - adjacent dot: the caller should try to commit a line
 * - any other dot: the anchor moves there
 */

use crate::board::{adjacent, Dot};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Anchored(Dot),
}

/// What a tap on a dot asks the game to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapAction {
    Anchor(Dot),
    Reanchor { from: Dot, to: Dot },
    Cancel(Dot),
    Connect(Dot, Dot),
}

impl Selection {
    pub fn anchor(&self) -> Option<Dot> {
        match *self {
            Selection::Idle => None,
            Selection::Anchored(dot) => Some(dot),
        }
    }

    pub fn is_anchored(&self) -> bool {
        matches!(self, Selection::Anchored(_))
    }

    pub fn clear(&mut self) {
        *self = Selection::Idle;
    }

    // Advance the state machine for a tap that resolved to `dot`
    pub fn tap(&mut self, dot: Dot) -> TapAction {
        match *self {
            Selection::Idle => {
                *self = Selection::Anchored(dot);
                TapAction::Anchor(dot)
            }
            Selection::Anchored(anchor) if anchor == dot => {
                *self = Selection::Idle;
                TapAction::Cancel(dot)
            }
            Selection::Anchored(anchor) if adjacent(anchor, dot) => {
                // Committed or not, the attempt ends this selection
                *self = Selection::Idle;
                TapAction::Connect(anchor, dot)
            }
            Selection::Anchored(anchor) => {
                *self = Selection::Anchored(dot);
                TapAction::Reanchor { from: anchor, to: dot }
            }
        }
    }
}
