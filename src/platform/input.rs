//! Logical input polled by the simulation
//!
//! Hosts translate raw device events into [`LogicalAction`]s; the core only
//! ever asks "is it held" and "was it just pressed".

use serde::{Deserialize, Serialize};

/// The fixed set of actions the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalAction {
    Left,
    Right,
    Up,
    Down,
    Jump,
    Punch,
    Power,
    SpecialPower,
    Action,
    Escape,
    Click,
}

impl LogicalAction {
    pub const ALL: [LogicalAction; 11] = [
        LogicalAction::Left,
        LogicalAction::Right,
        LogicalAction::Up,
        LogicalAction::Down,
        LogicalAction::Jump,
        LogicalAction::Punch,
        LogicalAction::Power,
        LogicalAction::SpecialPower,
        LogicalAction::Action,
        LogicalAction::Escape,
        LogicalAction::Click,
    ];

    #[inline]
    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Polled input interface
pub trait InputSource {
    /// Level-triggered: held right now
    fn is_down(&self, action: LogicalAction) -> bool;
    /// Edge-triggered: pressed since the last query (resets on read)
    fn was_pressed(&mut self, action: LogicalAction) -> bool;
}

/// Bitset input state with edge latching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionState {
    down: u16,
    pressed: u16,
}

impl ActionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press/release; a fresh press latches the edge flag
    pub fn set(&mut self, action: LogicalAction, down: bool) {
        let bit = action.bit();
        let was_down = self.down & bit != 0;
        if down {
            if !was_down {
                self.pressed |= bit;
            }
            self.down |= bit;
        } else {
            self.down &= !bit;
        }
    }

    pub fn press(&mut self, action: LogicalAction) {
        self.set(action, true);
    }

    pub fn release(&mut self, action: LogicalAction) {
        self.set(action, false);
    }

    /// Press and immediately release (a tap still latches the edge)
    pub fn tap(&mut self, action: LogicalAction) {
        self.press(action);
        self.release(action);
    }

    /// Release everything and drop latched edges
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl InputSource for ActionState {
    fn is_down(&self, action: LogicalAction) -> bool {
        self.down & action.bit() != 0
    }

    fn was_pressed(&mut self, action: LogicalAction) -> bool {
        let bit = action.bit();
        let pressed = self.pressed & bit != 0;
        self.pressed &= !bit;
        pressed
    }
}
