//! Function-pointer finite state machine over the input modes.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌────────────┬───────────┬──────────┬────────────────────┐  │
//! │  │ InputMode  │ on_enter  │ on_exit  │ on_update          │  │
//! │  ├────────────┼───────────┼──────────┼────────────────────┤  │
//! │  │ NoInput    │ fn(ctx)   │ -        │ fn(ctx)            │  │
//! │  │ Hue        │ fn(ctx)   │ -        │ fn(ctx)            │  │
//! │  │ Saturation │ fn(ctx)   │ -        │ fn(ctx)            │  │
//! │  │ Brightness │ fn(ctx)   │ fn(ctx)  │ fn(ctx)            │  │
//! │  └────────────┴───────────┴──────────┴────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** mode.  Mode
//! changes only come from outside, through [`Fsm::advance`] (a double click):
//! the engine runs `on_exit` for the current mode, then `on_enter` for
//! the next.  All functions receive `&mut DeviceState`.

pub mod context;
pub mod states;

use context::DeviceState;
use log::info;

// ---------------------------------------------------------------------------
// Mode identity
// ---------------------------------------------------------------------------

/// The four input modes, in cycle order.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InputMode {
    NoInput = 0,
    Hue = 1,
    Saturation = 2,
    Brightness = 3,
}

impl InputMode {
    /// Total number of modes; sizes the table array.
    pub const COUNT: usize = 4;

    /// Convert an index back to `InputMode`, reducing it modulo
    /// [`COUNT`](Self::COUNT).
    pub fn from_index(idx: usize) -> Self {
        match idx % Self::COUNT {
            0 => Self::NoInput,
            1 => Self::Hue,
            2 => Self::Saturation,
            _ => Self::Brightness,
        }
    }

    /// The mode a double click moves to.
    pub fn next(self) -> Self {
        Self::from_index(self as usize + 1)
    }

    /// True for the modes in which holding the button edits the colour.
    pub fn is_edit(self) -> bool {
        self != Self::NoInput
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each mode transition.
pub type StateActionFn = fn(&mut DeviceState);

/// Signature for the per-tick update handler.
pub type StateUpdateFn = fn(&mut DeviceState);

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single mode.
/// Stored in a fixed-size array: no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: InputMode,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `InputMode as usize`.
    table: [StateDescriptor; InputMode::COUNT],
    current: usize,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; InputMode::COUNT], initial: InputMode) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id as usize == i),
            "state table out of order"
        );
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter` for the starting mode.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut DeviceState) {
        info!("FSM starting in mode: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Run the current mode's update handler once.
    pub fn tick(&mut self, ctx: &mut DeviceState) {
        (self.table[self.current].on_update)(ctx);
    }

    /// Move to the next mode in the cycle.  Returns the new mode.
    pub fn advance(&mut self, ctx: &mut DeviceState) -> InputMode {
        let next = self.current_mode().next();
        self.transition(next, ctx);
        next
    }

    pub fn current_mode(&self) -> InputMode {
        InputMode::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: InputMode, ctx: &mut DeviceState) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::context::DeviceState;
    use super::*;
    use crate::color::{HUE_MAX, HsvColor, PERCENT_MAX};
    use crate::config::SystemConfig;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn advances_cycle_modulo_four(n in 0usize..64) {
            let mut fsm = Fsm::new(states::build_state_table(), InputMode::NoInput);
            let mut ctx = DeviceState::new(SystemConfig::default(), HsvColor::default());
            fsm.start(&mut ctx);
            for _ in 0..n {
                fsm.advance(&mut ctx);
            }
            prop_assert_eq!(fsm.current_mode(), InputMode::from_index(n));
            prop_assert_eq!(ctx.save_pending, n >= InputMode::COUNT);
        }

        #[test]
        fn edits_stay_in_range(
            advances in 0usize..8,
            steps in proptest::collection::vec((any::<bool>(), 1u32..200), 1..100),
        ) {
            let mut fsm = Fsm::new(states::build_state_table(), InputMode::NoInput);
            let mut ctx = DeviceState::new(SystemConfig::default(), HsvColor::new(359, 100, 100));
            fsm.start(&mut ctx);
            for _ in 0..advances {
                fsm.advance(&mut ctx);
            }
            for (held, dt) in steps {
                ctx.button_held = held;
                ctx.now_ms = ctx.now_ms.wrapping_add(dt);
                fsm.tick(&mut ctx);
                prop_assert!(ctx.color.hue < HUE_MAX);
                prop_assert!(ctx.color.saturation <= PERCENT_MAX);
                prop_assert!(ctx.color.value <= PERCENT_MAX);
                prop_assert_eq!(ctx.drive, ctx.color.to_drive());
            }
        }
    }
}
