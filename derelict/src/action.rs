//! Discrete intents delivered by the input collaborator.

/// A player (or AI) intent for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Step or melee-bump in a direction.
    Move { dx: i32, dy: i32 },
    /// Pass the turn.
    Wait,
    /// Pick up an item at the current position.
    PickUp,
    /// Consume the inventory item at the given slot.
    UseItem(usize),
    /// Take the down stairs.
    Descend,
    /// Leave the game.
    Quit,
}
