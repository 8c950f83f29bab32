//! Shared supplies: the element draw bag and the wanderlust tile stacks.

pub mod draw_bag;
pub mod wanderlust;

pub use draw_bag::{DrawBag, INITIAL_PER_ELEMENT};
pub use wanderlust::{WanderlustStack, WanderlustTiles, STACKS, TILES_PER_STACK};
