pub mod controller;
pub mod state;

pub use controller::BoardController;
pub use state::{BoardState, BoardStatus};
