pub mod config;
pub mod error;
pub mod feed;
pub mod poller;

pub use config::{BoardConfig, FieldMap, FieldSpec, ParseMode, RowValidity};
pub use error::PollError;
pub use poller::{BoardController, BoardState, BoardStatus};
