pub mod client;
pub mod error;
mod moves;
mod roster;
pub mod types;

pub use client::BinopsClient;
pub use error::ClientError;
pub use types::{
    AssignToShift, AssignToUser, BulkAssignMoves, CancelMoveRequest, ConflictOverrides,
    CreateMoveRequest, MoveRequestUpdate,
};
