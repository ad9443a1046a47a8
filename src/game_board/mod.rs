pub mod bitboard;
pub mod model;
pub mod test_utils;

mod board;
mod move_search;

pub use bitboard::{render_mask_to_string, ColorBitBoards};
pub use board::GameBoard;
pub use model::{
    parse_move_text, Color, Move, MoveKind, MoveRecord, MoveState, Piece, PieceType, Position, Square,
};
