#![cfg(test)]

use super::{Color, GameBoard, Move, MoveState, Piece, PieceType, Position, Square};

/// Builds a board holding the given unmoved pieces on their named squares.
pub fn board_with(pieces: &[(&str, Color, PieceType)]) -> GameBoard {
    let mut board = GameBoard::new();
    for &(square, color, kind) in pieces {
        place(&mut board, square, color, kind);
    }
    board
}

pub fn place(board: &mut GameBoard, square: &str, color: Color, kind: PieceType) {
    let pos = Position::from_algebraic(square).unwrap();
    board.set_square(pos, Square::Occupied(Piece::new(color, kind)));
}

pub fn place_moved(board: &mut GameBoard, square: &str, color: Color, kind: PieceType) {
    let pos = Position::from_algebraic(square).unwrap();
    board.set_square(
        pos,
        Square::Occupied(Piece {
            color,
            kind,
            move_state: MoveState::Moved,
        }),
    );
}

/// Compares generated moves from `from` against expected from-to strings,
/// ignoring order.
pub fn assert_moves(from: &str, generated: Vec<Move>, mut expected: Vec<&str>) {
    let origin = Position::from_algebraic(from).unwrap();
    let mut generated_converted: Vec<_> = generated.iter().map(|m| m.as_algebraic(origin)).collect();
    generated_converted.sort();
    expected.sort();

    assert_eq!(generated_converted, expected);
}
