use super::bitboard::ColorBitBoards;
use super::{Color, Move, MoveKind, MoveRecord, MoveState, Piece, PieceType, Position, Square};

/// Back rank layout, columns 0..7, mirrored for both colors.
const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::King,
    PieceType::Queen,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameBoard {
    pub squares: [[Square; 8]; 8],
    last_move: Option<MoveRecord>,
    bitboards: [ColorBitBoards; 2],
}

impl GameBoard {
    /// Creates an empty board with no move history.
    pub fn new() -> Self {
        Self {
            squares: [[Square::Empty; 8]; 8],
            last_move: None,
            bitboards: [ColorBitBoards::default(); 2],
        }
    }

    /// Clears the board, places the standard starting position and resets the
    /// move history, then recomputes both color bitboards.
    pub fn load_default_board(&mut self) {
        self.clear();
        for (col, &kind) in BACK_RANK.iter().enumerate() {
            self.set_square(Position::new(0, col as i8), Square::Occupied(Piece::new(Color::White, kind)));
            self.set_square(Position::new(1, col as i8), Square::Occupied(Piece::new(Color::White, PieceType::Pawn)));
            self.set_square(Position::new(7, col as i8), Square::Occupied(Piece::new(Color::Black, kind)));
            self.set_square(Position::new(6, col as i8), Square::Occupied(Piece::new(Color::Black, PieceType::Pawn)));
        }
        self.last_move = None;
        self.refresh_bitboards();
    }

    /// Sets every slot to `Square::Empty`. Does not touch the move history.
    pub fn clear(&mut self) {
        self.squares = [[Square::Empty; 8]; 8];
    }

    /// Checked slot lookup. Panics on an out-of-bounds position: callers doing
    /// offset arithmetic validate with `Position::in_bounds` first.
    pub fn piece_at(&self, pos: Position) -> Square {
        assert!(pos.in_bounds(), "piece_at out of bounds: {:?}", pos);
        self.squares[pos.row as usize][pos.col as usize]
    }

    pub(crate) fn set_square(&mut self, pos: Position, square: Square) {
        assert!(pos.in_bounds(), "set_square out of bounds: {:?}", pos);
        self.squares[pos.row as usize][pos.col as usize] = square;
    }

    /// Copies the piece at `from` onto `to`, marking it moved and emptying
    /// `from`. A capture is a plain overwrite; no legality checks happen here.
    pub fn move_piece(&mut self, from: Position, to: Position) {
        let Square::Occupied(mut piece) = self.piece_at(from) else {
            panic!("move_piece from empty square {}", from.as_algebraic());
        };
        piece.move_state = MoveState::Moved;
        self.set_square(to, Square::Occupied(piece));
        self.set_square(from, Square::Empty);
    }

    /// Applies `mv` from `from`, including the side effects of the special
    /// move kinds, then records the move and recomputes both color bitboards.
    /// Every square a branch writes is validated before the first write.
    pub fn execute_move(&mut self, mv: Move, from: Position) {
        let Square::Occupied(piece) = self.piece_at(from) else {
            panic!("execute_move from empty square {}", from.as_algebraic());
        };

        match mv.kind {
            MoveKind::Standard | MoveKind::DoublePawnPush => {
                self.move_piece(from, mv.to);
            }
            MoveKind::EnPassant => {
                // The captured pawn sits one row behind the destination, on
                // the rank the mover passed through.
                let captured = mv.to.offset(-piece.color.forward(), 0);
                assert!(
                    mv.to.in_bounds() && captured.in_bounds(),
                    "en passant squares out of bounds: {:?} -> {:?}",
                    mv.to,
                    captured
                );
                self.move_piece(from, mv.to);
                self.set_square(captured, Square::Empty);
            }
            MoveKind::Promotion => {
                self.move_piece(from, mv.to);
                if let Square::Occupied(mut promoted) = self.piece_at(mv.to) {
                    promoted.kind = mv.promotion.unwrap_or(PieceType::Queen);
                    self.set_square(mv.to, Square::Occupied(promoted));
                }
            }
            MoveKind::ShortCastle => {
                let rook_from = mv.to.offset(0, -1);
                let rook_to = mv.to.offset(0, 1);
                assert!(
                    mv.to.in_bounds() && rook_from.in_bounds() && rook_to.in_bounds(),
                    "short castle squares out of bounds: {:?}",
                    mv.to
                );
                self.move_piece(from, mv.to);
                self.set_square(rook_from, Square::Empty);
                self.set_square(rook_to, Square::Occupied(Piece {
                    color: piece.color,
                    kind: PieceType::Rook,
                    move_state: MoveState::Moved,
                }));
            }
            MoveKind::LongCastle => {
                let rook_from = mv.to.offset(0, 2);
                let rook_to = mv.to.offset(0, -1);
                assert!(
                    mv.to.in_bounds() && rook_from.in_bounds() && rook_to.in_bounds(),
                    "long castle squares out of bounds: {:?}",
                    mv.to
                );
                self.move_piece(from, mv.to);
                self.set_square(rook_from, Square::Empty);
                self.set_square(rook_to, Square::Occupied(Piece {
                    color: piece.color,
                    kind: PieceType::Rook,
                    move_state: MoveState::Moved,
                }));
            }
        }

        self.set_last_move(mv, piece);
        self.refresh_bitboards();
    }

    pub fn set_last_move(&mut self, mv: Move, piece: Piece) {
        self.last_move = Some(MoveRecord { mv, piece });
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.last_move.as_ref()
    }

    /// The color to move: opposite of the last mover, White on a fresh board.
    pub fn side_to_move(&self) -> Color {
        match &self.last_move {
            Some(record) => record.piece.color.opposite(),
            None => Color::White,
        }
    }

    /// Scans `count` squares from `from`, stepping `direction` along the
    /// column axis (the starting square itself is not examined). True if any
    /// scanned square is out of bounds or occupied.
    pub fn row_occupied(&self, from: Position, direction: i8, count: i8) -> bool {
        for step in 1..=count {
            let pos = from.offset(0, direction * step);
            if !pos.in_bounds() {
                return true;
            }
            if self.piece_at(pos) != Square::Empty {
                return true;
            }
        }
        false
    }

    /// The bitboards cached by the last `execute_move`/`load_default_board`.
    /// For a board whose squares were edited by hand, `calculate_bitboards`
    /// is the authoritative computation.
    pub fn bitboards(&self, color: Color) -> ColorBitBoards {
        self.bitboards[color.index()]
    }

    pub(crate) fn refresh_bitboards(&mut self) {
        self.bitboards = [
            self.calculate_bitboards(Color::White),
            self.calculate_bitboards(Color::Black),
        ];
    }

    /// Returns an iterator over all pieces on the board with their positions.
    pub fn pieces_with_coordinates(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        (0..8i8).flat_map(move |row| {
            (0..8i8).filter_map(move |col| {
                let pos = Position::new(row, col);
                match self.squares[row as usize][col as usize] {
                    Square::Occupied(piece) => Some((pos, piece)),
                    Square::Empty => None,
                }
            })
        })
    }

    pub fn find_king_position(&self, color: Color) -> Option<Position> {
        self.pieces_with_coordinates()
            .find(|(_, piece)| piece.color == color && piece.kind == PieceType::King)
            .map(|(pos, _)| pos)
    }

    pub fn render_to_string(&self) -> String {
        let mut board_representation = String::new();
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");
        board_representation.push_str("  ┌───┬───┬───┬───┬───┬───┬───┬───┐\n");

        for row in (0..8).rev() {
            // Render rows from top (8) to bottom (1)
            board_representation.push_str(&format!("{} │", row + 1));
            for col in 0..8 {
                let square = match &self.squares[row][col] {
                    Square::Empty => ' ',
                    Square::Occupied(piece) => piece.to_char(),
                };
                board_representation.push_str(&format!(" {} │", square));
            }
            board_representation.push_str(&format!(" {}\n", row + 1));

            if row > 0 {
                board_representation.push_str("  ├───┼───┼───┼───┼───┼───┼───┼───┤\n");
            }
        }

        board_representation.push_str("  └───┴───┴───┴───┴───┴───┴───┴───┘\n");
        board_representation.push_str("    a   b   c   d   e   f   g   h  \n");

        board_representation
    }
}

impl Default for GameBoard {
    fn default() -> Self {
        Self::new()
    }
}
