use super::{Color, GameBoard, Move, MoveKind, MoveState, Piece, PieceType, Position, Square};

impl GameBoard {
    /// Pseudo-legal moves for the piece at `origin`. An empty square yields an
    /// empty list. No check on whose turn it is and no verification that the
    /// mover's king stays safe; that filtering belongs to the caller.
    pub fn generate_moves(&self, origin: Position) -> Vec<Move> {
        match self.piece_at(origin) {
            Square::Empty => Vec::new(),
            Square::Occupied(piece) => match piece.kind {
                PieceType::Pawn => self.generate_pawn_moves(origin, piece),
                PieceType::Knight => self.generate_knight_moves(origin, piece),
                PieceType::Bishop => self.generate_bishop_moves(origin, piece),
                PieceType::Rook => self.generate_rook_moves(origin, piece),
                PieceType::Queen => self.generate_queen_moves(origin, piece),
                PieceType::King => self.generate_king_moves(origin, piece),
            },
        }
    }

    fn generate_pawn_moves(&self, origin: Position, piece: Piece) -> Vec<Move> {
        let mut moves = Vec::new();
        let forward = piece.color.forward();

        // Capture diagonally
        for dcol in [-1, 1] {
            let target = origin.offset(forward, dcol);
            if !target.in_bounds() {
                continue;
            }
            if let Square::Occupied(other) = self.piece_at(target) {
                if other.color != piece.color {
                    Self::add_pawn_move_with_promotions(target, piece, &mut moves);
                }
            }
        }

        // En passant: only right after an enemy double push landed beside us.
        if let Some(record) = self.last_move() {
            if record.mv.kind == MoveKind::DoublePawnPush
                && record.piece.color != piece.color
                && record.mv.to.row == origin.row
                && (record.mv.to.col - origin.col).abs() == 1
            {
                let target = Position::new(origin.row + forward, record.mv.to.col);
                if target.in_bounds() && self.piece_at(target) == Square::Empty {
                    moves.push(Move::new(MoveKind::EnPassant, target));
                }
            }
        }

        self.add_pawn_push_move(origin, piece, 1, &mut moves);
        if piece.move_state == MoveState::NotMoved {
            self.add_pawn_push_move(origin, piece, 2, &mut moves);
        }

        moves
    }

    /// Adds the push `distance` rows ahead if the target and every square
    /// strictly between are in bounds and empty; otherwise adds nothing.
    fn add_pawn_push_move(&self, origin: Position, piece: Piece, distance: i8, moves: &mut Vec<Move>) {
        let forward = piece.color.forward();
        let target = origin.offset(forward * distance, 0);

        if !target.in_bounds() {
            return;
        }
        if self.piece_at(target) != Square::Empty {
            return;
        }
        for step in 1..distance {
            let between = origin.offset(forward * step, 0);
            if !between.in_bounds() || self.piece_at(between) != Square::Empty {
                return;
            }
        }

        if distance == 2 {
            moves.push(Move::new(MoveKind::DoublePawnPush, target));
        } else {
            Self::add_pawn_move_with_promotions(target, piece, moves);
        }
    }

    fn add_pawn_move_with_promotions(target: Position, piece: Piece, moves: &mut Vec<Move>) {
        let promotion_row = match piece.color {
            Color::White => 7,
            Color::Black => 0,
        };
        if target.row == promotion_row {
            for &promotion_piece in &[PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight] {
                moves.push(Move::new(MoveKind::Promotion, target).with_promotion(promotion_piece));
            }
        } else {
            moves.push(Move::standard(target));
        }
    }

    fn generate_knight_moves(&self, origin: Position, piece: Piece) -> Vec<Move> {
        const KNIGHT_OFFSETS: [(i8, i8); 8] =
            [(-2, -1), (-1, -2), (1, -2), (2, -1), (2, 1), (1, 2), (-1, 2), (-2, 1)];

        let mut moves = Vec::new();
        for &(drow, dcol) in &KNIGHT_OFFSETS {
            let target = origin.offset(drow, dcol);
            if !target.in_bounds() {
                continue;
            }
            if let Square::Occupied(other) = self.piece_at(target) {
                if other.color == piece.color {
                    continue;
                }
            }
            moves.push(Move::standard(target));
        }
        moves
    }

    fn generate_bishop_moves(&self, origin: Position, piece: Piece) -> Vec<Move> {
        const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
        self.generate_sliding_moves(origin, piece, &BISHOP_DIRECTIONS)
    }

    fn generate_rook_moves(&self, origin: Position, piece: Piece) -> Vec<Move> {
        const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
        self.generate_sliding_moves(origin, piece, &ROOK_DIRECTIONS)
    }

    fn generate_queen_moves(&self, origin: Position, piece: Piece) -> Vec<Move> {
        const QUEEN_DIRECTIONS: [(i8, i8); 8] =
            [(-1, -1), (-1, 1), (1, -1), (1, 1), (0, -1), (0, 1), (-1, 0), (1, 0)];
        self.generate_sliding_moves(origin, piece, &QUEEN_DIRECTIONS)
    }

    /// Ray casting shared by bishop, rook and queen: step outward per
    /// direction, stop on the edge, stop after a capture, stop before a
    /// same-color blocker.
    fn generate_sliding_moves(&self, origin: Position, piece: Piece, directions: &[(i8, i8)]) -> Vec<Move> {
        let mut moves = Vec::new();
        for &(drow, dcol) in directions {
            let mut current = origin;
            loop {
                current = current.offset(drow, dcol);
                if !current.in_bounds() {
                    break;
                }
                match self.piece_at(current) {
                    Square::Empty => moves.push(Move::standard(current)),
                    Square::Occupied(other) => {
                        if other.color != piece.color {
                            moves.push(Move::standard(current));
                        }
                        break;
                    }
                }
            }
        }
        moves
    }

    fn generate_king_moves(&self, origin: Position, piece: Piece) -> Vec<Move> {
        const KING_OFFSETS: [(i8, i8); 8] =
            [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

        let enemy_attacked = self.calculate_bitboards(piece.color.opposite()).attacked;

        let mut moves = Vec::new();
        for &(drow, dcol) in &KING_OFFSETS {
            let target = origin.offset(drow, dcol);
            if !target.in_bounds() {
                continue;
            }
            if enemy_attacked & (1u64 << target.index()) != 0 {
                continue;
            }
            if let Square::Occupied(other) = self.piece_at(target) {
                if other.color == piece.color {
                    continue;
                }
            }
            moves.push(Move::standard(target));
        }

        self.add_castle_moves(origin, piece, enemy_attacked, &mut moves);
        moves
    }

    fn add_castle_moves(&self, origin: Position, piece: Piece, enemy_attacked: u64, moves: &mut Vec<Move>) {
        if piece.move_state == MoveState::Moved {
            return;
        }
        if enemy_attacked & (1u64 << origin.index()) != 0 {
            return; // castling out of check
        }
        self.try_castle(origin, piece, enemy_attacked, MoveKind::ShortCastle, moves);
        self.try_castle(origin, piece, enemy_attacked, MoveKind::LongCastle, moves);
    }

    /// Short castle runs toward column 0, long castle toward column 7. The
    /// king travels two columns; the rook must sit unmoved on the corner with
    /// a clear row between, and the king may not cross an attacked square.
    fn try_castle(
        &self,
        origin: Position,
        piece: Piece,
        enemy_attacked: u64,
        kind: MoveKind,
        moves: &mut Vec<Move>,
    ) {
        let (rook_col, direction) = match kind {
            MoveKind::ShortCastle => (0, -1),
            MoveKind::LongCastle => (7, 1),
            _ => return,
        };

        let rook_pos = Position::new(origin.row, rook_col);
        let Square::Occupied(rook) = self.piece_at(rook_pos) else {
            return;
        };
        if rook.kind != PieceType::Rook || rook.color != piece.color || rook.move_state == MoveState::Moved {
            return;
        }

        let between = (origin.col - rook_col).abs() - 1;
        if self.row_occupied(origin, direction, between) {
            return;
        }

        for step in 1..=2 {
            let crossed = origin.offset(0, direction * step);
            if !crossed.in_bounds() {
                return;
            }
            if enemy_attacked & (1u64 << crossed.index()) != 0 {
                return;
            }
        }

        moves.push(Move::new(kind, origin.offset(0, direction * 2)));
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::{assert_moves, board_with, place, place_moved};
    use super::*;

    #[test]
    fn test_generate_moves_empty_square() {
        let board = GameBoard::new();
        assert!(board.generate_moves(Position::from_algebraic("e4").unwrap()).is_empty());
    }

    #[test]
    fn test_generate_pawn_moves() {
        // A pawn that has already moved pushes a single square.
        let mut board = GameBoard::new();
        place_moved(&mut board, "e4", Color::White, PieceType::Pawn);
        assert_moves("e4", board.generate_moves(Position::from_algebraic("e4").unwrap()), vec!["e4e5"]);

        // An unmoved pawn also has the double push.
        let board = board_with(&[("d2", Color::White, PieceType::Pawn)]);
        assert_moves(
            "d2",
            board.generate_moves(Position::from_algebraic("d2").unwrap()),
            vec!["d2d3", "d2d4"],
        );

        // Black pawns run the other way.
        let board = board_with(&[("a7", Color::Black, PieceType::Pawn)]);
        assert_moves(
            "a7",
            board.generate_moves(Position::from_algebraic("a7").unwrap()),
            vec!["a7a6", "a7a5"],
        );

        // Diagonal squares are captures only, never quiet moves.
        let board = board_with(&[
            ("b2", Color::White, PieceType::Pawn),
            ("a3", Color::Black, PieceType::Knight),
            ("c3", Color::Black, PieceType::Bishop),
        ]);
        assert_moves(
            "b2",
            board.generate_moves(Position::from_algebraic("b2").unwrap()),
            vec!["b2b3", "b2b4", "b2a3", "b2c3"],
        );

        // A same-color piece on the diagonal is not a capture target.
        let board = board_with(&[
            ("a7", Color::Black, PieceType::Pawn),
            ("b6", Color::Black, PieceType::Pawn),
        ]);
        assert_moves(
            "a7",
            board.generate_moves(Position::from_algebraic("a7").unwrap()),
            vec!["a7a6", "a7a5"],
        );
    }

    #[test]
    fn test_pawn_push_blocked() {
        // A blocker directly ahead kills both pushes.
        let board = board_with(&[
            ("a3", Color::White, PieceType::Pawn),
            ("a4", Color::White, PieceType::Pawn),
        ]);
        assert_moves("a3", board.generate_moves(Position::from_algebraic("a3").unwrap()), vec![]);

        let board = board_with(&[
            ("c2", Color::White, PieceType::Pawn),
            ("c3", Color::Black, PieceType::Rook),
        ]);
        assert_moves("c2", board.generate_moves(Position::from_algebraic("c2").unwrap()), vec![]);

        // A blocker on the double-push square only kills the double push.
        let board = board_with(&[
            ("c2", Color::White, PieceType::Pawn),
            ("c4", Color::Black, PieceType::Rook),
        ]);
        assert_moves("c2", board.generate_moves(Position::from_algebraic("c2").unwrap()), vec!["c2c3"]);
    }

    #[test]
    fn test_pawn_promotion_moves() {
        let mut board = GameBoard::new();
        place_moved(&mut board, "g7", Color::White, PieceType::Pawn);
        assert_moves(
            "g7",
            board.generate_moves(Position::from_algebraic("g7").unwrap()),
            vec!["g7g8q", "g7g8r", "g7g8b", "g7g8n"],
        );

        // Promotion by capture alongside the push.
        let mut board = board_with(&[("d8", Color::Black, PieceType::Rook)]);
        place_moved(&mut board, "c7", Color::White, PieceType::Pawn);
        assert_moves(
            "c7",
            board.generate_moves(Position::from_algebraic("c7").unwrap()),
            vec!["c7c8q", "c7c8r", "c7c8b", "c7c8n", "c7d8q", "c7d8r", "c7d8b", "c7d8n"],
        );
    }

    #[test]
    fn test_pawn_en_passant_generation() {
        let mut board = board_with(&[("e7", Color::Black, PieceType::Pawn)]);
        place_moved(&mut board, "d5", Color::White, PieceType::Pawn);
        board.execute_move(
            Move::new(MoveKind::DoublePawnPush, Position::from_algebraic("e5").unwrap()),
            Position::from_algebraic("e7").unwrap(),
        );

        let moves = board.generate_moves(Position::from_algebraic("d5").unwrap());
        assert_moves("d5", moves.clone(), vec!["d5d6", "d5e6"]);
        let en_passant = moves.iter().find(|m| m.kind == MoveKind::EnPassant).unwrap();
        assert_eq!(en_passant.to, Position::from_algebraic("e6").unwrap());
    }

    #[test]
    fn test_pawn_en_passant_requires_fresh_double_push() {
        // The same position reached by a single push offers no en passant.
        let mut board = board_with(&[("e6", Color::Black, PieceType::Pawn)]);
        place_moved(&mut board, "d5", Color::White, PieceType::Pawn);
        board.execute_move(
            Move::standard(Position::from_algebraic("e5").unwrap()),
            Position::from_algebraic("e6").unwrap(),
        );
        assert_moves(
            "d5",
            board.generate_moves(Position::from_algebraic("d5").unwrap()),
            vec!["d5d6"],
        );
    }

    #[test]
    fn test_generate_knight_moves() {
        let board = board_with(&[("d4", Color::White, PieceType::Knight)]);
        assert_moves(
            "d4",
            board.generate_moves(Position::from_algebraic("d4").unwrap()),
            vec!["d4b3", "d4c2", "d4e2", "d4f3", "d4f5", "d4e6", "d4c6", "d4b5"],
        );

        // Corner knight.
        let board = board_with(&[("a1", Color::White, PieceType::Knight)]);
        assert_moves(
            "a1",
            board.generate_moves(Position::from_algebraic("a1").unwrap()),
            vec!["a1b3", "a1c2"],
        );
    }

    #[test]
    fn test_knight_surrounded() {
        let targets = ["b3", "c2", "e2", "f3", "f5", "e6", "c6", "b5"];

        // All eight targets friendly: no moves.
        let mut board = board_with(&[("d4", Color::White, PieceType::Knight)]);
        for square in targets {
            place(&mut board, square, Color::White, PieceType::Pawn);
        }
        assert_moves("d4", board.generate_moves(Position::from_algebraic("d4").unwrap()), vec![]);

        // All eight targets hostile: eight captures.
        let mut board = board_with(&[("d4", Color::White, PieceType::Knight)]);
        for square in targets {
            place(&mut board, square, Color::Black, PieceType::Pawn);
        }
        assert_moves(
            "d4",
            board.generate_moves(Position::from_algebraic("d4").unwrap()),
            vec!["d4b3", "d4c2", "d4e2", "d4f3", "d4f5", "d4e6", "d4c6", "d4b5"],
        );
    }

    #[test]
    fn test_generate_rook_moves() {
        let board = board_with(&[("d4", Color::White, PieceType::Rook)]);
        assert_moves(
            "d4",
            board.generate_moves(Position::from_algebraic("d4").unwrap()),
            vec![
                "d4d1", "d4d2", "d4d3", "d4d5", "d4d6", "d4d7", "d4d8", "d4a4", "d4b4", "d4c4", "d4e4",
                "d4f4", "d4g4", "d4h4",
            ],
        );
    }

    #[test]
    fn test_sliding_terminates_on_blockers() {
        // Same-color blocker three squares right: exactly two moves that way.
        let board = board_with(&[
            ("a4", Color::White, PieceType::Rook),
            ("d4", Color::White, PieceType::Pawn),
        ]);
        let moves = board.generate_moves(Position::from_algebraic("a4").unwrap());
        let rightward = moves
            .iter()
            .filter(|m| m.to.row == 3 && m.to.col > 0)
            .count();
        assert_eq!(rightward, 2);

        // Opposite-color blocker three squares right: three moves, capture included.
        let board = board_with(&[
            ("a4", Color::White, PieceType::Rook),
            ("d4", Color::Black, PieceType::Pawn),
        ]);
        let moves = board.generate_moves(Position::from_algebraic("a4").unwrap());
        let rightward: Vec<_> = moves.iter().filter(|m| m.to.row == 3 && m.to.col > 0).collect();
        assert_eq!(rightward.len(), 3);
        assert!(rightward.iter().any(|m| m.to == Position::from_algebraic("d4").unwrap()));
    }

    #[test]
    fn test_generate_bishop_moves() {
        let board = board_with(&[
            ("f6", Color::White, PieceType::Bishop),
            ("g7", Color::Black, PieceType::Rook),
            ("d4", Color::White, PieceType::Pawn),
        ]);
        assert_moves(
            "f6",
            board.generate_moves(Position::from_algebraic("f6").unwrap()),
            vec!["f6d8", "f6e7", "f6g5", "f6h4", "f6e5", "f6g7"],
        );
    }

    #[test]
    fn test_generate_queen_moves() {
        let board = board_with(&[("d4", Color::White, PieceType::Queen)]);
        assert_moves(
            "d4",
            board.generate_moves(Position::from_algebraic("d4").unwrap()),
            vec![
                "d4d1", "d4d2", "d4d3", "d4d5", "d4d6", "d4d7", "d4d8", "d4a4", "d4b4", "d4c4", "d4e4",
                "d4f4", "d4g4", "d4h4", "d4a7", "d4b6", "d4c5", "d4e3", "d4f2", "d4g1", "d4a1", "d4b2",
                "d4c3", "d4e5", "d4f6", "d4g7", "d4h8",
            ],
        );
    }

    #[test]
    fn test_generate_king_moves_adjacency() {
        let board = board_with(&[("d3", Color::White, PieceType::King)]);
        assert_moves(
            "d3",
            board.generate_moves(Position::from_algebraic("d3").unwrap()),
            vec!["d3c2", "d3c3", "d3c4", "d3d2", "d3d4", "d3e2", "d3e3", "d3e4"],
        );

        // Corner king.
        let board = board_with(&[("h1", Color::Black, PieceType::King)]);
        assert_moves(
            "h1",
            board.generate_moves(Position::from_algebraic("h1").unwrap()),
            vec!["h1h2", "h1g1", "h1g2"],
        );
    }

    #[test]
    fn test_king_excludes_attacked_squares() {
        // A black rook on e8 covers the whole e-file.
        let board = board_with(&[
            ("d3", Color::White, PieceType::King),
            ("e8", Color::Black, PieceType::Rook),
        ]);
        assert_moves(
            "d3",
            board.generate_moves(Position::from_algebraic("d3").unwrap()),
            vec!["d3c2", "d3c3", "d3c4", "d3d2", "d3d4"],
        );
    }

    #[test]
    fn test_king_cannot_capture_defended_piece() {
        // An undefended knight is a normal capture (the e6 pawn covers d5 and
        // f5, not d4).
        let board = board_with(&[
            ("d3", Color::White, PieceType::King),
            ("d4", Color::Black, PieceType::Knight),
            ("e6", Color::Black, PieceType::Pawn),
        ]);
        let moves = board.generate_moves(Position::from_algebraic("d3").unwrap());
        assert!(moves.iter().any(|m| m.to == Position::from_algebraic("d4").unwrap()));

        // Move the pawn to e5 and it defends d4: the capture disappears.
        let board = board_with(&[
            ("d3", Color::White, PieceType::King),
            ("d4", Color::Black, PieceType::Knight),
            ("e5", Color::Black, PieceType::Pawn),
        ]);
        let moves = board.generate_moves(Position::from_algebraic("d3").unwrap());
        assert!(!moves.iter().any(|m| m.to == Position::from_algebraic("d4").unwrap()));
    }

    #[test]
    fn test_castling_both_sides_available() {
        let board = board_with(&[
            ("d1", Color::White, PieceType::King),
            ("a1", Color::White, PieceType::Rook),
            ("h1", Color::White, PieceType::Rook),
        ]);
        let moves = board.generate_moves(Position::from_algebraic("d1").unwrap());
        assert_moves(
            "d1",
            moves.clone(),
            vec!["d1c1", "d1c2", "d1d2", "d1e2", "d1e1", "d1b1", "d1f1"],
        );
        assert!(moves
            .iter()
            .any(|m| m.kind == MoveKind::ShortCastle && m.to == Position::from_algebraic("b1").unwrap()));
        assert!(moves
            .iter()
            .any(|m| m.kind == MoveKind::LongCastle && m.to == Position::from_algebraic("f1").unwrap()));
    }

    #[test]
    fn test_castling_blocked_path() {
        let board = board_with(&[
            ("d1", Color::White, PieceType::King),
            ("a1", Color::White, PieceType::Rook),
            ("h1", Color::White, PieceType::Rook),
            ("c1", Color::White, PieceType::Bishop),
            ("g1", Color::White, PieceType::Knight),
        ]);
        let moves = board.generate_moves(Position::from_algebraic("d1").unwrap());
        assert!(!moves.iter().any(|m| m.kind == MoveKind::ShortCastle));
        assert!(!moves.iter().any(|m| m.kind == MoveKind::LongCastle));
    }

    #[test]
    fn test_castling_requires_unmoved_pieces() {
        // Moved rook.
        let mut board = board_with(&[("d1", Color::White, PieceType::King)]);
        place_moved(&mut board, "a1", Color::White, PieceType::Rook);
        let moves = board.generate_moves(Position::from_algebraic("d1").unwrap());
        assert!(!moves.iter().any(|m| m.kind == MoveKind::ShortCastle));

        // Moved king.
        let mut board = board_with(&[("a1", Color::White, PieceType::Rook)]);
        place_moved(&mut board, "d1", Color::White, PieceType::King);
        let moves = board.generate_moves(Position::from_algebraic("d1").unwrap());
        assert!(!moves.iter().any(|m| m.kind == MoveKind::ShortCastle));

        // Wrong piece on the corner.
        let board = board_with(&[
            ("d1", Color::White, PieceType::King),
            ("a1", Color::White, PieceType::Knight),
        ]);
        let moves = board.generate_moves(Position::from_algebraic("d1").unwrap());
        assert!(!moves.iter().any(|m| m.kind == MoveKind::ShortCastle));
    }

    #[test]
    fn test_castling_blocked_by_attacks() {
        // A rook covering c1 blocks the king's crossing square.
        let board = board_with(&[
            ("d1", Color::White, PieceType::King),
            ("a1", Color::White, PieceType::Rook),
            ("c8", Color::Black, PieceType::Rook),
        ]);
        let moves = board.generate_moves(Position::from_algebraic("d1").unwrap());
        assert!(!moves.iter().any(|m| m.kind == MoveKind::ShortCastle));

        // A rook covering d1 itself means castling out of check.
        let board = board_with(&[
            ("d1", Color::White, PieceType::King),
            ("a1", Color::White, PieceType::Rook),
            ("d8", Color::Black, PieceType::Rook),
        ]);
        let moves = board.generate_moves(Position::from_algebraic("d1").unwrap());
        assert!(!moves.iter().any(|m| m.kind == MoveKind::ShortCastle));

        // An attack on the rook's own square is irrelevant: the king only
        // crosses c1 and b1.
        let board = board_with(&[
            ("d1", Color::White, PieceType::King),
            ("a1", Color::White, PieceType::Rook),
            ("a8", Color::Black, PieceType::Rook),
        ]);
        let moves = board.generate_moves(Position::from_algebraic("d1").unwrap());
        assert!(moves.iter().any(|m| m.kind == MoveKind::ShortCastle));
    }

    #[test]
    fn test_castling_kinds_on_default_board() {
        // Fully populated back rank: no castle moves at all.
        let mut board = GameBoard::new();
        board.load_default_board();
        let moves = board.generate_moves(Position::from_algebraic("d1").unwrap());
        assert!(moves.is_empty());
    }
}
