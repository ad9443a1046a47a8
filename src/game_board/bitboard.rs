use lazy_static::lazy_static;

use super::{Color, GameBoard, Piece, PieceType, Position, Square};

/// Derived 64-bit masks for one color, bit `row*8 + col` per square.
/// `occupied`: squares holding this color's pieces. `attacked`: squares this
/// color attacks or defends. `pinned`: this color's pieces shielding their
/// own king from an enemy slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorBitBoards {
    pub occupied: u64,
    pub attacked: u64,
    pub pinned: u64,
}

pub struct AttackTables {
    pub knight: [u64; 64],
    pub king: [u64; 64],
}

impl AttackTables {
    fn new() -> Self {
        const KNIGHT_OFFSETS: [(i8, i8); 8] =
            [(-2, -1), (-1, -2), (1, -2), (2, -1), (2, 1), (1, 2), (-1, 2), (-2, 1)];
        const KING_OFFSETS: [(i8, i8); 8] =
            [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

        Self {
            knight: Self::offset_table(&KNIGHT_OFFSETS),
            king: Self::offset_table(&KING_OFFSETS),
        }
    }

    fn offset_table(offsets: &[(i8, i8)]) -> [u64; 64] {
        let mut table = [0u64; 64];
        for row in 0..8 {
            for col in 0..8 {
                let origin = Position::new(row, col);
                let mut mask = 0u64;
                for &(drow, dcol) in offsets {
                    let target = origin.offset(drow, dcol);
                    if target.in_bounds() {
                        mask |= 1u64 << target.index();
                    }
                }
                table[origin.index()] = mask;
            }
        }
        table
    }
}

lazy_static! {
    pub static ref ATTACK_TABLES: AttackTables = AttackTables::new();
}

const ORTHOGONAL_DIRECTIONS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ALL_DIRECTIONS: [(i8, i8); 8] =
    [(-1, -1), (-1, 1), (1, -1), (1, 1), (0, -1), (0, 1), (-1, 0), (1, 0)];

impl GameBoard {
    /// The stateless bitboard computation: one full board scan, no caching.
    pub fn calculate_bitboards(&self, color: Color) -> ColorBitBoards {
        let mut boards = ColorBitBoards::default();
        for (pos, piece) in self.pieces_with_coordinates() {
            if piece.color != color {
                continue;
            }
            boards.occupied |= 1u64 << pos.index();
            boards.attacked |= self.attack_mask(pos, piece);
        }
        boards.pinned = self.pinned_mask(color);
        boards
    }

    /// Squares attacked (or defended) by the piece at `pos`.
    fn attack_mask(&self, pos: Position, piece: Piece) -> u64 {
        match piece.kind {
            PieceType::Knight => ATTACK_TABLES.knight[pos.index()],
            PieceType::King => ATTACK_TABLES.king[pos.index()],
            PieceType::Rook => self.ray_attack_mask(pos, &ORTHOGONAL_DIRECTIONS),
            PieceType::Bishop => self.ray_attack_mask(pos, &DIAGONAL_DIRECTIONS),
            PieceType::Queen => self.ray_attack_mask(pos, &ALL_DIRECTIONS),
            PieceType::Pawn => {
                let mut mask = 0u64;
                for dcol in [-1, 1] {
                    let target = pos.offset(piece.color.forward(), dcol);
                    if target.in_bounds() {
                        mask |= 1u64 << target.index();
                    }
                }
                mask
            }
        }
    }

    /// Ray attacks include the first occupied square in each direction: a
    /// defended occupant counts as attacked.
    fn ray_attack_mask(&self, origin: Position, directions: &[(i8, i8)]) -> u64 {
        let mut mask = 0u64;
        for &(drow, dcol) in directions {
            let mut current = origin;
            loop {
                current = current.offset(drow, dcol);
                if !current.in_bounds() {
                    break;
                }
                mask |= 1u64 << current.index();
                if self.piece_at(current) != Square::Empty {
                    break;
                }
            }
        }
        mask
    }

    /// Pieces of `color` that are the sole shield between their own king and
    /// an enemy slider on the matching ray.
    fn pinned_mask(&self, color: Color) -> u64 {
        let Some(king) = self.find_king_position(color) else {
            return 0;
        };

        let mut mask = 0u64;
        for &(drow, dcol) in &ALL_DIRECTIONS {
            let orthogonal = drow == 0 || dcol == 0;
            let mut current = king;
            let mut shield: Option<Position> = None;
            loop {
                current = current.offset(drow, dcol);
                if !current.in_bounds() {
                    break;
                }
                let Square::Occupied(piece) = self.piece_at(current) else {
                    continue;
                };
                if piece.color == color {
                    if shield.is_some() {
                        break; // two own pieces on the ray, neither is pinned
                    }
                    shield = Some(current);
                    continue;
                }
                if let Some(pinned) = shield {
                    let pins = match piece.kind {
                        PieceType::Queen => true,
                        PieceType::Rook => orthogonal,
                        PieceType::Bishop => !orthogonal,
                        _ => false,
                    };
                    if pins {
                        mask |= 1u64 << pinned.index();
                    }
                }
                break;
            }
        }
        mask
    }
}

/// Text grid of a 64-bit mask, oriented like `render_to_string`.
pub fn render_mask_to_string(mask: u64) -> String {
    let mut out = String::new();
    for row in (0..8i8).rev() {
        out.push_str(&format!("{} ", row + 1));
        for col in 0..8i8 {
            let bit = 1u64 << Position::new(row, col).index();
            out.push(' ');
            out.push(if mask & bit != 0 { '#' } else { '.' });
        }
        out.push('\n');
    }
    out.push_str("   a b c d e f g h\n");
    out
}
