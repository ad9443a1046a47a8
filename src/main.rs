mod game_board;

use clap::{arg, command, Command};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use game_board::{parse_move_text, render_mask_to_string, Color, GameBoard, Position, Square};

fn main() {
    let matches = command!()
        .propagate_version(true)
        .subcommand(
            Command::new("show")
                .about("Print the board, optionally after replaying moves")
                .arg(
                    arg!(
                    -m --moves <moves> "Moves to replay from the initial position"
                            )
                    .num_args(1..)
                    .required(false)
                    .value_parser(clap::value_parser!(String)),
                )
                .arg(arg!(--"debug-occupancy" "Print both occupancy masks"))
                .arg(arg!(--"debug-attacks" "Print both attack masks"))
                .arg(arg!(--"debug-pinned" "Print both pinned masks")),
        )
        .subcommand(
            Command::new("moves")
                .about("List pseudo-legal moves from a square")
                .arg(arg!(-s --square <SQUARE> "Origin square, e.g. d2").required(true))
                .arg(
                    arg!(
                    -m --moves <moves> "Moves to replay from the initial position"
                            )
                    .num_args(1..)
                    .required(false)
                    .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new("count")
                .about("Tabulate the pseudo-legal move count of every piece")
                .arg(
                    arg!(
                    -m --moves <moves> "Moves to replay from the initial position"
                            )
                    .num_args(1..)
                    .required(false)
                    .value_parser(clap::value_parser!(String)),
                ),
        )
        .get_matches();

    let result = match matches.subcommand() {
        Some(("show", arg_matches)) => {
            let debug_masks = DebugMasks {
                occupancy: arg_matches.get_flag("debug-occupancy"),
                attacks: arg_matches.get_flag("debug-attacks"),
                pinned: arg_matches.get_flag("debug-pinned"),
            };
            board_after(replayed_moves(arg_matches)).map(|board| show(&board, &debug_masks))
        }
        Some(("moves", arg_matches)) => {
            let square = arg_matches.get_one::<String>("square").unwrap();
            board_after(replayed_moves(arg_matches)).and_then(|board| list_moves(&board, square))
        }
        Some(("count", arg_matches)) => {
            board_after(replayed_moves(arg_matches)).map(|board| count_moves(&board))
        }
        None => board_after(Vec::new()).map(|board| show(&board, &DebugMasks::default())),
        _ => unreachable!("Exhausted list of subcommands"),
    };

    if let Err(err) = result {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

#[derive(Default)]
struct DebugMasks {
    occupancy: bool,
    attacks: bool,
    pinned: bool,
}

fn replayed_moves(arg_matches: &clap::ArgMatches) -> Vec<String> {
    arg_matches
        .get_many::<String>("moves")
        .unwrap_or_default()
        .filter(|v| !v.is_empty())
        .cloned()
        .collect()
}

/// The default position with the given moves replayed, each validated against
/// the generator the way the interactive layer validates a drop.
fn board_after(moves: Vec<String>) -> Result<GameBoard, String> {
    let mut board = GameBoard::new();
    board.load_default_board();
    for text in &moves {
        apply_move_text(&mut board, text)?;
    }
    Ok(board)
}

fn apply_move_text(board: &mut GameBoard, text: &str) -> Result<(), String> {
    let (from, to, promotion) = parse_move_text(text)?;

    let mover = match board.piece_at(from) {
        Square::Occupied(piece) => piece,
        Square::Empty => return Err(format!("No piece on {}", from.as_algebraic())),
    };
    if mover.color != board.side_to_move() {
        return Err(format!(
            "It is {:?}'s turn, {} holds a {:?} piece",
            board.side_to_move(),
            from.as_algebraic(),
            mover.color
        ));
    }

    let mv = board
        .generate_moves(from)
        .into_iter()
        .find(|m| m.to == to && (promotion.is_none() || m.promotion == promotion))
        .ok_or_else(|| format!("Invalid move: {}", text))?;
    board.execute_move(mv, from);
    Ok(())
}

fn show(board: &GameBoard, debug_masks: &DebugMasks) {
    println!("{}", board.render_to_string());
    println!("{:?} to move", board.side_to_move());

    for color in [Color::White, Color::Black] {
        let bitboards = board.bitboards(color);
        if debug_masks.occupancy {
            println!("\n{:?} occupancy:", color);
            println!("{}", render_mask_to_string(bitboards.occupied));
        }
        if debug_masks.attacks {
            println!("\n{:?} attacks:", color);
            println!("{}", render_mask_to_string(bitboards.attacked));
        }
        if debug_masks.pinned {
            println!("\n{:?} pinned:", color);
            println!("{}", render_mask_to_string(bitboards.pinned));
        }
    }
}

fn list_moves(board: &GameBoard, square: &str) -> Result<(), String> {
    let origin = Position::from_algebraic(square)?;
    let moves = board.generate_moves(origin);
    if moves.is_empty() {
        println!("No moves available from {}", origin.as_algebraic());
        return Ok(());
    }
    for mv in moves {
        println!("{}", mv.as_algebraic(origin));
    }
    Ok(())
}

#[derive(Tabled)]
struct SquareRow {
    square: String,
    piece: String,
    color: String,
    moves: usize,
}

fn count_moves(board: &GameBoard) {
    let mut table_rows = Vec::new();
    for (pos, piece) in board.pieces_with_coordinates() {
        table_rows.push(SquareRow {
            square: pos.as_algebraic(),
            piece: piece.kind.to_string(),
            color: format!("{:?}", piece.color),
            moves: board.generate_moves(pos).len(),
        });
    }
    println!("{}", Table::new(table_rows).with(Style::modern()));
}
