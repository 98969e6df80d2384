use anyhow::{Context, Result, bail};
use std::fmt;

pub const GRID_WIDTH: usize = 4;
pub const BOARD_CELLS: usize = GRID_WIDTH * GRID_WIDTH;

// Applicability of each slide direction, indexed by blank position.
// Left is blocked in the leftmost column, Right in the rightmost,
// Up in the top row, Down in the bottom row.
#[rustfmt::skip]
const APPLICABLE_LEFT: [bool; BOARD_CELLS] = [
    false, true, true, true,
    false, true, true, true,
    false, true, true, true,
    false, true, true, true,
];
#[rustfmt::skip]
const APPLICABLE_RIGHT: [bool; BOARD_CELLS] = [
    true, true, true, false,
    true, true, true, false,
    true, true, true, false,
    true, true, true, false,
];
#[rustfmt::skip]
const APPLICABLE_UP: [bool; BOARD_CELLS] = [
    false, false, false, false,
    true,  true,  true,  true,
    true,  true,  true,  true,
    true,  true,  true,  true,
];
#[rustfmt::skip]
const APPLICABLE_DOWN: [bool; BOARD_CELLS] = [
    true,  true,  true,  true,
    true,  true,  true,  true,
    true,  true,  true,  true,
    false, false, false, false,
];

/// A slide of the blank in one of the four grid directions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Move {
    Left,
    Right,
    Up,
    Down,
}

impl Move {
    /// Canonical expansion order used by the search.
    pub const ALL: [Move; 4] = [Move::Left, Move::Right, Move::Up, Move::Down];

    /// The move that exactly undoes this one.
    pub fn reverse(self) -> Self {
        match self {
            Move::Left => Move::Right,
            Move::Right => Move::Left,
            Move::Up => Move::Down,
            Move::Down => Move::Up,
        }
    }

    /// Whether sliding the blank in this direction stays on the grid.
    pub fn applicable(self, blank: usize) -> bool {
        match self {
            Move::Left => APPLICABLE_LEFT[blank],
            Move::Right => APPLICABLE_RIGHT[blank],
            Move::Up => APPLICABLE_UP[blank],
            Move::Down => APPLICABLE_DOWN[blank],
        }
    }

    /// Index delta from the blank to the tile that slides into it.
    pub fn offset(self) -> isize {
        match self {
            Move::Left => -1,
            Move::Right => 1,
            Move::Up => -(GRID_WIDTH as isize),
            Move::Down => GRID_WIDTH as isize,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Move::Left => 'L',
            Move::Right => 'R',
            Move::Up => 'U',
            Move::Down => 'D',
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Left => "Left",
            Move::Right => "Right",
            Move::Up => "Up",
            Move::Down => "Down",
        };
        write!(f, "{name}")
    }
}

pub fn format_moves(moves: &[Move]) -> String {
    let mut output = String::new();
    for (i, mv) in moves.iter().enumerate() {
        if i > 0 {
            output.push(if i % 16 == 0 { '\n' } else { ' ' });
        }
        output.push(mv.letter());
    }
    output
}

/// A 4x4 board: a permutation of 0..=15 with the blank (value 0) position
/// cached alongside the tiles. `tiles[blank] == 0` holds at all times.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Board {
    tiles: [u8; BOARD_CELLS],
    blank: usize,
}

impl Board {
    /// The solved layout: cell `p` holds value `p`.
    pub fn goal() -> Self {
        Self {
            tiles: std::array::from_fn(|i| i as u8),
            blank: 0,
        }
    }

    pub fn new(tiles: [u8; BOARD_CELLS]) -> Result<Self> {
        let mut seen = [false; BOARD_CELLS];
        for &value in &tiles {
            let idx = value as usize;
            if idx >= BOARD_CELLS {
                bail!("Tile value {value} is out of range 0..=15");
            }
            if seen[idx] {
                bail!("Tile value {value} appears more than once");
            }
            seen[idx] = true;
        }
        let blank = tiles
            .iter()
            .position(|&v| v == 0)
            .context("Board has no blank cell")?;
        Ok(Self { tiles, blank })
    }

    /// Parses a board from whitespace-separated tile values, e.g.
    /// `1 0 2 3 4 5 6 7 8 9 10 11 12 13 14 15`.
    pub fn parse(content: &str) -> Result<Self> {
        let mut tiles = [0u8; BOARD_CELLS];
        let mut count = 0;
        for token in content.split_whitespace() {
            if count == BOARD_CELLS {
                bail!("Expected exactly {BOARD_CELLS} tile values, found more");
            }
            tiles[count] = token
                .parse()
                .with_context(|| format!("Invalid tile value '{token}'"))?;
            count += 1;
        }
        if count != BOARD_CELLS {
            bail!("Expected exactly {BOARD_CELLS} tile values, found {count}");
        }
        Self::new(tiles)
    }

    pub fn tiles(&self) -> &[u8; BOARD_CELLS] {
        &self.tiles
    }

    pub fn blank(&self) -> usize {
        self.blank
    }

    pub fn is_goal(&self) -> bool {
        self.tiles.iter().enumerate().all(|(i, &v)| v as usize == i)
    }

    /// Applies a move to a copy of this board, swapping the adjacent tile
    /// into the blank's slot. The move must be applicable.
    pub fn child(&self, mv: Move) -> Self {
        debug_assert!(mv.applicable(self.blank));
        let tile = (self.blank as isize + mv.offset()) as usize;
        let mut next = *self;
        next.tiles[self.blank] = next.tiles[tile];
        next.tiles[tile] = 0;
        next.blank = tile;
        next
    }

    /// Sum of Manhattan distances of all non-blank tiles from their goal
    /// cells. Admissible and consistent for unit-cost slides; zero exactly
    /// at the goal.
    pub fn manhattan(&self) -> u32 {
        let mut sum = 0;
        for (idx, &value) in self.tiles.iter().enumerate() {
            if value == 0 {
                continue;
            }
            let value = value as usize;
            sum += (idx % GRID_WIDTH).abs_diff(value % GRID_WIDTH) as u32;
            sum += (idx / GRID_WIDTH).abs_diff(value / GRID_WIDTH) as u32;
        }
        sum
    }

    /// Reachability from the goal. Every slide is a transposition of the
    /// permutation and moves the blank one grid step, so the permutation
    /// parity must equal the parity of the blank's distance from cell 0.
    pub fn is_solvable(&self) -> bool {
        let mut inversions = 0;
        for i in 0..BOARD_CELLS {
            for j in (i + 1)..BOARD_CELLS {
                if self.tiles[i] > self.tiles[j] {
                    inversions += 1;
                }
            }
        }
        let blank_distance = self.blank / GRID_WIDTH + self.blank % GRID_WIDTH;
        inversions % 2 == blank_distance % 2
    }

    pub fn to_pretty_string(&self) -> String {
        self.tiles
            .chunks(GRID_WIDTH)
            .map(|row| {
                row.iter()
                    .map(|v| format!("{v:2}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrambled() -> Board {
        Board::parse("4 1 2 3 8 5 6 7 0 9 10 11 12 13 14 15").unwrap()
    }

    #[test]
    fn test_parse_board() {
        let board = Board::parse("1 0 2 3 4 5 6 7 8 9 10 11 12 13 14 15").unwrap();
        assert_eq!(board.blank(), 1);
        assert_eq!(board.tiles()[0], 1);
        assert_eq!(board.manhattan(), 1);
    }

    #[test]
    fn test_parse_rejects_wrong_token_count() {
        assert!(Board::parse("0 1 2").is_err());
        assert!(Board::parse("").is_err());
        let seventeen = (0..17)
            .map(|v| (v % 16).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        assert!(Board::parse(&seventeen).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        // out of range
        assert!(Board::parse("0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 16").is_err());
        // duplicate
        assert!(Board::parse("0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 14").is_err());
        // not a number
        assert!(Board::parse("0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 x").is_err());
        // no blank
        assert!(Board::parse("1 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15").is_err());
    }

    #[test]
    fn test_pretty_print_round_trip() {
        for board in [Board::goal(), scrambled()] {
            assert_eq!(Board::parse(&board.to_pretty_string()).unwrap(), board);
        }
    }

    #[test]
    fn test_applicable_matches_grid_edges() {
        for blank in 0..BOARD_CELLS {
            let row = blank / GRID_WIDTH;
            let col = blank % GRID_WIDTH;
            assert_eq!(Move::Left.applicable(blank), col > 0);
            assert_eq!(Move::Right.applicable(blank), col < GRID_WIDTH - 1);
            assert_eq!(Move::Up.applicable(blank), row > 0);
            assert_eq!(Move::Down.applicable(blank), row < GRID_WIDTH - 1);
        }
    }

    #[test]
    fn test_child_reverse_round_trip() {
        for board in [Board::goal(), scrambled()] {
            for mv in Move::ALL {
                if !mv.applicable(board.blank()) {
                    continue;
                }
                let child = board.child(mv);
                assert_eq!(child.tiles()[child.blank()], 0);
                assert!(mv.reverse().applicable(child.blank()));
                assert_eq!(child.child(mv.reverse()), board);
            }
        }
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(Board::goal().manhattan(), 0);
        assert!(Board::goal().is_goal());

        // value 15 displaced from one corner to the other
        let mut tiles: [u8; BOARD_CELLS] = std::array::from_fn(|i| i as u8);
        tiles.swap(0, 15);
        let board = Board::new(tiles).unwrap();
        assert_eq!(board.manhattan(), 6);
        assert!(!board.is_goal());
    }

    #[test]
    fn test_solvability_parity() {
        assert!(Board::goal().is_solvable());
        assert!(scrambled().is_solvable());

        // a single transposition of two tiles is unreachable
        let mut tiles: [u8; BOARD_CELLS] = std::array::from_fn(|i| i as u8);
        tiles.swap(14, 15);
        assert!(!Board::new(tiles).unwrap().is_solvable());
    }

    #[test]
    fn test_solvability_preserved_by_moves() {
        let mut board = Board::goal();
        for mv in [Move::Down, Move::Right, Move::Down, Move::Left, Move::Up] {
            board = board.child(mv);
            assert!(board.is_solvable());
        }
    }

    #[test]
    fn test_format_moves() {
        assert_eq!(format_moves(&[]), "");
        assert_eq!(
            format_moves(&[Move::Left, Move::Up, Move::Right, Move::Down]),
            "L U R D"
        );
    }
}
