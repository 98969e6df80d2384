use crate::board::{Board, Move};

use anyhow::{Result, bail};
use smallvec::SmallVec;
use std::time::{Duration, Instant};

// No position of the 4x4 puzzle is farther than 80 moves from the goal,
// so 96 inline slots keep the path off the heap.
const PATH_INLINE_MOVES: usize = 96;

type MovePath = SmallVec<[Move; PATH_INLINE_MOVES]>;

pub fn solve(board: Board) -> Result<SolveResult> {
    Solver::new().solve(board)
}

/// The outcome of one full solve.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Shortest move sequence from the initial board to the goal.
    pub moves: Vec<Move>,
    /// Children constructed during the search, pruned or not.
    pub generated: u64,
    /// Children recursed into or recognized as the goal.
    pub expanded: u64,
    /// Every f-bound tried, starting with the initial heuristic estimate.
    pub thresholds: Vec<u32>,
    pub elapsed: Duration,
}

impl SolveResult {
    pub fn length(&self) -> usize {
        self.moves.len()
    }
}

#[derive(Debug, Copy, Clone)]
struct Node {
    board: Board,
    g: u32,
    f: u32,
}

/// Result of one bounded depth-first pass: either a goal node, or the
/// smallest f-value that exceeded the threshold (`u32::MAX` at a dead end).
enum Outcome {
    Solved(Node),
    Exceeded(u32),
}

/// Iterative-Deepening A* solver for the 15-puzzle.
///
/// Each bounded pass is a depth-first walk that prunes children whose
/// f = g + manhattan exceeds the current threshold; the minimum rejected
/// f-value becomes the next threshold. With an admissible consistent
/// heuristic the first goal found is optimal.
#[derive(Debug, Default)]
pub struct Solver {
    generated: u64,
    expanded: u64,
    path: MovePath,
}

impl Solver {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn solve(&mut self, board: Board) -> Result<SolveResult> {
        if !board.is_solvable() {
            bail!("Board is unsolvable: its permutation parity cannot reach the goal.");
        }
        self.generated = 0;
        self.expanded = 0;
        self.path.clear();

        let timer = Instant::now();
        let estimate = board.manhattan();
        let mut thresholds = vec![estimate];

        if estimate == 0 {
            // The initial board is already the goal; no child is ever built.
            return Ok(SolveResult {
                moves: Vec::new(),
                generated: 0,
                expanded: 0,
                thresholds,
                elapsed: timer.elapsed(),
            });
        }

        let mut threshold = estimate;
        let solution = loop {
            let root = Node {
                board,
                g: 0,
                f: estimate,
            };
            match self.search(&root, threshold, None) {
                Outcome::Solved(node) => break node,
                Outcome::Exceeded(u32::MAX) => {
                    // Unreachable for a board that passed the parity check.
                    bail!("Search dead-ended without finding a solution.");
                }
                Outcome::Exceeded(next) => {
                    threshold = next;
                    thresholds.push(next);
                }
            }
        };

        debug_assert!(solution.board.is_goal());
        debug_assert_eq!(solution.f, solution.g);
        debug_assert_eq!(solution.g as usize, self.path.len());

        Ok(SolveResult {
            moves: self.path.to_vec(),
            generated: self.generated,
            expanded: self.expanded,
            thresholds,
            elapsed: timer.elapsed(),
        })
    }

    fn search(&mut self, node: &Node, threshold: u32, prev: Option<Move>) -> Outcome {
        let mut min_exceeding = u32::MAX;
        for mv in Move::ALL {
            // Never undo the move that produced this node; longer cycles
            // are left to the threshold to cut off.
            if prev == Some(mv.reverse()) {
                continue;
            }
            if !mv.applicable(node.board.blank()) {
                continue;
            }
            let board = node.board.child(mv);
            self.generated += 1;
            let g = node.g + 1;
            let h = board.manhattan();
            let f = g + h;
            if f > threshold {
                min_exceeding = min_exceeding.min(f);
                continue;
            }
            self.expanded += 1;
            self.path.push(mv);
            let child = Node { board, g, f };
            if h == 0 {
                return Outcome::Solved(child);
            }
            match self.search(&child, threshold, Some(mv)) {
                Outcome::Solved(solution) => return Outcome::Solved(solution),
                Outcome::Exceeded(next) => min_exceeding = min_exceeding.min(next),
            }
            self.path.pop();
        }
        Outcome::Exceeded(min_exceeding)
    }
}
