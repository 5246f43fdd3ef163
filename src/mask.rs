use std::ops::Deref;

use crate::matrix::Matrix;
use crate::metadata::{format_info, ECLevel};

// Mask pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid mask pattern");
        Self(pattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl MaskPattern {
    // Mask condition for module (x, y), x growing right and y growing down.
    // The module flips when the pattern's formula evaluates to zero.
    pub fn flips(self, x: i32, y: i32) -> bool {
        let formula = match self.0 {
            0 => (x + y) % 2,
            1 => y % 2,
            2 => x % 3,
            3 => (x + y) % 3,
            4 => (y / 2 + x / 3) % 2,
            5 => x * y % 2 + x * y % 3,
            6 => (x * y % 2 + x * y % 3) % 2,
            7 => ((x + y) % 2 + x * y % 3) % 2,
            _ => unreachable!("Invalid mask pattern"),
        };
        formula == 0
    }
}

// Mask selection
//------------------------------------------------------------------------------

// Trials every mask with its own format info, scoring each and reverting
// through a second application. Ties resolve to the lowest pattern.
pub fn apply_best_mask(matrix: &mut Matrix, ec_level: ECLevel) -> MaskPattern {
    let mut best_pattern = MaskPattern::new(0);
    let mut min_penalty = u32::MAX;
    for pattern in (0..8).map(MaskPattern::new) {
        matrix.draw_format_info(format_info(ec_level, pattern));
        matrix.apply_mask(pattern);
        let penalty = compute_total_penalty(matrix);
        if penalty < min_penalty {
            min_penalty = penalty;
            best_pattern = pattern;
        }
        matrix.apply_mask(pattern);
    }
    best_pattern
}

// Penalty score
//------------------------------------------------------------------------------

pub fn compute_total_penalty(matrix: &Matrix) -> u32 {
    compute_run_penalty(matrix, true)
        + compute_run_penalty(matrix, false)
        + compute_block_penalty(matrix)
        + compute_balance_penalty(matrix)
}

// Runs of 5 or more same-colored modules cost 3 plus the overshoot, and any
// 11-module window shaped like a finder with its quiet zone costs 40. Both
// are caught in one scan per line.
fn compute_run_penalty(matrix: &Matrix, horizontal: bool) -> u32 {
    let w = matrix.width() as i16;
    let mut penalty = 0;
    for i in 0..w {
        let at = |j: i16| if horizontal { matrix.get(i, j) } else { matrix.get(j, i) };
        let mut color = at(0);
        let mut run_len = 1u32;
        let mut window = color as u16;
        for j in 1..w {
            if at(j) == color {
                run_len += 1;
                if run_len == 5 {
                    penalty += 3;
                }
                if run_len > 5 {
                    penalty += 1;
                }
            } else {
                color = !color;
                run_len = 1;
            }
            window = ((window << 1) & 0x7FF) | color as u16;
            if j >= 10 && (window == FINDER_RUN || window == FINDER_RUN_REVERSED) {
                penalty += 40;
            }
        }
    }
    penalty
}

fn compute_block_penalty(matrix: &Matrix) -> u32 {
    let w = matrix.width() as i16;
    let mut penalty = 0;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let color = matrix.get(r, c);
            if color == matrix.get(r, c + 1)
                && color == matrix.get(r + 1, c)
                && color == matrix.get(r + 1, c + 1)
            {
                penalty += 3;
            }
        }
    }
    penalty
}

fn compute_balance_penalty(matrix: &Matrix) -> u32 {
    let dark = matrix.count_dark_modules() as i32;
    let total = (matrix.width() * matrix.width()) as i32;
    ((dark * 100 / total - 50).abs() / 5 * 10) as u32
}

// Global constants
//------------------------------------------------------------------------------

// 1011101 with four light modules on either side
static FINDER_RUN: u16 = 0b10111010000;
static FINDER_RUN_REVERSED: u16 = 0b00001011101;
