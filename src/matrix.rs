use itertools::iproduct;

use crate::bits::BitGrid;
use crate::iter::EncRegionIter;
use crate::mask::MaskPattern;
use crate::metadata::{Version, FORMAT_INFO_BIT_LEN, VERSION_INFO_BIT_LEN};

// Module matrix
//------------------------------------------------------------------------------

// The module grid plus a parallel reservation raster. Function, format and
// version modules are reserved as they are painted so that the data placer
// and the masker can mechanically skip them.
#[derive(Debug, Clone)]
pub struct Matrix {
    version: Version,
    width: usize,
    grid: BitGrid,
    reserved: BitGrid,
}

impl Matrix {
    pub fn new(version: Version) -> Self {
        let width = version.width();
        Self {
            version,
            width,
            grid: BitGrid::new(width * width),
            reserved: BitGrid::new(width * width),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn reset(&mut self) {
        self.grid.reset();
        self.reserved.reset();
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.width as i16;
        debug_assert!(-w <= r && r < w, "Row out of bounds: Row {r}, Width {w}");
        debug_assert!(-w <= c && c < w, "Column out of bounds: Column {c}, Width {w}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as usize
    }

    pub fn get(&self, r: i16, c: i16) -> bool {
        self.grid.get(self.coord_to_index(r, c))
    }

    pub fn is_reserved(&self, r: i16, c: i16) -> bool {
        self.reserved.get(self.coord_to_index(r, c))
    }

    fn set_function(&mut self, r: i16, c: i16, dark: bool) {
        let index = self.coord_to_index(r, c);
        self.grid.put(index, dark);
        self.reserved.put(index, true);
    }

    fn set_data(&mut self, r: i16, c: i16, dark: bool) {
        debug_assert!(!self.is_reserved(r, c), "Data write into reserved module: {r} {c}");
        let index = self.coord_to_index(r, c);
        self.grid.put(index, dark);
    }

    fn flip(&mut self, r: i16, c: i16) {
        let index = self.coord_to_index(r, c);
        self.grid.flip(index);
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.count_ones()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.width as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for r in 0..w {
            for c in 0..w {
                res.push(if self.get(r, c) { '#' } else { '.' });
            }
            res.push('\n');
        }
        res
    }
}

// Finder pattern
//------------------------------------------------------------------------------

impl Matrix {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Paints the 7x7 finder along with its separator ring, clamped to the
    // symbol boundary
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_left, dr_right) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_top, dc_bottom) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_left..=dr_right {
            for j in dc_top..=dc_bottom {
                let dark = match (i, j) {
                    (4 | -4, _) | (_, 4 | -4) => false,
                    (3 | -3, _) | (_, 3 | -3) => true,
                    (2 | -2, _) | (_, 2 | -2) => false,
                    _ => true,
                };
                self.set_function(r + i, c + j, dark);
            }
        }
    }
}

// Timing pattern
//------------------------------------------------------------------------------

impl Matrix {
    fn draw_timing_patterns(&mut self) {
        let w = self.width as i16;
        self.draw_line(6, 8, 6, w - 9);
        self.draw_line(8, 6, w - 9, 6);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                self.set_function(r1, j, j & 1 == 0);
            }
        } else {
            for i in r1..=r2 {
                self.set_function(i, c1, i & 1 == 0);
            }
        }
    }
}

// Alignment pattern
//------------------------------------------------------------------------------

impl Matrix {
    fn draw_alignment_patterns(&mut self) {
        let positions = self.version.alignment_pattern();
        for (&r, &c) in iproduct!(positions, positions) {
            self.draw_alignment_pattern_at(r, c);
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.width as i16;
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for (i, j) in iproduct!(-2..=2, -2..=2) {
            let dark = matches!((i, j), (-2 | 2, _) | (_, -2 | 2) | (0, 0));
            self.set_function(r + i, c + j, dark);
        }
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl Matrix {
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    pub fn draw_format_info(&mut self, format_info: u32) {
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, &FORMAT_INFO_COORDS_MAIN);
        self.draw_number(format_info, FORMAT_INFO_BIT_LEN, &FORMAT_INFO_COORDS_SIDE);
        // The dark module, adjacent to the bottom left run of the side copy
        self.set_function(-8, 8, true);
    }

    fn draw_version_info(&mut self) {
        if *self.version < 7 {
            return;
        }
        let version_info = self.version.version_info();
        self.draw_number(version_info, VERSION_INFO_BIT_LEN, &VERSION_INFO_COORDS_BL);
        self.draw_number(version_info, VERSION_INFO_BIT_LEN, &VERSION_INFO_COORDS_TR);
    }

    fn draw_number(&mut self, number: u32, bit_len: usize, coords: &[(i16, i16)]) {
        let mut mask = 1 << (bit_len - 1);
        for &(r, c) in coords {
            self.set_function(r, c, number & mask != 0);
            mask >>= 1;
        }
    }
}

// All function patterns
//------------------------------------------------------------------------------

impl Matrix {
    pub fn draw_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_patterns();
        self.draw_alignment_patterns();
        self.reserve_format_area();
        self.draw_version_info();
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl Matrix {
    // Places codeword bits msb first along the zig-zag route, skipping
    // reserved modules. Remainder modules at the end of the route are left
    // light, their reset state.
    pub fn draw_payload(&mut self, payload: &[u8]) {
        let mut coords = EncRegionIter::new(self.version);
        for &codeword in payload {
            for i in (0..8).rev() {
                let dark = (codeword >> i) & 1 == 1;
                for (r, c) in coords.by_ref() {
                    if !self.is_reserved(r, c) {
                        self.set_data(r, c, dark);
                        break;
                    }
                }
            }
        }
    }

    // Flips every non-reserved module the pattern selects. Applying the same
    // mask twice restores the grid.
    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        let w = self.width as i16;
        for r in 0..w {
            for c in 0..w {
                if !self.is_reserved(r, c) && pattern.flips(c as i32, r as i32) {
                    self.flip(r, c);
                }
            }
        }
    }
}

// Global constants
//------------------------------------------------------------------------------

// Format info coordinates as (r, c), most significant bit first. The main
// copy wraps around the top left finder; the side copy splits between the
// top right and bottom left finders.
static FORMAT_INFO_COORDS_MAIN: [(i16, i16); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

static FORMAT_INFO_COORDS_SIDE: [(i16, i16); 15] = [
    (-1, 8),
    (-2, 8),
    (-3, 8),
    (-4, 8),
    (-5, 8),
    (-6, 8),
    (-7, 8),
    (8, -8),
    (8, -7),
    (8, -6),
    (8, -5),
    (8, -4),
    (8, -3),
    (8, -2),
    (8, -1),
];

// Version info coordinates as (r, c), most significant bit first. Bit
// i * 3 + j maps to (width - 11 + j, i) in the bottom left block and its
// transpose in the top right block.
static VERSION_INFO_COORDS_BL: [(i16, i16); 18] = [
    (-9, 5),
    (-10, 5),
    (-11, 5),
    (-9, 4),
    (-10, 4),
    (-11, 4),
    (-9, 3),
    (-10, 3),
    (-11, 3),
    (-9, 2),
    (-10, 2),
    (-11, 2),
    (-9, 1),
    (-10, 1),
    (-11, 1),
    (-9, 0),
    (-10, 0),
    (-11, 0),
];

static VERSION_INFO_COORDS_TR: [(i16, i16); 18] = [
    (5, -9),
    (5, -10),
    (5, -11),
    (4, -9),
    (4, -10),
    (4, -11),
    (3, -9),
    (3, -10),
    (3, -11),
    (2, -9),
    (2, -10),
    (2, -11),
    (1, -9),
    (1, -10),
    (1, -11),
    (0, -9),
    (0, -10),
    (0, -11),
];

#[cfg(test)]
mod matrix_util_tests {
    use super::Matrix;
    use crate::metadata::Version;

    #[test]
    fn test_index_wrap() {
        let mut matrix = Matrix::new(Version::new(1).unwrap());
        let w = matrix.width() as i16;
        matrix.set_function(-1, -1, true);
        assert!(matrix.get(w - 1, w - 1));
        assert!(matrix.is_reserved(w - 1, w - 1));
        matrix.set_function(0, 0, true);
        assert!(matrix.get(-w, -w));
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bound() {
        let matrix = Matrix::new(Version::new(1).unwrap());
        let w = matrix.width() as i16;
        matrix.get(w, 0);
    }

    #[test]
    #[should_panic]
    fn test_col_out_of_bound() {
        let matrix = Matrix::new(Version::new(1).unwrap());
        let w = matrix.width() as i16;
        matrix.get(0, -(w + 1));
    }
}

#[cfg(test)]
mod function_pattern_tests {
    use super::Matrix;
    use crate::metadata::Version;

    #[test]
    fn test_finder_patterns() {
        let mut matrix = Matrix::new(Version::new(1).unwrap());
        matrix.draw_finder_patterns();
        assert_eq!(
            matrix.to_debug_str(),
            "\n\
             #######.......#######\n\
             #.....#.......#.....#\n\
             #.###.#.......#.###.#\n\
             #.###.#.......#.###.#\n\
             #.###.#.......#.###.#\n\
             #.....#.......#.....#\n\
             #######.......#######\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             #######..............\n\
             #.....#..............\n\
             #.###.#..............\n\
             #.###.#..............\n\
             #.###.#..............\n\
             #.....#..............\n\
             #######..............\n"
        );
    }

    #[test]
    fn test_finder_and_timing_patterns() {
        let mut matrix = Matrix::new(Version::new(1).unwrap());
        matrix.draw_finder_patterns();
        matrix.draw_timing_patterns();
        assert_eq!(
            matrix.to_debug_str(),
            "\n\
             #######.......#######\n\
             #.....#.......#.....#\n\
             #.###.#.......#.###.#\n\
             #.###.#.......#.###.#\n\
             #.###.#.......#.###.#\n\
             #.....#.......#.....#\n\
             #######.#.#.#.#######\n\
             .....................\n\
             ......#..............\n\
             .....................\n\
             ......#..............\n\
             .....................\n\
             ......#..............\n\
             .....................\n\
             #######..............\n\
             #.....#..............\n\
             #.###.#..............\n\
             #.###.#..............\n\
             #.###.#..............\n\
             #.....#..............\n\
             #######..............\n"
        );
    }

    #[test]
    fn test_function_patterns_v3() {
        let mut matrix = Matrix::new(Version::new(3).unwrap());
        matrix.draw_finder_patterns();
        matrix.draw_timing_patterns();
        matrix.draw_alignment_patterns();
        assert_eq!(
            matrix.to_debug_str(),
            "\n\
             #######...............#######\n\
             #.....#...............#.....#\n\
             #.###.#...............#.###.#\n\
             #.###.#...............#.###.#\n\
             #.###.#...............#.###.#\n\
             #.....#...............#.....#\n\
             #######.#.#.#.#.#.#.#.#######\n\
             .............................\n\
             ......#......................\n\
             .............................\n\
             ......#......................\n\
             .............................\n\
             ......#......................\n\
             .............................\n\
             ......#......................\n\
             .............................\n\
             ......#......................\n\
             .............................\n\
             ......#......................\n\
             .............................\n\
             ......#.............#####....\n\
             ....................#...#....\n\
             #######.............#.#.#....\n\
             #.....#.............#...#....\n\
             #.###.#.............#####....\n\
             #.###.#......................\n\
             #.###.#......................\n\
             #.....#......................\n\
             #######......................\n"
        );
    }

    #[test]
    fn test_alignment_skips_finder_corners() {
        // Version 7 has alignment centers on the timing row and column whose
        // finder-adjacent instances must not be painted
        let mut matrix = Matrix::new(Version::new(7).unwrap());
        matrix.draw_finder_patterns();
        matrix.draw_alignment_patterns();
        let w = matrix.width() as i16;
        // Separator corners stay light where skipped patterns would paint
        assert!(!matrix.get(7, 7));
        assert!(!matrix.get(7, w - 8));
        assert!(!matrix.get(w - 8, 7));
        // The non-overlapping center on the timing row is painted
        assert!(matrix.get(6, 22));
        assert!(matrix.get(22, 6));
    }

    #[test]
    fn test_version_info_zones() {
        let mut matrix = Matrix::new(Version::new(7).unwrap());
        matrix.draw_version_info();
        let w = matrix.width() as i16;
        let info = Version::new(7).unwrap().version_info();
        assert_eq!(info, 0x07C94);
        for i in 0..6i16 {
            for j in 0..3i16 {
                let bit = info >> (i * 3 + j) & 1 == 1;
                assert_eq!(matrix.get(w - 11 + j, i), bit, "bottom left {i} {j}");
                assert_eq!(matrix.get(i, w - 11 + j), bit, "top right {i} {j}");
                assert!(matrix.is_reserved(w - 11 + j, i));
                assert!(matrix.is_reserved(i, w - 11 + j));
            }
        }
    }

    #[test]
    fn test_reservation_counts() {
        // Every module left unreserved is either a payload bit or one of the
        // few remainder modules
        let exp_remainders = [
            (1, 0),
            (2, 7),
            (6, 7),
            (7, 0),
            (13, 0),
            (14, 3),
            (20, 3),
            (21, 4),
            (27, 4),
            (28, 3),
            (34, 3),
            (35, 0),
            (40, 0),
        ];
        for (v, exp_rem) in exp_remainders {
            let version = Version::new(v).unwrap();
            let mut matrix = Matrix::new(version);
            matrix.draw_function_patterns();
            let w = matrix.width() as i16;
            let unreserved = (0..w)
                .flat_map(|r| (0..w).map(move |c| (r, c)))
                .filter(|&(r, c)| !matrix.is_reserved(r, c))
                .count();
            assert_eq!(unreserved, (version.total_codewords() << 3) + exp_rem, "version {v}");
        }
    }

    #[test]
    fn test_dark_module() {
        for v in [1, 6, 7, 40] {
            let mut matrix = Matrix::new(Version::new(v).unwrap());
            matrix.draw_function_patterns();
            let w = matrix.width() as i16;
            assert!(matrix.get(w - 8, 8), "version {v}");
            assert!(matrix.is_reserved(w - 8, 8), "version {v}");
        }
    }
}
