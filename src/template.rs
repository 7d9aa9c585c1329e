//! Per-version structural scaffold of a QR Code: function patterns, the eight mask
//! grids and the zigzag order in which data bits are placed.

use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::grid::BitGrid;
use crate::memoizer::Memoizer;
use crate::qrcode::Version;

static TEMPLATES: Lazy<Memoizer<Version, QrTemplate>> =
    Lazy::new(|| Memoizer::new(QrTemplate::new));

/// Immutable template for one version. Built once and shared by every symbol of that
/// version.
pub struct QrTemplate {
    version: Version,
    size: usize,
    /// Function modules drawn in their final colors. Format areas are reserved as
    /// light, except the single always-dark module.
    template: BitGrid,
    /// For each mask, the data modules that the mask inverts. Function modules are
    /// always 0.
    masks: Vec<BitGrid>,
    /// Module index for each data bit, in placement order.
    dataoutputbitindexes: Vec<usize>,
}

impl QrTemplate {
    /// Returns the shared template for the given version, building it on first use.
    pub fn get(ver: Version) -> Arc<Self> {
        TEMPLATES.get(ver)
    }

    /// Builds the template for the given version.
    pub fn new(ver: Version) -> Self {
        let mut builder = TemplateBuilder::new(ver);
        builder.draw_function_patterns();
        let masks = builder.generate_masks();
        let dataoutputbitindexes = builder.generate_zigzag_scan();
        Self {
            version: ver,
            size: builder.size,
            template: builder.template,
            masks,
            dataoutputbitindexes,
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn template(&self) -> &BitGrid {
        &self.template
    }

    pub fn mask(&self, index: u8) -> &BitGrid {
        &self.masks[usize::from(index)]
    }

    pub fn data_output_bit_indexes(&self) -> &[usize] {
        &self.dataoutputbitindexes
    }
}

// Working state while drawing; `isfunction` is dropped once the template is done.
struct TemplateBuilder {
    version: Version,
    size: usize,
    template: BitGrid,
    isfunction: BitGrid,
}

impl TemplateBuilder {
    fn new(ver: Version) -> Self {
        let size = usize::from(ver.value()) * 4 + 17;
        Self {
            version: ver,
            size,
            template: BitGrid::new(size),
            isfunction: BitGrid::new(size),
        }
    }

    fn draw_function_patterns(&mut self) {
        // Timing patterns
        for i in 0..self.size {
            self.darken_function_module(6, i, i % 2 == 0);
            self.darken_function_module(i, 6, i % 2 == 0);
        }

        // Finder patterns, overwriting some timing modules
        let far = self.size as i32 - 4;
        self.draw_finder_pattern(3, 3);
        self.draw_finder_pattern(far, 3);
        self.draw_finder_pattern(3, far);

        // Alignment patterns, skipping the three finder corners
        let alignpatpos = get_alignment_pattern_positions(self.version);
        let numalign = alignpatpos.len();
        for (i, &pos0) in alignpatpos.iter().enumerate() {
            for (j, &pos1) in alignpatpos.iter().enumerate() {
                if (i == 0 && j == 0) || (i == 0 && j == numalign - 1) || (i == numalign - 1 && j == 0) {
                    continue;
                }
                self.draw_alignment_pattern(pos0, pos1);
            }
        }

        self.draw_dummy_format_bits();
        self.draw_version();
    }

    // Reserves the format information areas. Real bits are drawn per symbol.
    fn draw_dummy_format_bits(&mut self) {
        let size = self.size;
        for i in 0..=5 {
            self.darken_function_module(8, i, false);
        }
        self.darken_function_module(8, 7, false);
        self.darken_function_module(8, 8, false);
        self.darken_function_module(7, 8, false);
        for i in 9..15 {
            self.darken_function_module(14 - i, 8, false);
        }

        for i in 0..8 {
            self.darken_function_module(size - 1 - i, 8, false);
        }
        for i in 8..15 {
            self.darken_function_module(8, size - 15 + i, false);
        }
        self.darken_function_module(8, size - 8, true);
    }

    fn draw_version(&mut self) {
        if self.version.value() < 7 {
            return;
        }
        let bits = version_bits(self.version);
        for i in 0..18 {
            let bit = (bits >> i) & 1 != 0;
            let a = self.size - 11 + i % 3;
            let b = i / 3;
            self.darken_function_module(a, b, bit);
            self.darken_function_module(b, a, bit);
        }
    }

    // Draws a 9*9 finder pattern including the border separator, centered at (x, y).
    // Modules outside the symbol are skipped.
    fn draw_finder_pattern(&mut self, x: i32, y: i32) {
        let size = self.size as i32;
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let dist = dx.abs().max(dy.abs());
                let (xx, yy) = (x + dx, y + dy);
                if (0..size).contains(&xx) && (0..size).contains(&yy) {
                    self.darken_function_module(xx as usize, yy as usize, dist != 2 && dist != 4);
                }
            }
        }
    }

    // Draws a 5*5 alignment pattern centered at (x, y).
    fn draw_alignment_pattern(&mut self, x: usize, y: usize) {
        for dy in 0..5usize {
            for dx in 0..5usize {
                let dist = dx.abs_diff(2).max(dy.abs_diff(2));
                self.darken_function_module(x + dx - 2, y + dy - 2, dist != 1);
            }
        }
    }

    fn darken_function_module(&mut self, x: usize, y: usize, dark: bool) {
        let index = self.template.index(x, y);
        self.template.set(index, dark);
        self.isfunction.set(index, true);
    }

    fn generate_masks(&self) -> Vec<BitGrid> {
        (0..8u8)
            .map(|mask| {
                let mut grid = BitGrid::new(self.size);
                for y in 0..self.size {
                    for x in 0..self.size {
                        let index = grid.index(x, y);
                        if !self.isfunction.get(index) && mask_inverts(mask, x, y) {
                            grid.set(index, true);
                        }
                    }
                }
                grid
            })
            .collect()
    }

    // Walks two-column strips from the right edge leftward, alternating upward and
    // downward, skipping the vertical timing column and function modules.
    fn generate_zigzag_scan(&self) -> Vec<usize> {
        let len = get_num_raw_data_modules(self.version) / 8 * 8;
        let mut result = Vec::with_capacity(len);
        let size = self.size;
        let mut right = size - 1;
        while right >= 1 {
            if right == 6 {
                right = 5;
            }
            let upward = (right + 1) & 2 == 0;
            for vert in 0..size {
                let y = if upward { size - 1 - vert } else { vert };
                for j in 0..2 {
                    let index = self.isfunction.index(right - j, y);
                    if !self.isfunction.get(index) && result.len() < len {
                        result.push(index);
                    }
                }
            }
            if right < 2 {
                break;
            }
            right -= 2;
        }
        debug_assert_eq!(result.len(), len);
        result
    }
}

/// The eight standard mask predicates: whether the module at (x, y) is inverted.
pub fn mask_inverts(mask: u8, x: usize, y: usize) -> bool {
    match mask {
        0 => (x + y) % 2 == 0,
        1 => y % 2 == 0,
        2 => x % 3 == 0,
        3 => (x + y) % 3 == 0,
        4 => (x / 3 + y / 2) % 2 == 0,
        5 => x * y % 2 + x * y % 3 == 0,
        6 => (x * y % 2 + x * y % 3) % 2 == 0,
        7 => ((x + y) % 2 + x * y % 3) % 2 == 0,
        _ => unreachable!("Mask value out of range"),
    }
}

/// Returns the 18-bit version information field: the version number followed by its
/// 12-bit BCH remainder (generator 0x1F25).
pub fn version_bits(ver: Version) -> u32 {
    let ver = u32::from(ver.value());
    let mut rem: u32 = ver;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1F25);
    }
    let bits = (ver << 12) | rem;
    debug_assert_eq!(bits >> 18, 0);
    bits
}

/// Returns the ascending center coordinates of the alignment patterns for the version,
/// including the ones that coincide with finder patterns.
pub fn get_alignment_pattern_positions(ver: Version) -> Vec<usize> {
    let ver = usize::from(ver.value());
    if ver == 1 {
        return Vec::new();
    }
    let numalign = ver / 7 + 2;
    let step = if ver == 32 {
        26
    } else {
        (ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2) * 2
    };
    let size = ver * 4 + 17;
    let mut result: Vec<usize> = (0..numalign - 1).map(|i| size - 7 - i * step).collect();
    result.push(6);
    result.reverse();
    result
}

/// Returns the number of data bits that can be stored in a symbol of the given
/// version, after all function modules are excluded. This includes remainder bits,
/// so it might not be a multiple of 8.
pub fn get_num_raw_data_modules(ver: Version) -> usize {
    let ver = usize::from(ver.value());
    let mut result: usize = (16 * ver + 128) * ver + 64;
    if ver >= 2 {
        let numalign: usize = ver / 7 + 2;
        result -= (25 * numalign - 10) * numalign - 55;
        if ver >= 7 {
            result -= 36;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_data_modules_match_table() {
        // Published raw codeword counts for each version.
        let codewords: [usize; 40] = [
            26, 44, 70, 100, 134, 172, 196, 242, 292, 346, 404, 466, 532, 581, 655, 733, 815, 901,
            991, 1085, 1156, 1258, 1364, 1474, 1588, 1706, 1828, 1921, 2051, 2185, 2323, 2465, 2611,
            2761, 2876, 3034, 3196, 3362, 3532, 3706,
        ];
        for v in 1..=40u8 {
            let ver = Version::new(v);
            assert_eq!(get_num_raw_data_modules(ver) / 8, codewords[usize::from(v) - 1]);
        }
        assert_eq!(get_num_raw_data_modules(Version::new(1)), 208);
        assert_eq!(get_num_raw_data_modules(Version::new(7)), 1568);
        assert_eq!(get_num_raw_data_modules(Version::new(40)), 29648);
    }

    #[test]
    fn test_alignment_positions() {
        assert!(get_alignment_pattern_positions(Version::new(1)).is_empty());
        assert_eq!(get_alignment_pattern_positions(Version::new(2)), vec![6, 18]);
        assert_eq!(get_alignment_pattern_positions(Version::new(7)), vec![6, 22, 38]);
        assert_eq!(
            get_alignment_pattern_positions(Version::new(32)),
            vec![6, 34, 60, 86, 112, 138]
        );
        assert_eq!(
            get_alignment_pattern_positions(Version::new(40)),
            vec![6, 30, 58, 86, 114, 142, 170]
        );
    }

    #[test]
    fn test_every_version_builds_consistently() {
        for v in 1..=40u8 {
            let ver = Version::new(v);
            let tpl = QrTemplate::new(ver);
            let size = usize::from(v) * 4 + 17;
            assert_eq!(tpl.size(), size);
            assert_eq!(tpl.template().len(), size * size);

            let indexes = tpl.data_output_bit_indexes();
            assert_eq!(indexes.len(), get_num_raw_data_modules(ver) / 8 * 8);
            let mut seen = BitGrid::new(size);
            for &i in indexes {
                assert!(!seen.get(i), "version {} places index {} twice", v, i);
                seen.set(i, true);
                // Data modules are never pre-drawn dark.
                assert!(!tpl.template().get(i));
            }
            for m in 0..8 {
                let mask = tpl.mask(m);
                // Masks only touch data modules: everything set must be a data position
                // or one of the few remainder bits left unused by the scan.
                let covered = indexes.iter().filter(|&&i| mask.get(i)).count();
                assert!(mask.count_ones() - covered <= 7);
            }
        }
    }

    #[test]
    fn test_finder_and_timing_modules() {
        let tpl = QrTemplate::new(Version::new(1));
        let t = tpl.template();
        // Finder pattern rings: dark, light, dark core
        assert!(t.get_xy(0, 0));
        assert!(!t.get_xy(1, 1));
        assert!(t.get_xy(3, 3));
        assert!(!t.get_xy(7, 7));
        assert!(t.get_xy(20, 0));
        assert!(t.get_xy(0, 20));
        // Timing pattern
        assert!(t.get_xy(8, 6));
        assert!(!t.get_xy(9, 6));
        assert!(t.get_xy(6, 12));
        // Always-dark module
        assert!(t.get_xy(8, 13));
    }

    #[test]
    fn test_alignment_pattern_rings() {
        let tpl = QrTemplate::new(Version::new(2));
        let t = tpl.template();
        let data: Vec<usize> = tpl.data_output_bit_indexes().to_vec();
        for dy in 0..5usize {
            for dx in 0..5usize {
                let (x, y) = (16 + dx, 16 + dy);
                let ring = dx.abs_diff(2).max(dy.abs_diff(2));
                assert_eq!(t.get_xy(x, y), ring != 1, "module ({}, {})", x, y);
                assert!(!data.contains(&t.index(x, y)));
            }
        }
        // Just outside the pattern is a data module again.
        assert!(data.contains(&t.index(15, 18)));

        // Version 7 draws the pattern on the timing row, but not over the finders.
        let tpl = QrTemplate::new(Version::new(7));
        let t = tpl.template();
        assert!(t.get_xy(22, 6));
        assert!(!t.get_xy(21, 5));
        assert!(t.get_xy(20, 4));
        assert!(t.get_xy(22, 22));
        assert!(!t.get_xy(23, 22));
        assert!(!t.get_xy(7, 7));
    }

    #[test]
    fn test_zigzag_starts_at_bottom_right() {
        let tpl = QrTemplate::new(Version::new(1));
        let idx = tpl.data_output_bit_indexes();
        assert_eq!(&idx[..4], &[20 * 21 + 20, 20 * 21 + 19, 19 * 21 + 20, 19 * 21 + 19]);
    }

    #[test]
    fn test_version_bits() {
        assert_eq!(version_bits(Version::new(7)), 0x07C94);
        assert_eq!(version_bits(Version::new(40)), 0x28C69);
    }

    #[test]
    fn test_mask_predicates() {
        assert!(mask_inverts(0, 0, 0));
        assert!(!mask_inverts(0, 1, 0));
        assert!(mask_inverts(1, 5, 2));
        assert!(mask_inverts(2, 3, 1));
        assert!(mask_inverts(3, 1, 2));
        assert!(mask_inverts(4, 2, 1));
        assert!(!mask_inverts(4, 3, 0));
        assert!(mask_inverts(5, 6, 1));
        assert!(mask_inverts(6, 0, 0));
        assert!(mask_inverts(7, 0, 0));
    }

    #[test]
    fn test_shared_template() {
        let a = QrTemplate::get(Version::new(3));
        let b = QrTemplate::get(Version::new(3));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.version(), Version::new(3));
    }
}
