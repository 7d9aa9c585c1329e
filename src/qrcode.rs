#![forbid(unsafe_code)]
//! QR code encoding functionality.
//!
//! This module provides the core logic for encoding data into QR codes, supporting the QR Code Model
//! 2 specification. It includes the symbol type, error correction levels, version and mask values,
//! and the pipeline that turns segments into a finished module grid: version selection, bitstream
//! assembly, Reed-Solomon coding and interleaving, data placement on a cached per-version template,
//! and mask selection by penalty score.

use crate::bitbuffer::BitBuffer;
use crate::error::{DataTooLong, QrError};
use crate::grid::BitGrid;
use crate::options::EncodeOptions;
use crate::reedsolomon::ReedSolomonGenerator;
use crate::segment::QrSegment;
use crate::template::{get_num_raw_data_modules, QrTemplate};

/// A QR Code symbol, representing a square grid of dark and light modules.
///
/// This struct supports QR Code Model 2, covering versions 1 to 40, all four error correction levels,
/// and four encoding modes (numeric, alphanumeric, byte, ECI). Instances are immutable after creation
/// and can be shared freely between threads.
///
/// # Creation
///
/// - High-level: Use [`QrCode::encode_text`] or [`QrCode::encode_binary`].
/// - Mid-level: Use [`QrCode::encode_segments`], [`QrCode::encode_segments_advanced`] or
///   [`QrCode::encode_with`].
/// - Low-level: Use [`QrCode::encode_codewords`] with ready data codewords.
///
/// # Example
///
/// ```rust
/// use qirust_fast::qrcode::{QrCode, QrCodeEcc};
///
/// let qr = QrCode::encode_text("Hello, World!", QrCodeEcc::Low).unwrap();
/// println!("Version: {}", qr.version().value());
/// assert!(qr.size() >= 21);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    version: Version,

    /// The width and height of this QR Code, measured in modules, between
    /// 21 and 177 (inclusive). This is equal to version * 4 + 17.
    size: i32,

    errorcorrectionlevel: QrCodeEcc,

    mask: Mask,

    /// The modules of this QR Code (false = light, true = dark).
    /// Immutable after constructor finishes. Accessed through get_module().
    modules: BitGrid,
}

impl QrCode {
    /// Encodes a text string into a QR code at the given error correction level.
    ///
    /// The smallest possible version is chosen automatically, the error correction level
    /// may be raised if that does not require a larger version, and the mask is chosen
    /// automatically.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::DataTooLong`] if the text does not fit in version 40.
    pub fn encode_text(text: &str, ecl: QrCodeEcc) -> Result<Self, QrError> {
        let segs: Vec<QrSegment> = QrSegment::make_segments(text);
        QrCode::encode_segments(&segs, ecl)
    }

    /// Encodes arbitrary binary data into a QR code in byte mode.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::DataTooLong`] if the data does not fit in version 40.
    pub fn encode_binary(data: &[u8], ecl: QrCodeEcc) -> Result<Self, QrError> {
        let segs: [QrSegment; 1] = [QrSegment::make_bytes(data)];
        QrCode::encode_segments(&segs, ecl)
    }

    /// Encodes the given segments with default options.
    pub fn encode_segments(segs: &[QrSegment], ecl: QrCodeEcc) -> Result<Self, QrError> {
        QrCode::encode_with(segs, ecl, &EncodeOptions::default())
    }

    /// Encodes the given segments with the given options.
    pub fn encode_with(
        segs: &[QrSegment],
        ecl: QrCodeEcc,
        options: &EncodeOptions,
    ) -> Result<Self, QrError> {
        QrCode::encode_segments_advanced(
            segs,
            ecl,
            options.minversion(),
            options.maxversion(),
            options.mask(),
            options.boostecl(),
        )
    }

    /// Encodes the given segments with full control over the encoding parameters.
    ///
    /// The smallest possible QR Code version within the given range is automatically
    /// chosen for the output. If `boostecl` is `true`, the ECC level may be higher than the
    /// `ecl` argument if it can be done without increasing the version. The `mask` can be
    /// `None` for automatic selection or a value from 0 to 7.
    ///
    /// # Arguments
    ///
    /// * `segs` - Segments to encode, in order.
    /// * `ecl` - Error correction level.
    /// * `minversion` - Minimum QR code version.
    /// * `maxversion` - Maximum QR code version.
    /// * `mask` - Optional mask pattern.
    /// * `boostecl` - Whether to boost error correction if possible.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidArgument`] if `minversion > maxversion`, and
    /// [`QrError::DataTooLong`] if the data does not fit in `maxversion`.
    #[tracing::instrument(skip_all)]
    pub fn encode_segments_advanced(
        segs: &[QrSegment],
        ecl: QrCodeEcc,
        minversion: Version,
        maxversion: Version,
        mask: Option<Mask>,
        boostecl: bool,
    ) -> Result<Self, QrError> {
        let (datacodewords, ecl, version) =
            QrCode::encode_segments_to_codewords(segs, ecl, minversion, maxversion, boostecl)?;
        QrCode::encode_codewords(version, ecl, &datacodewords, mask)
    }

    /// Returns the data codewords for the given segments together with the chosen error
    /// correction level and version, without building the symbol.
    ///
    /// # Errors
    ///
    /// Same as [`QrCode::encode_segments_advanced`].
    pub fn encode_segments_to_codewords(
        segs: &[QrSegment],
        mut ecl: QrCodeEcc,
        minversion: Version,
        maxversion: Version,
        boostecl: bool,
    ) -> Result<(Vec<u8>, QrCodeEcc, Version), QrError> {
        if minversion > maxversion {
            return Err(QrError::invalid("Minimum version exceeds maximum version"));
        }

        // Find the minimal version number to use
        let mut version: Version = minversion;
        let datausedbits: usize = loop {
            let datacapacitybits: usize = QrCode::get_num_data_codewords(version, ecl) * 8;
            let dataused: Option<usize> = QrSegment::get_total_bits(segs, version);
            match dataused {
                Some(n) if n <= datacapacitybits => break n,
                _ if version >= maxversion => {
                    return Err(match dataused {
                        None => DataTooLong::SegmentTooLong,
                        Some(n) => DataTooLong::DataOverCapacity(n, datacapacitybits),
                    }
                    .into());
                }
                _ => version = Version::new(version.value() + 1),
            }
        };

        // Increase the error correction level while the data still fits
        for &newecl in &[QrCodeEcc::Medium, QrCodeEcc::Quartile, QrCodeEcc::High] {
            if boostecl
                && newecl > ecl
                && datausedbits <= QrCode::get_num_data_codewords(version, newecl) * 8
            {
                ecl = newecl;
            }
        }

        // Concatenate all segments to create the data bit string
        let mut bb = BitBuffer::new();
        for seg in segs {
            bb.append_bits(seg.mode().mode_bits(), 4)?;
            let numchars = u32::try_from(seg.num_chars())
                .map_err(|_| QrError::state("Character count does not fit its field"))?;
            bb.append_bits(numchars, seg.mode().num_char_count_bits(version))?;
            bb.append_words(seg.data(), seg.bit_length())?;
        }
        debug_assert_eq!(bb.len(), datausedbits);

        // Add terminator and pad up to a byte if applicable
        let datacapacitybits: usize = QrCode::get_num_data_codewords(version, ecl) * 8;
        debug_assert!(bb.len() <= datacapacitybits);
        let numzerobits = (datacapacitybits - bb.len()).min(4);
        bb.append_bits(0, numzerobits as u8)?;
        let numzerobits = bb.len().wrapping_neg() & 7;
        bb.append_bits(0, numzerobits as u8)?;
        debug_assert_eq!(bb.len() % 8, 0);

        // Pad with alternating bytes until data capacity is reached
        for &padbyte in [0xEC, 0x11].iter().cycle() {
            if bb.len() >= datacapacitybits {
                break;
            }
            bb.append_bits(padbyte, 8)?;
        }
        Ok((bb.to_bytes()?, ecl, version))
    }

    /// Creates a new QR Code with the given version number,
    /// error correction level, data codeword bytes, and mask number.
    ///
    /// This is a low-level API that most users should not use directly.
    /// A mid-level API is the `encode_segments_advanced()` function.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidArgument`] if the number of data codewords does not match
    /// the version and error correction level.
    pub fn encode_codewords(
        version: Version,
        ecl: QrCodeEcc,
        datacodewords: &[u8],
        msk: Option<Mask>,
    ) -> Result<Self, QrError> {
        if datacodewords.len() != QrCode::get_num_data_codewords(version, ecl) {
            return Err(QrError::invalid("Data codeword count does not match version and level"));
        }

        let tpl = QrTemplate::get(version);
        let allcodewords: Vec<u8> = QrCode::add_ecc_and_interleave(datacodewords, version, ecl);

        // Draw modules
        let mut result = Self {
            version,
            size: tpl.size() as i32,
            errorcorrectionlevel: ecl,
            mask: Mask::new(0), // Dummy value
            modules: tpl.template().clone(),
        };
        result.draw_codewords(tpl.data_output_bit_indexes(), &allcodewords);
        result.mask = result.handle_constructor_masking(&tpl, msk);
        tracing::debug!(
            version = version.value(),
            ecl = ?ecl,
            mask = result.mask.value(),
            "encoded QR code"
        );
        Ok(result)
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Returns this QR Code's error correction level.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        self.errorcorrectionlevel
    }

    /// Returns this QR Code's mask, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the color of the module at the given coordinates.
    ///
    /// Returns `true` for dark modules and `false` for light modules. Coordinates outside the QR
    /// code's bounds return `false`.
    ///
    /// # Arguments
    ///
    /// * `x` - X-coordinate (0 is left).
    /// * `y` - Y-coordinate (0 is top).
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size;
        range.contains(&x) && range.contains(&y) && self.modules.get_xy(x as usize, y as usize)
    }

    // Returns a new byte string representing the given data with the appropriate error correction
    // codewords appended to it, based on this object's version and error correction level.
    fn add_ecc_and_interleave(data: &[u8], ver: Version, ecl: QrCodeEcc) -> Vec<u8> {
        assert_eq!(data.len(), QrCode::get_num_data_codewords(ver, ecl));

        // Calculate parameter numbers
        let numblocks: usize = QrCode::table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl);
        let blockecclen: usize = QrCode::table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl);
        let rawcodewords: usize = get_num_raw_data_modules(ver) / 8;
        let numshortblocks: usize = numblocks - rawcodewords % numblocks;
        let shortblockdatalen: usize = rawcodewords / numblocks - blockecclen;

        // Split data into blocks, calculate ECC, and interleave
        let mut result = vec![0u8; rawcodewords];
        let rs = ReedSolomonGenerator::get(blockecclen);
        let mut ecc = vec![0u8; blockecclen];
        let mut k: usize = 0;
        for i in 0..numblocks {
            let datlen: usize = shortblockdatalen + usize::from(i >= numshortblocks);
            let dat = &data[k..k + datlen];
            rs.get_remainder(dat, &mut ecc);
            let mut l: usize = i;
            for (j, &b) in dat.iter().enumerate() {
                // Short blocks have no byte in the last data column
                if j == shortblockdatalen {
                    l -= numshortblocks;
                }
                result[l] = b;
                l += numblocks;
            }
            let mut l: usize = data.len() + i;
            for &b in &ecc {
                result[l] = b;
                l += numblocks;
            }
            k += datlen;
        }
        debug_assert_eq!(k, data.len());
        result
    }

    // Draws the given sequence of 8-bit codewords (data and error correction) onto the data
    // modules, in the template's zigzag order.
    fn draw_codewords(&mut self, dataoutputbitindexes: &[usize], allcodewords: &[u8]) {
        assert_eq!(allcodewords.len() * 8, dataoutputbitindexes.len(), "Illegal argument");
        for (i, &j) in dataoutputbitindexes.iter().enumerate() {
            if get_bit(allcodewords[i >> 3].into(), 7 - (i as u8 & 7)) {
                self.modules.set(j, true);
            }
        }
    }

    // XORs the data modules with the given mask. Applying the same mask twice is a no-op.
    fn apply_mask(&mut self, mask: &BitGrid) {
        self.modules ^= mask;
    }

    // Picks the mask (or uses the forced one), applies it and draws the matching
    // format bits. Returns the mask used.
    fn handle_constructor_masking(&mut self, tpl: &QrTemplate, msk: Option<Mask>) -> Mask {
        let msk: Mask = match msk {
            Some(m) => m,
            None => {
                let mut best = Mask::new(0);
                let mut minpenalty = i32::MAX;
                for i in 0u8..8 {
                    let candidate = Mask::new(i);
                    self.apply_mask(tpl.mask(i));
                    self.draw_format_bits(candidate);
                    let penalty: i32 = self.get_penalty_score();
                    tracing::trace!(mask = i, penalty, "scored mask");
                    if penalty < minpenalty {
                        best = candidate;
                        minpenalty = penalty;
                    }
                    self.apply_mask(tpl.mask(i)); // Undoes the mask due to XOR
                }
                best
            }
        };
        self.apply_mask(tpl.mask(msk.value()));
        self.draw_format_bits(msk);
        msk
    }

    // Draws two copies of the format bits (with its own error correction code)
    // based on the given mask and this object's error correction level field.
    fn draw_format_bits(&mut self, mask: Mask) {
        let bits: u32 = format_bits(self.errorcorrectionlevel, mask);
        let size = self.size as usize;

        // Draw first copy
        for i in 0..6 {
            self.modules.set_xy(8, i, get_bit(bits, i as u8));
        }
        self.modules.set_xy(8, 7, get_bit(bits, 6));
        self.modules.set_xy(8, 8, get_bit(bits, 7));
        self.modules.set_xy(7, 8, get_bit(bits, 8));
        for i in 9..15 {
            self.modules.set_xy(14 - i, 8, get_bit(bits, i as u8));
        }

        // Draw second copy
        for i in 0..8 {
            self.modules.set_xy(size - 1 - i, 8, get_bit(bits, i as u8));
        }
        for i in 8..15 {
            self.modules.set_xy(8, size - 15 + i, get_bit(bits, i as u8));
        }
        self.modules.set_xy(8, size - 8, true); // Always dark
    }

    // Calculates and returns the penalty score based on state of this QR Code's current modules.
    // This is used by the automatic mask choice algorithm to find the mask pattern that yields the lowest score.
    fn get_penalty_score(&self) -> i32 {
        let mut result: i32 = 0;
        let size = self.size as usize;
        let grid = &self.modules;

        // Adjacent modules in row having same color, and finder-like patterns
        for y in 0..size {
            let mut runcolor = false;
            let mut runx: i32 = 0;
            let mut runhistory = FinderPenalty::new(self.size);
            for x in 0..size {
                let color = grid.get_xy(x, y);
                if color == runcolor {
                    runx += 1;
                    if runx == 5 {
                        result += PENALTY_N1;
                    } else if runx > 5 {
                        result += 1;
                    }
                } else {
                    runhistory.add_history(runx);
                    if !runcolor {
                        result += runhistory.count_patterns() * PENALTY_N3;
                    }
                    runcolor = color;
                    runx = 1;
                }
            }
            result += runhistory.terminate_and_count(runcolor, runx) * PENALTY_N3;
        }
        // Adjacent modules in column having same color, and finder-like patterns
        for x in 0..size {
            let mut runcolor = false;
            let mut runy: i32 = 0;
            let mut runhistory = FinderPenalty::new(self.size);
            for y in 0..size {
                let color = grid.get_xy(x, y);
                if color == runcolor {
                    runy += 1;
                    if runy == 5 {
                        result += PENALTY_N1;
                    } else if runy > 5 {
                        result += 1;
                    }
                } else {
                    runhistory.add_history(runy);
                    if !runcolor {
                        result += runhistory.count_patterns() * PENALTY_N3;
                    }
                    runcolor = color;
                    runy = 1;
                }
            }
            result += runhistory.terminate_and_count(runcolor, runy) * PENALTY_N3;
        }

        // 2*2 blocks of modules having same color, every overlapping window counted
        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let color: bool = grid.get_xy(x, y);
                if color == grid.get_xy(x + 1, y)
                    && color == grid.get_xy(x, y + 1)
                    && color == grid.get_xy(x + 1, y + 1)
                {
                    result += PENALTY_N2;
                }
            }
        }

        // Balance of dark and light modules
        let dark = grid.count_ones() as i32;
        let total = self.size * self.size;
        // Compute the smallest integer k >= 0 such that (45-5k)% <= dark/total <= (55+5k)%
        let k: i32 = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
        debug_assert!((0..=9).contains(&k));
        result += k * PENALTY_N4;
        result
    }

    /// Returns the number of 8-bit data (i.e. not error correction) codewords contained in any
    /// QR Code of the given version number and error correction level, with remainder bits discarded.
    pub fn get_num_data_codewords(ver: Version, ecl: QrCodeEcc) -> usize {
        get_num_raw_data_modules(ver) / 8
            - QrCode::table_get(&ECC_CODEWORDS_PER_BLOCK, ver, ecl)
                * QrCode::table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, ecl)
    }

    // Returns an entry from the given table based on the given values.
    fn table_get(table: &'static [[i8; 41]; 4], ver: Version, ecl: QrCodeEcc) -> usize {
        table[ecl.ordinal()][usize::from(ver.value())] as usize
    }
}

/// Returns the 15-bit format information for the given level and mask: the 5 data bits
/// followed by their 10-bit BCH remainder (generator 0x537), XORed with 0x5412.
pub fn format_bits(ecl: QrCodeEcc, mask: Mask) -> u32 {
    let data = u32::from((ecl.format_bits() << 3) | mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    let bits = ((data << 10) | rem) ^ 0x5412;
    debug_assert_eq!(bits >> 15, 0);
    bits
}

// Run-length history for the finder-like pattern (N3) rule, newest run first.
struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: i32) -> Self {
        Self {
            qr_size: size,
            run_history: [0; 7],
        }
    }

    // Pushes the given value to the front and drops the last value.
    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size; // Add light border to initial run
        }
        let len: usize = self.run_history.len();
        self.run_history.copy_within(0..len - 1, 1);
        self.run_history[0] = currentrunlength;
    }

    // Can only be called immediately after a light run is added, and returns either 0, 1, or 2.
    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        debug_assert!(n <= self.qr_size * 3);
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n)
            + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    // Must be called at the end of a line (row or column) of modules.
    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            // Terminate dark run
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size; // Add light border to final run
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    // Version: (note that index 0 is for padding, and is set to an illegal value)
    //0, 1, 2, 3, 4, 5, 6, 7, 8, 9,10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40
    [-1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30], // Low
    [-1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28], // Medium
    [-1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30], // Quartile
    [-1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30], // High
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    // Version: (note that index 0 is for padding, and is set to an illegal value)
    //0, 1, 2, 3, 4, 5, 6, 7, 8, 9,10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40
    [-1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25], // Low
    [-1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49], // Medium
    [-1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68], // Quartile
    [-1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81], // High
];

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    Low,
    /// Tolerates ~15% erroneous codewords.
    Medium,
    /// Tolerates ~25% erroneous codewords.
    Quartile,
    /// Tolerates ~30% erroneous codewords.
    High,
}

impl QrCodeEcc {
    /// Returns an unsigned 2-bit integer (in the range 0 to 3).
    fn ordinal(self) -> usize {
        use QrCodeEcc::*;
        match self {
            Low => 0,
            Medium => 1,
            Quartile => 2,
            High => 3,
        }
    }

    /// Returns the 2-bit value used in the format information (in the range 0 to 3).
    pub fn format_bits(self) -> u8 {
        use QrCodeEcc::*;
        match self {
            Low => 1,
            Medium => 0,
            Quartile => 3,
            High => 2,
        }
    }
}

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40].
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Creates a version object, reporting an out-of-range number as an error.
    pub fn try_new(ver: i32) -> Result<Self, QrError> {
        match u8::try_from(ver) {
            Ok(v) if (Version::MIN.value()..=Version::MAX.value()).contains(&v) => Ok(Self(v)),
            _ => Err(QrError::invalid(format!("Version number out of range: {}", ver))),
        }
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the side length of a symbol of this version, in modules.
    pub const fn size(self) -> usize {
        (self.0 as usize) * 4 + 17
    }
}

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Mask(u8);

impl Mask {
    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Creates a mask object, reporting an out-of-range number as an error.
    pub fn try_new(mask: i32) -> Result<Self, QrError> {
        match u8::try_from(mask) {
            Ok(m) if m <= 7 => Ok(Self(m)),
            _ => Err(QrError::invalid(format!("Mask value out of range: {}", mask))),
        }
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }
}

fn get_bit(x: u32, i: u8) -> bool {
    ((x >> i) & 1) != 0
}
