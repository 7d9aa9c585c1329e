//! Data segments: the typed, bit-encoded pieces of payload that make up a symbol.

use crate::bitbuffer::BitBuffer;
use crate::error::QrError;
use crate::qrcode::Version;

/// A segment of character/binary/control data in a QR Code symbol.
///
/// Segments are immutable. The mid-level way to create a segment is to take the payload
/// data and call a factory function such as [`QrSegment::make_numeric`]. The low-level
/// way is to assemble the bits yourself and call [`QrSegment::new`].
///
/// This segment type imposes no length restrictions, but QR Codes have restrictions.
/// Even in the most favorable conditions, a QR Code can only hold 7089 characters of data.
/// Any segment longer than this is meaningless for the purpose of generating QR Codes.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrSegment {
    mode: QrSegmentMode,
    numchars: usize,
    data: Vec<u32>,
    bitlength: usize,
}

impl QrSegment {
    /// Creates a segment for binary data in byte mode.
    ///
    /// # Arguments
    ///
    /// * `data` - The byte data to encode.
    pub fn make_bytes(data: &[u8]) -> Self {
        let mut words = vec![0u32; (data.len() + 3) / 4];
        for (i, &b) in data.iter().enumerate() {
            words[i >> 2] |= u32::from(b) << (24 - ((i & 3) << 3));
        }
        Self {
            mode: QrSegmentMode::Byte,
            numchars: data.len(),
            data: words,
            bitlength: data.len() * 8,
        }
    }

    /// Creates a segment for a string of decimal digits in numeric mode.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidArgument`] if `text` contains non-digit characters.
    pub fn make_numeric(text: &str) -> Result<Self, QrError> {
        let mut bb = BitBuffer::new();
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for b in text.bytes() {
            if !b.is_ascii_digit() {
                return Err(QrError::invalid("String contains non-numeric characters"));
            }
            accumdata = accumdata * 10 + u32::from(b - b'0');
            accumcount += 1;
            if accumcount == 3 {
                bb.append_bits(accumdata, 10)?;
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, accumcount * 3 + 1)?;
        }
        let (data, bitlength) = bb.into_words();
        Ok(Self {
            mode: QrSegmentMode::Numeric,
            numchars: text.len(),
            data,
            bitlength,
        })
    }

    /// Creates a segment for alphanumeric text.
    ///
    /// Allowed characters: 0–9, A–Z (uppercase), space, `$`, `%`, `*`, `+`, `-`, `.`, `/`, `:`.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidArgument`] if `text` contains other characters.
    pub fn make_alphanumeric(text: &str) -> Result<Self, QrError> {
        let mut bb = BitBuffer::new();
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        let mut numchars: usize = 0;
        for c in text.chars() {
            let i = alphanumeric_value(c).ok_or_else(|| {
                QrError::invalid("String contains unencodable characters in alphanumeric mode")
            })?;
            accumdata = accumdata * 45 + i;
            accumcount += 1;
            numchars += 1;
            if accumcount == 2 {
                bb.append_bits(accumdata, 11)?;
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, 6)?;
        }
        let (data, bitlength) = bb.into_words();
        Ok(Self {
            mode: QrSegmentMode::Alphanumeric,
            numchars,
            data,
            bitlength,
        })
    }

    /// Returns a list of zero or one segments to represent the given text string.
    ///
    /// The mode is numeric if every character is a digit, else alphanumeric if every
    /// character is in the alphanumeric set, else byte mode over the UTF-8 bytes.
    /// The empty string yields a single empty byte-mode segment.
    pub fn make_segments(text: &str) -> Vec<Self> {
        if text.is_empty() {
            return vec![Self::make_bytes(&[])];
        }
        let seg = Self::make_numeric(text)
            .or_else(|_| Self::make_alphanumeric(text))
            .unwrap_or_else(|_| Self::make_bytes(text.as_bytes()));
        vec![seg]
    }

    /// Creates a segment representing an Extended Channel Interpretation
    /// (ECI) designator with the given assignment value.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidArgument`] if the value is 1000000 or more.
    pub fn make_eci(assignval: u32) -> Result<Self, QrError> {
        let mut bb = BitBuffer::new();
        if assignval < 1 << 7 {
            bb.append_bits(assignval, 8)?;
        } else if assignval < 1 << 14 {
            bb.append_bits(0b10, 2)?;
            bb.append_bits(assignval, 14)?;
        } else if assignval < 1_000_000 {
            bb.append_bits(0b110, 3)?;
            bb.append_bits(assignval, 21)?;
        } else {
            return Err(QrError::invalid("ECI assignment value out of range"));
        }
        let (data, bitlength) = bb.into_words();
        Ok(Self {
            mode: QrSegmentMode::Eci,
            numchars: 0,
            data,
            bitlength,
        })
    }

    /// Creates a segment from already-encoded bits, packed most significant bit first
    /// into 32-bit words.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidArgument`] if `bitlength` exceeds the capacity of `data`.
    pub fn new(
        mode: QrSegmentMode,
        numchars: usize,
        data: Vec<u32>,
        bitlength: usize,
    ) -> Result<Self, QrError> {
        if bitlength > data.len().saturating_mul(32) {
            return Err(QrError::invalid("Invalid value"));
        }
        Ok(Self {
            mode,
            numchars,
            data,
            bitlength,
        })
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    /// The encoded payload, excluding mode and count indicators.
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    pub fn bit_length(&self) -> usize {
        self.bitlength
    }

    /// Calculates the number of bits needed to encode the given segments at the given
    /// version. Returns `None` if a segment has too many characters to fit its length
    /// field, or the total bits exceed `usize::MAX`.
    pub fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let ccbits: u8 = seg.mode.num_char_count_bits(version);
            if let Some(limit) = 1usize.checked_shl(ccbits.into()) {
                if seg.numchars >= limit {
                    return None;
                }
            }
            result = result.checked_add(4 + usize::from(ccbits))?;
            result = result.checked_add(seg.bitlength)?;
        }
        Some(result)
    }

    /// Tests whether the given string can be encoded as a segment in numeric mode.
    pub fn is_numeric(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_digit())
    }

    /// Tests whether the given string can be encoded as a segment in alphanumeric mode.
    pub fn is_alphanumeric(text: &str) -> bool {
        text.chars().all(|c| alphanumeric_value(c).is_some())
    }
}

static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

fn alphanumeric_value(c: char) -> Option<u32> {
    ALPHANUMERIC_CHARSET.find(c).map(|i| i as u32)
}

/// Describes how a segment's data bits are interpreted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum QrSegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
    Kanji,
    Eci,
}

impl QrSegmentMode {
    /// Returns the 4-bit mode indicator.
    pub fn mode_bits(self) -> u32 {
        use QrSegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
            Kanji => 0x8,
            Eci => 0x7,
        }
    }

    /// Returns the bit width of the character count field for a segment in this mode
    /// in a QR Code at the given version number.
    pub fn num_char_count_bits(self, ver: Version) -> u8 {
        use QrSegmentMode::*;
        (match self {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
            Kanji => [8, 10, 12],
            Eci => [0, 0, 0],
        })[usize::from((ver.value() + 7) / 17)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_of(seg: &QrSegment) -> Vec<u8> {
        let mut bb = BitBuffer::new();
        bb.append_words(seg.data(), seg.bit_length()).unwrap();
        let pad = (8 - bb.len() % 8) % 8;
        bb.append_bits(0, pad as u8).unwrap();
        bb.to_bytes().unwrap()
    }

    #[test]
    fn test_is_numeric() {
        assert!(QrSegment::is_numeric("1234567890"));
        assert!(!QrSegment::is_numeric("1234abc"));
        assert!(QrSegment::is_numeric(""));
    }

    #[test]
    fn test_is_alphanumeric() {
        assert!(QrSegment::is_alphanumeric("HELLO WORLD"));
        assert!(QrSegment::is_alphanumeric("$%*+-./: 09AZ"));
        assert!(!QrSegment::is_alphanumeric("Hello World"));
        assert!(!QrSegment::is_alphanumeric("É"));
    }

    #[test]
    fn test_numeric_groups() {
        // 012 -> 0000001100, 345 -> 0101011001, 67 -> 1000011
        let seg = QrSegment::make_numeric("01234567").unwrap();
        assert_eq!(seg.mode(), QrSegmentMode::Numeric);
        assert_eq!(seg.num_chars(), 8);
        assert_eq!(seg.bit_length(), 27);
        assert_eq!(bytes_of(&seg), vec![0b0000_0011, 0b0001_0101, 0b1001_1000, 0b0110_0000]);

        assert_eq!(QrSegment::make_numeric("1").unwrap().bit_length(), 4);
        assert_eq!(QrSegment::make_numeric("12").unwrap().bit_length(), 7);
        assert_eq!(QrSegment::make_numeric("").unwrap().bit_length(), 0);
    }

    #[test]
    fn test_alphanumeric_pairs() {
        // "AC-42": (10*45+12)=462, (41*45+4)=1849, 2
        let seg = QrSegment::make_alphanumeric("AC-42").unwrap();
        assert_eq!(seg.num_chars(), 5);
        assert_eq!(seg.bit_length(), 28);
        let mut expected = BitBuffer::new();
        expected.append_bits(462, 11).unwrap();
        expected.append_bits(1849, 11).unwrap();
        expected.append_bits(2, 6).unwrap();
        expected.append_bits(0, 4).unwrap();
        assert_eq!(bytes_of(&seg), expected.to_bytes().unwrap());
    }

    #[test]
    fn test_explicit_modes_reject_bad_characters() {
        assert!(matches!(QrSegment::make_numeric("12a"), Err(QrError::InvalidArgument(_))));
        assert!(matches!(
            QrSegment::make_alphanumeric("hello"),
            Err(QrError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_bytes_segment() {
        let seg = QrSegment::make_bytes("aé".as_bytes());
        assert_eq!(seg.mode(), QrSegmentMode::Byte);
        assert_eq!(seg.num_chars(), 3);
        assert_eq!(seg.bit_length(), 24);
        assert_eq!(bytes_of(&seg), vec![0x61, 0xC3, 0xA9]);
    }

    #[test]
    fn test_make_segments_classification() {
        assert_eq!(QrSegment::make_segments("0123")[0].mode(), QrSegmentMode::Numeric);
        assert_eq!(QrSegment::make_segments("HELLO WORLD")[0].mode(), QrSegmentMode::Alphanumeric);
        assert_eq!(QrSegment::make_segments("Hello")[0].mode(), QrSegmentMode::Byte);
        let empty = QrSegment::make_segments("");
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].mode(), QrSegmentMode::Byte);
        assert_eq!(empty[0].bit_length(), 0);
    }

    #[test]
    fn test_eci_designators() {
        assert_eq!(QrSegment::make_eci(26).unwrap().bit_length(), 8);
        assert_eq!(QrSegment::make_eci(1000).unwrap().bit_length(), 16);
        assert_eq!(QrSegment::make_eci(999_999).unwrap().bit_length(), 24);
        assert!(QrSegment::make_eci(1_000_000).is_err());
        assert_eq!(bytes_of(&QrSegment::make_eci(1000).unwrap()), vec![0x83, 0xE8]);
    }

    #[test]
    fn test_total_bits() {
        let segs = QrSegment::make_segments("HELLO WORLD");
        assert_eq!(QrSegment::get_total_bits(&segs, Version::new(1)), Some(4 + 9 + 61));
        assert_eq!(QrSegment::get_total_bits(&segs, Version::new(10)), Some(4 + 11 + 61));
        assert_eq!(QrSegment::get_total_bits(&segs, Version::new(27)), Some(4 + 13 + 61));
        assert_eq!(QrSegment::get_total_bits(&[], Version::new(1)), Some(0));

        // 256 bytes do not fit an 8-bit count field.
        let long = [QrSegment::make_bytes(&[0u8; 256])];
        assert_eq!(QrSegment::get_total_bits(&long, Version::new(9)), None);
        assert_eq!(QrSegment::get_total_bits(&long, Version::new(10)), Some(4 + 16 + 2048));
    }

    #[test]
    fn test_char_count_bits_boundaries() {
        use QrSegmentMode::*;
        assert_eq!(Numeric.num_char_count_bits(Version::new(9)), 10);
        assert_eq!(Numeric.num_char_count_bits(Version::new(10)), 12);
        assert_eq!(Numeric.num_char_count_bits(Version::new(26)), 12);
        assert_eq!(Numeric.num_char_count_bits(Version::new(27)), 14);
        assert_eq!(Kanji.num_char_count_bits(Version::new(40)), 12);
        assert_eq!(Eci.num_char_count_bits(Version::new(40)), 0);
    }

    #[test]
    fn test_new_validates_length() {
        assert!(QrSegment::new(QrSegmentMode::Kanji, 1, vec![0], 13).is_ok());
        assert!(QrSegment::new(QrSegmentMode::Kanji, 1, vec![0], 33).is_err());
    }
}
