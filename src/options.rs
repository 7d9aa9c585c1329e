//! Encoding parameters beyond the error correction level.

use crate::error::QrError;
use crate::qrcode::{Mask, Version};

/// Options for [`QrCode::encode_with`](crate::qrcode::QrCode::encode_with).
///
/// The default searches every version from 1 to 40, picks the mask automatically and
/// raises the error correction level when that costs no extra space.
///
/// ```rust
/// use qirust_fast::options::EncodeOptions;
/// use qirust_fast::qrcode::{Mask, Version};
///
/// let options = EncodeOptions::new()
///     .with_min_version(Version::new(5))
///     .with_mask(Some(Mask::new(2)))
///     .with_boost_ecl(false);
/// assert_eq!(options.minversion(), Version::new(5));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EncodeOptions {
    minversion: Version,
    maxversion: Version,
    mask: Option<Mask>,
    boostecl: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            minversion: Version::MIN,
            maxversion: Version::MAX,
            mask: None,
            boostecl: true,
        }
    }
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds options from plain integers, where a mask of -1 selects the mask
    /// automatically.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidArgument`] if a version is outside [1, 40], the mask is
    /// outside [-1, 7], or `minversion > maxversion`.
    pub fn from_raw(
        minversion: i32,
        maxversion: i32,
        mask: i32,
        boostecl: bool,
    ) -> Result<Self, QrError> {
        let options = Self {
            minversion: Version::try_new(minversion)?,
            maxversion: Version::try_new(maxversion)?,
            mask: if mask == -1 {
                None
            } else {
                Some(Mask::try_new(mask)?)
            },
            boostecl,
        };
        options.validate()?;
        Ok(options)
    }

    /// Checks that the version range is not empty.
    pub fn validate(&self) -> Result<(), QrError> {
        if self.minversion > self.maxversion {
            return Err(QrError::invalid(format!(
                "Minimum version {} exceeds maximum version {}",
                self.minversion.value(),
                self.maxversion.value()
            )));
        }
        Ok(())
    }

    pub fn with_min_version(mut self, ver: Version) -> Self {
        self.minversion = ver;
        self
    }

    pub fn with_max_version(mut self, ver: Version) -> Self {
        self.maxversion = ver;
        self
    }

    /// `None` selects the mask with the lowest penalty score.
    pub fn with_mask(mut self, mask: Option<Mask>) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_boost_ecl(mut self, boostecl: bool) -> Self {
        self.boostecl = boostecl;
        self
    }

    pub fn minversion(&self) -> Version {
        self.minversion
    }

    pub fn maxversion(&self) -> Version {
        self.maxversion
    }

    pub fn mask(&self) -> Option<Mask> {
        self.mask
    }

    pub fn boostecl(&self) -> bool {
        self.boostecl
    }
}
