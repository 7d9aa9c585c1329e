//! Reed-Solomon error correction codeword generation over GF(2^8/0x11D).

use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::memoizer::Memoizer;

static GENERATORS: Lazy<Memoizer<usize, ReedSolomonGenerator>> =
    Lazy::new(|| Memoizer::with_retention(ReedSolomonGenerator::new, 16));

/// Computes the Reed-Solomon error correction codewords for a sequence of data
/// codewords at a given degree.
///
/// The generator polynomial is expanded once into a table holding the product of
/// every possible byte with every generator coefficient, so computing a remainder
/// only takes table lookups and XORs.
pub struct ReedSolomonGenerator {
    // 256 rows of `degree` bytes: row `v` holds `v * coefficient` for each generator
    // coefficient, highest power first, excluding the leading 1.
    polynomialmultiply: Vec<u8>,
    degree: usize,
}

impl ReedSolomonGenerator {
    /// Returns the shared generator for the given degree, building it on first use.
    ///
    /// # Panics
    ///
    /// Panics if the degree is outside the range [1, 255].
    pub fn get(degree: usize) -> Arc<Self> {
        assert!((1..=255).contains(&degree), "Degree out of range");
        GENERATORS.get(degree)
    }

    /// Builds the generator for the given degree.
    ///
    /// # Panics
    ///
    /// Panics if the degree is outside the range [1, 255].
    pub fn new(degree: usize) -> Self {
        assert!((1..=255).contains(&degree), "Degree out of range");

        // Coefficients of the product of (x - r^i) for i in 0..degree, stored from
        // highest to lowest power, dropping the leading term which is always 1.
        let mut coefficients = vec![0u8; degree];
        coefficients[degree - 1] = 1;
        let mut root: u8 = 1;
        for _ in 0..degree {
            for j in 0..degree {
                coefficients[j] = multiply(coefficients[j], root);
                if j + 1 < degree {
                    coefficients[j] ^= coefficients[j + 1];
                }
            }
            root = multiply(root, 0x02);
        }

        let mut polynomialmultiply = vec![0u8; 256 * degree];
        for (v, row) in polynomialmultiply.chunks_exact_mut(degree).enumerate() {
            for (out, &coef) in row.iter_mut().zip(&coefficients) {
                *out = multiply(v as u8, coef);
            }
        }
        Self {
            polynomialmultiply,
            degree,
        }
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Computes the remainder of dividing `data` (times x^degree) by the generator
    /// polynomial, writing exactly `degree` error correction codewords to `result`.
    pub fn get_remainder(&self, data: &[u8], result: &mut [u8]) {
        assert_eq!(result.len(), self.degree);
        result.fill(0);
        let degree = self.degree;
        for &b in data {
            let factor = usize::from(b ^ result[0]);
            let table = &self.polynomialmultiply[factor * degree..(factor + 1) * degree];
            for j in 0..degree - 1 {
                result[j] = result[j + 1] ^ table[j];
            }
            result[degree - 1] = table[degree - 1];
        }
    }

    /// Convenience form of [`get_remainder`](Self::get_remainder) returning a new vector.
    #[cfg(test)]
    pub(crate) fn compute_remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.degree];
        self.get_remainder(data, &mut result);
        result
    }
}

/// Returns the product of the two given field elements modulo GF(2^8/0x11D).
pub fn multiply(x: u8, y: u8) -> u8 {
    let mut z: u8 = 0;
    for i in (0..8).rev() {
        z = (z << 1) ^ ((z >> 7) * 0x1d);
        z ^= ((y >> i) & 1) * x;
    }
    z
}

#[cfg(test)]
mod tests {
    use super::*;

    // Straightforward polynomial long division, used as a reference.
    fn remainder_by_division(data: &[u8], degree: usize) -> Vec<u8> {
        let mut generator = vec![1u8];
        let mut root = 1u8;
        for _ in 0..degree {
            let mut next = vec![0u8; generator.len() + 1];
            for (i, &g) in generator.iter().enumerate() {
                next[i] ^= g;
                next[i + 1] ^= multiply(g, root);
            }
            generator = next;
            root = multiply(root, 2);
        }
        let mut work = data.to_vec();
        work.resize(data.len() + degree, 0);
        for i in 0..data.len() {
            let coef = work[i];
            if coef != 0 {
                for (j, &g) in generator.iter().enumerate() {
                    work[i + j] ^= multiply(coef, g);
                }
            }
        }
        work[data.len()..].to_vec()
    }

    #[test]
    fn test_multiply_known_values() {
        assert_eq!(multiply(0, 0x53), 0);
        assert_eq!(multiply(1, 0x53), 0x53);
        assert_eq!(multiply(2, 0x80), 0x1d);
        assert_eq!(multiply(0x02, 0x02), 0x04);
        // 2^8 = 0x1d and 2^255 = 1
        let mut x = 1u8;
        for _ in 0..255 {
            x = multiply(x, 2);
        }
        assert_eq!(x, 1);
    }

    #[test]
    fn test_multiply_commutative_and_distributive() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                assert_eq!(multiply(a, b), multiply(b, a));
            }
        }
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                for c in 0..=255u8 {
                    assert_eq!(multiply(a, b ^ c), multiply(a, b) ^ multiply(a, c));
                }
            }
        }
    }

    #[test]
    fn test_zero_block_has_zero_remainder() {
        let data = [0u8; 40];
        for degree in 1..=255 {
            let rs = ReedSolomonGenerator::new(degree);
            assert!(rs.compute_remainder(&data).iter().all(|&b| b == 0), "degree {}", degree);
        }
    }

    #[test]
    fn test_matches_long_division() {
        let data: Vec<u8> = (0..60u32).map(|i| (i * 37 + 11) as u8).collect();
        for degree in [1, 2, 7, 10, 13, 17, 22, 28, 30, 68, 255] {
            let rs = ReedSolomonGenerator::new(degree);
            assert_eq!(rs.compute_remainder(&data), remainder_by_division(&data, degree));
        }
    }

    #[test]
    fn test_hello_world_1m_codewords() {
        let data = [32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236, 17, 236, 17];
        let rs = ReedSolomonGenerator::get(10);
        assert_eq!(
            rs.compute_remainder(&data),
            vec![196, 35, 39, 119, 235, 215, 231, 226, 93, 23]
        );
    }

    #[test]
    fn test_shared_generator_is_reused() {
        let a = ReedSolomonGenerator::get(26);
        let b = ReedSolomonGenerator::get(26);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.degree(), 26);
    }

    #[test]
    #[should_panic(expected = "Degree out of range")]
    fn test_degree_zero_panics() {
        ReedSolomonGenerator::new(0);
    }
}
