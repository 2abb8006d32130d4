//! Montgomery arithmetic for a fixed odd modulus.
//!
//! The generator search performs one or more exponentiations per residue of
//! GF(p). Montgomery form (ā = a·R mod n, R = 2^64) turns every modular
//! product into a multiply, a wrapping multiply and a shift, with no u128
//! division.
//!
//! Reference: Peter L. Montgomery, "Modular Multiplication Without Trial
//! Division", Mathematics of Computation, 44(170):519–521, 1985.

/// Precomputed constants for arithmetic modulo an odd `n > 1`.
#[derive(Clone, Copy, Debug)]
pub struct Montgomery {
    n: u64,
    /// -n⁻¹ mod 2^64.
    n_neg_inv: u64,
    /// R mod n, the Montgomery form of 1.
    one: u64,
    /// R² mod n.
    r_squared: u64,
}

impl Montgomery {
    /// Returns `None` for an even modulus or a modulus below 3.
    pub fn new(n: u64) -> Option<Self> {
        if n < 3 || n.is_multiple_of(2) {
            return None;
        }

        // Newton iteration for n⁻¹ mod 2^64: every step doubles the number of
        // correct low bits, starting from 1 correct bit (n odd).
        let mut inv: u64 = 1;
        for _ in 0..6 {
            inv = inv.wrapping_mul(2u64.wrapping_sub(n.wrapping_mul(inv)));
        }

        let one = ((1u128 << 64) % n as u128) as u64;
        let r_squared = ((one as u128 * one as u128) % n as u128) as u64;

        Some(Montgomery {
            n,
            n_neg_inv: inv.wrapping_neg(),
            one,
            r_squared,
        })
    }

    pub fn modulus(&self) -> u64 {
        self.n
    }

    /// 1 in Montgomery form.
    #[inline]
    pub fn one(&self) -> u64 {
        self.one
    }

    #[inline]
    pub fn to_mont(&self, a: u64) -> u64 {
        self.mul(a % self.n, self.r_squared)
    }

    #[inline]
    pub fn from_mont(&self, a: u64) -> u64 {
        self.redc(a as u128)
    }

    /// REDC: t·R⁻¹ mod n for t < n·R.
    #[inline]
    fn redc(&self, t: u128) -> u64 {
        let m = (t as u64).wrapping_mul(self.n_neg_inv);
        let (sum, carry) = t.overflowing_add(m as u128 * self.n as u128);
        let mut r = (sum >> 64) as u64;
        if carry {
            // The true sum is sum + 2^128, so the shifted value gains 2^64.
            r = r.wrapping_sub(self.n);
        } else if r >= self.n {
            r -= self.n;
        }
        r
    }

    /// Product of two Montgomery-form values, in Montgomery form.
    #[inline]
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        self.redc(a as u128 * b as u128)
    }

    /// `base^exp` with base and result in Montgomery form.
    pub fn pow(&self, base: u64, mut exp: u64) -> u64 {
        let mut result = self.one;
        let mut b = base;
        while exp > 0 {
            if exp & 1 == 1 {
                result = self.mul(result, b);
            }
            exp >>= 1;
            if exp > 0 {
                b = self.mul(b, b);
            }
        }
        result
    }
}
