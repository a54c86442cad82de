//! Galois Field GF(2^8) arithmetic for Reed-Solomon shard coding
//!
//! Elements are single bytes, so every shard byte is one field symbol and
//! shard buffers need no alignment or padding.
//!
//! The field is generated by the primitive polynomial 0x11D
//! (x⁸ + x⁴ + x³ + x² + 1), the usual choice for byte-oriented
//! Reed-Solomon codes.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};
use std::sync::OnceLock;

/// GF(2^8) generator polynomial: 0x11D (x⁸ + x⁴ + x³ + x² + 1)
const GF8_GENERATOR: u32 = 0x11D;

const FIELD_SIZE: usize = 256;
const LIMIT: usize = FIELD_SIZE - 1;

/// Galois Field lookup tables for fast arithmetic
pub struct GaloisTable {
    pub log: [u8; FIELD_SIZE],
    /// Doubled so `log[a] + log[b]` never needs a modulo
    pub antilog: [u8; 2 * LIMIT],
}

impl Default for GaloisTable {
    fn default() -> Self {
        Self::new()
    }
}

impl GaloisTable {
    pub fn new() -> Self {
        let mut table = GaloisTable {
            log: [0; FIELD_SIZE],
            antilog: [0; 2 * LIMIT],
        };
        table.build_tables();
        table
    }

    fn build_tables(&mut self) {
        let mut b = 1u32;

        for l in 0..LIMIT {
            self.log[b as usize] = l as u8;
            self.antilog[l] = b as u8;
            self.antilog[l + LIMIT] = b as u8;

            b <<= 1;
            if b & FIELD_SIZE as u32 != 0 {
                b ^= GF8_GENERATOR;
            }
        }

        // log(0) is undefined; every caller checks for zero first
        self.log[0] = 0;
    }
}

fn galois_table() -> &'static GaloisTable {
    static TABLE: OnceLock<GaloisTable> = OnceLock::new();
    TABLE.get_or_init(GaloisTable::new)
}

/// Galois Field element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Galois8 {
    value: u8,
}

impl Galois8 {
    pub const ZERO: Self = Self { value: 0 };
    pub const ONE: Self = Self { value: 1 };

    pub const fn new(value: u8) -> Self {
        Self { value }
    }

    pub const fn value(&self) -> u8 {
        self.value
    }

    pub const fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Power operation; `0^0` is 1 so Vandermonde rows start with ones
    pub fn pow(&self, exponent: usize) -> Self {
        if exponent == 0 {
            return Self::ONE;
        }
        if self.value == 0 {
            return Self::ZERO;
        }

        let table = galois_table();
        let log_val = table.log[self.value as usize] as usize;
        let result_log = (log_val * exponent) % LIMIT;
        Self::new(table.antilog[result_log])
    }

    /// Multiplicative inverse, `None` for zero
    pub fn inverse(&self) -> Option<Self> {
        if self.value == 0 {
            return None;
        }
        let table = galois_table();
        let log_val = table.log[self.value as usize] as usize;
        Some(Self::new(table.antilog[LIMIT - log_val]))
    }

    /// Division that reports a zero divisor instead of panicking
    pub fn checked_div(&self, rhs: Self) -> Option<Self> {
        rhs.inverse().map(|inv| *self * inv)
    }
}

// Addition (XOR in Galois fields)
impl Add for Galois8 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.value ^ rhs.value)
    }
}

impl AddAssign for Galois8 {
    fn add_assign(&mut self, rhs: Self) {
        self.value ^= rhs.value;
    }
}

// Subtraction (same as addition in GF(2^n))
impl Sub for Galois8 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.value ^ rhs.value)
    }
}

impl SubAssign for Galois8 {
    fn sub_assign(&mut self, rhs: Self) {
        self.value ^= rhs.value;
    }
}

// Multiplication using log tables
impl Mul for Galois8 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.value == 0 || rhs.value == 0 {
            return Self::ZERO;
        }

        let table = galois_table();
        let log_sum =
            table.log[self.value as usize] as usize + table.log[rhs.value as usize] as usize;
        Self::new(table.antilog[log_sum])
    }
}

impl MulAssign for Galois8 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

// Division using log tables
impl Div for Galois8 {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        if rhs.value == 0 {
            panic!("Division by zero in Galois field");
        }
        if self.value == 0 {
            return Self::ZERO;
        }

        let table = galois_table();
        let log_diff = table.log[self.value as usize] as usize + LIMIT
            - table.log[rhs.value as usize] as usize;
        Self::new(table.antilog[log_diff])
    }
}

impl DivAssign for Galois8 {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl From<u8> for Galois8 {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Galois8> for u8 {
    fn from(val: Galois8) -> Self {
        val.value
    }
}

impl std::fmt::Display for Galois8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Full product table for one coefficient: `table[x] = coefficient * x`
pub struct MulTable {
    pub table: [u8; FIELD_SIZE],
}

/// Build the product table for a coefficient
#[inline]
pub fn build_mul_table(coefficient: Galois8) -> MulTable {
    let mut table = [0u8; FIELD_SIZE];
    let coeff_val = coefficient.value();

    if coeff_val == 0 {
        return MulTable { table };
    }

    if coeff_val == 1 {
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = i as u8;
        }
        return MulTable { table };
    }

    let galois = galois_table();
    let coeff_log = galois.log[coeff_val as usize] as usize;
    for (i, entry) in table.iter_mut().enumerate().skip(1) {
        *entry = galois.antilog[galois.log[i] as usize + coeff_log];
    }

    MulTable { table }
}

/// Process entire slice at once: output = coefficient * input (direct write, no XOR)
#[inline]
pub fn process_slice_multiply(input: &[u8], output: &mut [u8], tables: &MulTable) {
    for (out, &byte) in output.iter_mut().zip(input) {
        *out = tables.table[byte as usize];
    }
}

/// Process entire slice at once: output += coefficient * input (XOR accumulate)
#[inline]
pub fn process_slice_multiply_add(input: &[u8], output: &mut [u8], tables: &MulTable) {
    let table = &tables.table;
    let mut out_chunks = output.chunks_exact_mut(8);
    let mut in_chunks = input.chunks_exact(8);

    // 8 bytes per iteration keeps the table lookups independent
    for (out, inp) in (&mut out_chunks).zip(&mut in_chunks) {
        out[0] ^= table[inp[0] as usize];
        out[1] ^= table[inp[1] as usize];
        out[2] ^= table[inp[2] as usize];
        out[3] ^= table[inp[3] as usize];
        out[4] ^= table[inp[4] as usize];
        out[5] ^= table[inp[5] as usize];
        out[6] ^= table[inp[6] as usize];
        out[7] ^= table[inp[7] as usize];
    }

    for (out, &byte) in out_chunks
        .into_remainder()
        .iter_mut()
        .zip(in_chunks.remainder())
    {
        *out ^= table[byte as usize];
    }
}
