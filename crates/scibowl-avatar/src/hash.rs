//! Seed hashing and the pseudo-random stream driving avatar generation.
//!
//! Both functions are bit-exact ports of well-known 32-bit mixers, so the
//! palette, thresholds, and band shapes drawn for an identity match those
//! of the browser generator. The SVG documents themselves differ: the
//! server adds contour strokes and derives its clip-path id from the seed.

/// cyrb53 over the UTF-16 code units of `input`.
///
/// Returns a 53-bit value: the low 21 bits of the second lane in the high
/// bits, the first lane in the low 32 bits.
pub fn cyrb53(input: &str) -> u64 {
    let mut h1: u32 = 0xdead_beef;
    let mut h2: u32 = 0x41c6_ce57;

    for unit in input.encode_utf16() {
        let ch = u32::from(unit);
        h1 = (h1 ^ ch).wrapping_mul(2_654_435_761);
        h2 = (h2 ^ ch).wrapping_mul(1_597_334_677);
    }

    h1 = (h1 ^ (h1 >> 16)).wrapping_mul(2_246_822_507)
        ^ (h2 ^ (h2 >> 13)).wrapping_mul(3_266_489_909);
    h2 = (h2 ^ (h2 >> 16)).wrapping_mul(2_246_822_507)
        ^ (h1 ^ (h1 >> 13)).wrapping_mul(3_266_489_909);

    (u64::from(h2 & 0x001f_ffff) << 32) | u64::from(h1)
}

/// mulberry32 generator producing uniform floats in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    /// Seed from a hash; only the low 32 bits are used.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: seed as u32,
        }
    }

    /// Next raw 32-bit output.
    pub const fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(1 | s);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        t ^ (t >> 14)
    }

    /// Next float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}
