//! The two GF(2^16) LFSRs of SNOW-Vi.
//!
//! Cells are stored lowest index first: `cells[0]` is `a0` (the cell
//! retired by the next shift) and `cells[15]` is `a15` (where feedback
//! enters).

use crate::LFSR_CELLS;

/// Feedback constant of `gA(x)`, the reduction polynomial of LFSR-A.
pub(crate) const POLY_A: u16 = 0x4a6d;
/// Feedback constant of `gB(x)`, the reduction polynomial of LFSR-B.
pub(crate) const POLY_B: u16 = 0xcc87;

/// Cells shifted per FSM clock.
pub(crate) const SHIFTS_PER_STEP: usize = 8;

/// Multiplication by the generator `x` in GF(2^16) with reduction constant `c`.
#[inline(always)]
pub(crate) const fn mulx(v: u16, c: u16) -> u16 {
    if v & 0x8000 != 0 { (v << 1) ^ c } else { v << 1 }
}

/// Shifts both registers by one cell.
///
/// ```text
/// u ← α·a0 + a7 + b0   mod gA
/// v ← β·b0 + b8 + a0   mod gB
/// (a15, ..., a0) ← (u, a15, ..., a1)
/// (b15, ..., b0) ← (v, b15, ..., b1)
/// ```
#[inline(always)]
pub(crate) fn shift(a: &mut [u16; LFSR_CELLS], b: &mut [u16; LFSR_CELLS]) {
    let u = mulx(a[0], POLY_A) ^ a[7] ^ b[0];
    let v = mulx(b[0], POLY_B) ^ b[8] ^ a[0];

    a.copy_within(1.., 0);
    b.copy_within(1.., 0);
    a[LFSR_CELLS - 1] = u;
    b[LFSR_CELLS - 1] = v;
}

/// Clocks both LFSRs for one cipher step (eight cell shifts).
#[inline(always)]
pub(crate) fn clock(a: &mut [u16; LFSR_CELLS], b: &mut [u16; LFSR_CELLS]) {
    for _ in 0..SHIFTS_PER_STEP {
        shift(a, b);
    }
}

/// Reads the upper half `(x15, ..., x8)` as four 32-bit lanes.
#[inline(always)]
pub(crate) fn high_lanes(cells: &[u16; LFSR_CELLS]) -> [u32; 4] {
    let mut lanes = [0u32; 4];
    for (lane, pair) in lanes.iter_mut().zip(cells[LFSR_CELLS / 2..].chunks_exact(2)) {
        *lane = (pair[0] as u32) | ((pair[1] as u32) << 16);
    }
    lanes
}

/// XORs four 32-bit lanes into the upper half `(x15, ..., x8)`.
#[inline(always)]
pub(crate) fn xor_high_lanes(cells: &mut [u16; LFSR_CELLS], lanes: &[u32; 4]) {
    for (pair, &lane) in cells[LFSR_CELLS / 2..].chunks_exact_mut(2).zip(lanes) {
        pair[0] ^= lane as u16;
        pair[1] ^= (lane >> 16) as u16;
    }
}

/// Loads little-endian byte pairs into consecutive cells.
#[inline(always)]
pub(crate) fn load_cells(dst: &mut [u16], src: &[u8]) {
    for (cell, pair) in dst.iter_mut().zip(src.chunks_exact(2)) {
        *cell = u16::from_le_bytes([pair[0], pair[1]]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mulx_reduces_only_when_msb_set() {
        assert_eq!(mulx(0x1234, POLY_A), 0x2468);
        assert_eq!(mulx(0x8000, POLY_A), POLY_A);
        assert_eq!(mulx(0xffff, POLY_B), 0x3379);
    }

    #[test]
    fn clock_matches_parallel_form() {
        // Eight sequential shifts equal the 128-bit parallel update of the
        // upper halves, since no freshly produced cell is tapped.
        let mut a: [u16; 16] = core::array::from_fn(|i| (i as u16).wrapping_mul(0x9e37) ^ 0x8001);
        let mut b: [u16; 16] = core::array::from_fn(|i| (i as u16).wrapping_mul(0x7f4a) ^ 0x00ff);
        let (a0, b0) = (a, b);

        clock(&mut a, &mut b);

        for i in 0..8 {
            assert_eq!(a[i], a0[i + 8]);
            assert_eq!(b[i], b0[i + 8]);
            assert_eq!(a[i + 8], mulx(a0[i], POLY_A) ^ a0[i + 7] ^ b0[i]);
            assert_eq!(b[i + 8], mulx(b0[i], POLY_B) ^ b0[i + 8] ^ a0[i]);
        }
    }

    #[test]
    fn high_lanes_pack_little_endian() {
        let mut cells = [0u16; 16];
        cells[8] = 0x1111;
        cells[9] = 0x2222;
        cells[15] = 0xabcd;
        assert_eq!(high_lanes(&cells), [0x2222_1111, 0, 0, 0xabcd_0000]);

        xor_high_lanes(&mut cells, &[0x2222_1111, 0, 0, 0xabcd_0000]);
        assert_eq!(cells, [0u16; 16]);
    }
}
