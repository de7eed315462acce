use zeroize::Zeroize;

use crate::{INIT_ROUNDS, IV_BYTES, KEY_BYTES, LFSR_CELLS, aesr, lfsr, snapshot::Snapshot};

/// Byte permutation σ applied to the new R1.
const SIGMA: [usize; 16] = [0, 4, 8, 12, 1, 5, 9, 13, 2, 6, 10, 14, 3, 7, 11, 15];

/// The full SNOW-Vi register file.
///
/// A zero state is inert: it can be built and inspected, but keystream is
/// only ever read from a state that went through the warm-up inside
/// [`SnowViCore`](crate::SnowViCore).
#[derive(Clone, Default, PartialEq, Eq, Zeroize)]
pub struct CipherState {
    /// LFSR-A cells `a0..a15`.
    pub(crate) a: [u16; LFSR_CELLS],
    /// LFSR-B cells `b0..b15`.
    pub(crate) b: [u16; LFSR_CELLS],
    pub(crate) r1: [u32; 4],
    pub(crate) r2: [u32; 4],
    pub(crate) r3: [u32; 4],
}

impl CipherState {
    /// Returns the all-zero state.
    pub const fn new() -> Self {
        Self {
            a: [0; LFSR_CELLS],
            b: [0; LFSR_CELLS],
            r1: [0; 4],
            r2: [0; 4],
            r3: [0; 4],
        }
    }

    /// Returns a copy of every register.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            lfsr_a: self.a,
            lfsr_b: self.b,
            r1: self.r1,
            r2: self.r2,
            r3: self.r3,
        }
    }

    /// Key/IV loading.
    ///
    /// ```text
    /// (a15, ..., a8) ← (k7, ..., k0)     (a7, ..., a0) ← (iv7, ..., iv0)
    /// (b15, ..., b8) ← (k15, ..., k8)    (b7, ..., b0) ← b_low
    /// R1, R2, R3 ← 0
    /// ```
    pub(crate) fn load(key: &[u8; KEY_BYTES], iv: &[u8; IV_BYTES], b_low: &[u16; 8]) -> Self {
        let (k_lo, k_hi) = key.split_at(KEY_BYTES / 2);
        let mut state = Self::new();
        let (a_lo, a_hi) = state.a.split_at_mut(LFSR_CELLS / 2);
        lfsr::load_cells(a_lo, iv);
        lfsr::load_cells(a_hi, k_lo);
        let (b_lo, b_hi) = state.b.split_at_mut(LFSR_CELLS / 2);
        b_lo.copy_from_slice(b_low);
        lfsr::load_cells(b_hi, k_hi);
        state
    }

    /// `z = (R1 +₃₂ T1) ⊕ R2` for the current state.
    #[inline(always)]
    pub(crate) fn keystream(&self) -> [u32; 4] {
        let t1 = lfsr::high_lanes(&self.b);
        let mut z = [0u32; 4];
        for (((z, &t1), &r1), &r2) in z.iter_mut().zip(&t1).zip(&self.r1).zip(&self.r2) {
            *z = r1.wrapping_add(t1) ^ r2;
        }
        z
    }

    /// ```text
    /// T2 ← (a15, ..., a8)
    /// tmp ← R2 +₃₂ (R3 ⊕ T2)
    /// R3 ← AESR(R2)
    /// R2 ← AESR(R1)
    /// R1 ← σ(tmp)
    /// ```
    #[inline(always)]
    fn update_fsm(&mut self) {
        let t2 = lfsr::high_lanes(&self.a);
        let mut tmp = [0u32; 4];
        for (((tmp, &t2), &r2), &r3) in tmp.iter_mut().zip(&t2).zip(&self.r2).zip(&self.r3) {
            *tmp = (t2 ^ r3).wrapping_add(r2);
        }

        self.r3 = aesr::round(&self.r2);
        self.r2 = aesr::round(&self.r1);
        self.r1 = permute_sigma(&tmp);
    }

    /// One cipher clock. Both halves read the taps of the pre-step state:
    /// the FSM only looks at the upper half of A, which the LFSR update
    /// rewrites, so the FSM goes first.
    #[inline(always)]
    pub(crate) fn step(&mut self) {
        self.update_fsm();
        lfsr::clock(&mut self.a, &mut self.b);
    }

    /// Warm-up round `round` (1-based): the step of the initialization
    /// mode, where z is fed back into LFSR-A and the key is re-injected into
    /// R1 at the two final rounds.
    pub(crate) fn warm_up(&mut self, round: usize, key: &[u8; KEY_BYTES]) {
        let z = self.keystream();
        self.step();
        lfsr::xor_high_lanes(&mut self.a, &z);

        let (k_lo, k_hi) = key.split_at(KEY_BYTES / 2);
        if round == INIT_ROUNDS - 1 {
            xor_lanes(&mut self.r1, k_lo);
        } else if round == INIT_ROUNDS {
            xor_lanes(&mut self.r1, k_hi);
        }
    }
}

impl core::fmt::Debug for CipherState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("CipherState { ... }")
    }
}

#[inline(always)]
fn xor_lanes(r: &mut [u32; 4], bytes: &[u8]) {
    for (r, chunk) in r.iter_mut().zip(bytes.chunks_exact(4)) {
        *r ^= u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
}

#[inline(always)]
fn permute_sigma(x: &[u32; 4]) -> [u32; 4] {
    let mut bytes = [0u8; 16];
    for (chunk, lane) in bytes.chunks_exact_mut(4).zip(x) {
        chunk.copy_from_slice(&lane.to_le_bytes());
    }

    let mut out = [0u32; 4];
    for (j, lane) in out.iter_mut().enumerate() {
        let s = &SIGMA[4 * j..4 * j + 4];
        *lane = u32::from_le_bytes([bytes[s[0]], bytes[s[1]], bytes[s[2]], bytes[s[3]]]);
    }
    out
}
