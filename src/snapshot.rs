//! Register dumps for cycle-by-cycle comparison against a hardware trace.

use core::fmt;

use crate::{LFSR_CELLS, lfsr};

/// Length of [`Snapshot::to_bytes`]: both LFSRs and the three FSM registers.
pub const SNAPSHOT_BYTES: usize = 2 * 2 * LFSR_CELLS + 3 * 16;

/// A value copy of every SNOW-Vi register.
///
/// Taking a snapshot never touches the live state, and two snapshots taken
/// without a step in between compare equal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Snapshot {
    /// LFSR-A cells, `lfsr_a[0]` is `a0`.
    pub lfsr_a: [u16; LFSR_CELLS],
    /// LFSR-B cells, `lfsr_b[0]` is `b0`.
    pub lfsr_b: [u16; LFSR_CELLS],
    /// FSM register R1 as little-endian 32-bit lanes.
    pub r1: [u32; 4],
    /// FSM register R2.
    pub r2: [u32; 4],
    /// FSM register R3.
    pub r3: [u32; 4],
}

impl Snapshot {
    /// Tap `T1 = (b15, ..., b8)`, the LFSR input to the keystream.
    pub fn t1(&self) -> [u32; 4] {
        lfsr::high_lanes(&self.lfsr_b)
    }

    /// Tap `T2 = (a15, ..., a8)`, the LFSR input to the FSM.
    pub fn t2(&self) -> [u32; 4] {
        lfsr::high_lanes(&self.lfsr_a)
    }

    /// Binary dump: `A || B || R1 || R2 || R3`, every value little-endian.
    pub fn to_bytes(&self) -> [u8; SNAPSHOT_BYTES] {
        let mut out = [0u8; SNAPSHOT_BYTES];
        let (a, rest) = out.split_at_mut(2 * LFSR_CELLS);
        let (b, fsm) = rest.split_at_mut(2 * LFSR_CELLS);

        for (chunk, cell) in a.chunks_exact_mut(2).zip(&self.lfsr_a) {
            chunk.copy_from_slice(&cell.to_le_bytes());
        }
        for (chunk, cell) in b.chunks_exact_mut(2).zip(&self.lfsr_b) {
            chunk.copy_from_slice(&cell.to_le_bytes());
        }
        let lanes = self.r1.iter().chain(&self.r2).chain(&self.r3);
        for (chunk, lane) in fsm.chunks_exact_mut(4).zip(lanes) {
            chunk.copy_from_slice(&lane.to_le_bytes());
        }
        out
    }
}

fn write_cells(f: &mut fmt::Formatter<'_>, name: &str, cells: &[u16]) -> fmt::Result {
    write!(f, "{name:<2} :")?;
    for cell in cells {
        let [lo, hi] = cell.to_le_bytes();
        write!(f, " {lo:02X} {hi:02X}")?;
    }
    writeln!(f)
}

fn write_lanes(f: &mut fmt::Formatter<'_>, name: &str, lanes: &[u32; 4]) -> fmt::Result {
    write!(f, "{name:<2} :")?;
    for lane in lanes {
        for byte in lane.to_le_bytes() {
            write!(f, " {byte:02X}")?;
        }
    }
    writeln!(f)
}

/// One line per register in the order `A, B, R1, R2, R3, T1, T2`, bytes in
/// memory order.
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_cells(f, "A", &self.lfsr_a)?;
        write_cells(f, "B", &self.lfsr_b)?;
        write_lanes(f, "R1", &self.r1)?;
        write_lanes(f, "R2", &self.r2)?;
        write_lanes(f, "R3", &self.r3)?;
        write_lanes(f, "T1", &self.t1())?;
        write_lanes(f, "T2", &self.t2())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_bytes_field_order() {
        let mut snap = Snapshot::default();
        snap.lfsr_a[0] = 0x0201;
        snap.lfsr_b[15] = 0x0403;
        snap.r1[0] = 0x0807_0605;
        snap.r3[3] = 0x0c0b_0a09;

        let bytes = snap.to_bytes();
        assert_eq!(bytes.len(), 112);
        assert_eq!(bytes[..2], [0x01, 0x02]);
        assert_eq!(bytes[62..64], [0x03, 0x04]);
        assert_eq!(bytes[64..68], [0x05, 0x06, 0x07, 0x08]);
        assert_eq!(bytes[108..], [0x09, 0x0a, 0x0b, 0x0c]);
    }

    #[test]
    fn taps_are_upper_halves() {
        let mut snap = Snapshot::default();
        snap.lfsr_a[8] = 0xbeef;
        snap.lfsr_b[9] = 0xcafe;
        assert_eq!(snap.t2(), [0x0000_beef, 0, 0, 0]);
        assert_eq!(snap.t1(), [0xcafe_0000, 0, 0, 0]);
    }
}
