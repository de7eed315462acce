use crate::{
    Error, INIT_ROUNDS, IV_BYTES, IV_WORDS, KEY_BYTES, KEY_WORDS, KEYSTREAM_BYTES, SnowViVariant,
    backends, snapshot::Snapshot, state::CipherState,
};
use cipher::{
    AlgorithmName, BlockSizeUser, Iv, IvSizeUser, Key, KeyIvInit, KeySizeUser, StreamCipherCore,
    StreamClosure,
    consts::{U16, U32},
};
use core::{fmt, marker::PhantomData};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Where the traced initializer is when it reports the registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InitPhase {
    /// Key and IV are loaded, no round has run yet.
    Loaded,
    /// Warm-up round `n` of [`INIT_ROUNDS`] has completed (1-based).
    Round(usize),
}

/// The SNOW-Vi reference model.
///
/// A value of this type only exists once the warm-up has completed, so every
/// keystream read sees a fully initialized state.
pub struct SnowViCore<V: SnowViVariant> {
    /// LFSRs and FSM registers
    pub(crate) state: CipherState,
    /// Steps taken since initialization
    pub(crate) steps: u64,
    /// PhantomData to tie the struct to the SnowViVariant
    pub(crate) _variant: PhantomData<V>,
}

impl<V: SnowViVariant> SnowViCore<V> {
    /// Loads `key` (32 bytes) and `iv` (16 bytes) and runs the warm-up.
    pub fn initialize(key: &[u8], iv: &[u8]) -> Result<Self, Error> {
        Self::initialize_traced(key, iv, |_, _| {})
    }

    /// Like [`initialize`](Self::initialize), with the key as eight and the
    /// IV as four little-endian 32-bit words.
    pub fn initialize_words(key: &[u32], iv: &[u32]) -> Result<Self, Error> {
        let key: &[u32; KEY_WORDS] = key
            .try_into()
            .map_err(|_| Error::InvalidKeyLength { len: key.len() })?;
        let iv: &[u32; IV_WORDS] = iv
            .try_into()
            .map_err(|_| Error::InvalidIvLength { len: iv.len() })?;

        let mut key_bytes = [0u8; KEY_BYTES];
        for (chunk, word) in key_bytes.chunks_exact_mut(4).zip(key) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        let mut iv_bytes = [0u8; IV_BYTES];
        for (chunk, word) in iv_bytes.chunks_exact_mut(4).zip(iv) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }

        let model = Self::warm_up(&key_bytes, &iv_bytes, |_, _| {});
        key_bytes.zeroize();
        Ok(model)
    }

    /// Runs the initialization and hands `observe` a snapshot right after
    /// loading and after each of the [`INIT_ROUNDS`] warm-up rounds.
    ///
    /// The warm-up's internal keystream values are never passed out.
    pub fn initialize_traced(
        key: &[u8],
        iv: &[u8],
        observe: impl FnMut(InitPhase, &Snapshot),
    ) -> Result<Self, Error> {
        let (key, iv) = check_lengths(key, iv)?;
        Ok(Self::warm_up(key, iv, observe))
    }

    /// Re-keys the model in place. On error the current state is kept.
    pub fn reinitialize(&mut self, key: &[u8], iv: &[u8]) -> Result<(), Error> {
        let (key, iv) = check_lengths(key, iv)?;
        let fresh = Self::warm_up(key, iv, |_, _| {});
        self.state.clone_from(&fresh.state);
        self.steps = 0;
        Ok(())
    }

    fn warm_up(
        key: &[u8; KEY_BYTES],
        iv: &[u8; IV_BYTES],
        mut observe: impl FnMut(InitPhase, &Snapshot),
    ) -> Self {
        let mut state = CipherState::load(key, iv, &V::LFSR_B_LOW);
        observe(InitPhase::Loaded, &state.snapshot());

        for round in 1..=INIT_ROUNDS {
            state.warm_up(round, key);
            #[cfg(feature = "log")]
            log::trace!("{}: warm-up round {}/{} done", V::NAME, round, INIT_ROUNDS);
            observe(InitPhase::Round(round), &state.snapshot());
        }

        #[cfg(feature = "log")]
        log::debug!("{}: initialized", V::NAME);

        Self {
            state,
            steps: 0,
            _variant: PhantomData,
        }
    }

    /// Advances the cipher by one clock: FSM update, then eight LFSR shifts.
    #[inline]
    pub fn step(&mut self) {
        self.state.step();
        self.steps = self.steps.wrapping_add(1);
    }

    /// The 128-bit keystream word of the current state as four 32-bit lanes,
    /// least significant lane first. Reading does not advance the cipher.
    #[inline]
    pub fn keystream_word(&self) -> [u32; 4] {
        self.state.keystream()
    }

    /// The current keystream word as the 16 bytes XORed into data.
    #[inline]
    pub fn keystream_bytes(&self) -> [u8; KEYSTREAM_BYTES] {
        let mut out = [0u8; KEYSTREAM_BYTES];
        for (chunk, lane) in out.chunks_exact_mut(4).zip(self.keystream_word()) {
            chunk.copy_from_slice(&lane.to_le_bytes());
        }
        out
    }

    /// Reads the current keystream word, then steps.
    #[inline]
    pub fn next_keystream_word(&mut self) -> [u32; 4] {
        let z = self.keystream_word();
        self.step();
        z
    }

    /// Endless iterator over keystream lanes in emission order.
    pub fn words(&mut self) -> KeystreamWords<'_, V> {
        KeystreamWords {
            model: self,
            word: [0; 4],
            lane: 4,
        }
    }

    /// Copy of all registers.
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Steps taken since the last (re)initialization.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

fn check_lengths<'a>(
    key: &'a [u8],
    iv: &'a [u8],
) -> Result<(&'a [u8; KEY_BYTES], &'a [u8; IV_BYTES]), Error> {
    let key = key
        .try_into()
        .map_err(|_| Error::InvalidKeyLength { len: key.len() })?;
    let iv = iv
        .try_into()
        .map_err(|_| Error::InvalidIvLength { len: iv.len() })?;
    Ok((key, iv))
}

/// Keystream as single 32-bit lanes, returned by [`SnowViCore::words`].
///
/// A whole 128-bit word is taken from the model at a time; lanes not yet
/// yielded when the iterator is dropped are lost.
pub struct KeystreamWords<'a, V: SnowViVariant> {
    model: &'a mut SnowViCore<V>,
    word: [u32; 4],
    lane: usize,
}

impl<V: SnowViVariant> Iterator for KeystreamWords<'_, V> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.lane == self.word.len() {
            self.word = self.model.next_keystream_word();
            self.lane = 0;
        }
        let lane = self.word[self.lane];
        self.lane += 1;
        Some(lane)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<V: SnowViVariant> Clone for SnowViCore<V> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            steps: self.steps,
            _variant: PhantomData,
        }
    }
}

impl<V: SnowViVariant> fmt::Debug for SnowViCore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SnowViCore<{}> {{ ... }}", V::NAME)
    }
}

impl<V: SnowViVariant> KeySizeUser for SnowViCore<V> {
    type KeySize = U32;
}

impl<V: SnowViVariant> IvSizeUser for SnowViCore<V> {
    type IvSize = U16;
}

impl<V: SnowViVariant> BlockSizeUser for SnowViCore<V> {
    type BlockSize = U16; // one 128-bit keystream word
}

impl<V: SnowViVariant> KeyIvInit for SnowViCore<V> {
    fn new(key: &Key<Self>, iv: &Iv<Self>) -> Self {
        Self::warm_up(key.as_ref(), iv.as_ref(), |_, _| {})
    }
}

impl<V: SnowViVariant> AlgorithmName for SnowViCore<V> {
    fn write_alg_name(f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(V::NAME)
    }
}

impl<V: SnowViVariant> StreamCipherCore for SnowViCore<V> {
    fn remaining_blocks(&self) -> Option<usize> {
        None
    }

    fn process_with_backend(&mut self, f: impl StreamClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut backends::soft::Backend(self));
    }
}

impl<V: SnowViVariant> Drop for SnowViCore<V> {
    fn drop(&mut self) {
        self.state.zeroize();
        self.steps.zeroize();
    }
}

impl<V: SnowViVariant> ZeroizeOnDrop for SnowViCore<V> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StreamMode;

    type Model = SnowViCore<StreamMode>;

    #[test]
    fn rejects_wrong_lengths() {
        assert_eq!(
            Model::initialize(&[0; 16], &[0; 16]).unwrap_err(),
            Error::InvalidKeyLength { len: 16 }
        );
        assert_eq!(
            Model::initialize(&[0; 32], &[0; 12]).unwrap_err(),
            Error::InvalidIvLength { len: 12 }
        );
        assert_eq!(
            Model::initialize_words(&[0; 8], &[0; 5]).unwrap_err(),
            Error::InvalidIvLength { len: 5 }
        );
        assert_eq!(
            Model::initialize_words(&[0; 4], &[0; 4]).unwrap_err(),
            Error::InvalidKeyLength { len: 4 }
        );
    }

    #[test]
    fn keystream_word_is_a_read() {
        let model = Model::initialize(&[7; 32], &[9; 16]).unwrap();
        assert_eq!(model.keystream_word(), model.keystream_word());
        assert_eq!(model.steps(), 0);
    }

    #[test]
    fn next_keystream_word_advances() {
        let mut model = Model::initialize(&[7; 32], &[9; 16]).unwrap();
        let first = model.keystream_word();
        assert_eq!(model.next_keystream_word(), first);
        assert_eq!(model.steps(), 1);
        assert_ne!(model.keystream_word(), first);
    }

    #[test]
    fn words_follow_lane_order() {
        let mut reference = Model::initialize(&[1; 32], &[2; 16]).unwrap();
        let mut model = reference.clone();

        let mut lanes = model.words();
        for _ in 0..3 {
            let word = reference.next_keystream_word();
            for lane in word {
                assert_eq!(lanes.next(), Some(lane));
            }
        }
        drop(lanes);
        assert_eq!(model.steps(), 3);
    }

    #[test]
    fn byte_and_word_initializers_agree() {
        let key: [u8; 32] = core::array::from_fn(|i| i as u8);
        let iv: [u8; 16] = core::array::from_fn(|i| 0xf0 + i as u8);
        let key_words = [
            0x0302_0100, 0x0706_0504, 0x0b0a_0908, 0x0f0e_0d0c,
            0x1312_1110, 0x1716_1514, 0x1b1a_1918, 0x1f1e_1d1c,
        ];
        let iv_words = [0xf3f2_f1f0, 0xf7f6_f5f4, 0xfbfa_f9f8, 0xfffe_fdfc];

        let from_bytes = Model::initialize(&key, &iv).unwrap();
        let from_words = Model::initialize_words(&key_words, &iv_words).unwrap();
        assert_eq!(from_bytes.snapshot(), from_words.snapshot());
    }

    #[test]
    fn reinitialize_resets_and_keeps_state_on_error() {
        let mut model = Model::initialize(&[3; 32], &[4; 16]).unwrap();
        let fresh = model.snapshot();
        model.step();
        model.step();

        let advanced = model.snapshot();
        assert!(model.reinitialize(&[3; 31], &[4; 16]).is_err());
        assert_eq!(model.snapshot(), advanced);
        assert_eq!(model.steps(), 2);

        model.reinitialize(&[3; 32], &[4; 16]).unwrap();
        assert_eq!(model.snapshot(), fresh);
        assert_eq!(model.steps(), 0);
    }

    #[test]
    fn traced_initialization_reports_every_round() {
        let mut phases = [None; INIT_ROUNDS + 1];
        let mut last = Snapshot::default();
        let mut count = 0;
        let model = Model::initialize_traced(&[0; 32], &[0; 16], |phase, snap| {
            phases[count] = Some(phase);
            last = *snap;
            count += 1;
        })
        .unwrap();

        assert_eq!(count, INIT_ROUNDS + 1);
        assert_eq!(phases[0], Some(InitPhase::Loaded));
        assert_eq!(phases[INIT_ROUNDS], Some(InitPhase::Round(INIT_ROUNDS)));
        assert_eq!(last, model.snapshot());
    }
}
