use crate::{SnowViVariant, model::SnowViCore};
use cipher::{
    Block, BlockSizeUser, ParBlocksSizeUser, StreamBackend,
    consts::{U1, U16},
};

/// The software backend for SNOW-Vi.
pub(crate) struct Backend<'a, V: SnowViVariant>(pub(crate) &'a mut SnowViCore<V>);

impl<V: SnowViVariant> BlockSizeUser for Backend<'_, V> {
    type BlockSize = U16;
}

impl<V: SnowViVariant> ParBlocksSizeUser for Backend<'_, V> {
    // Each word depends on the state left by the previous one.
    type ParBlocksSize = U1;
}

impl<V: SnowViVariant> StreamBackend for Backend<'_, V> {
    #[inline(always)]
    fn gen_ks_block(&mut self, block: &mut Block<Self>) {
        // 1. Emit z of the current state.
        block.copy_from_slice(&self.0.keystream_bytes());

        // 2. Clock the FSM and LFSRs for the next word.
        self.0.step();
    }
}
