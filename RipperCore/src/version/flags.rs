//! Transfer instruction flags

use bitflags::bitflags;

bitflags! {
    /// Context flags describing how a serialized region was produced.
    ///
    /// Release data (built players) drops editor-only fields; inspector data keeps
    /// debug-only fields that the editor shows in its property panel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TransferFlags: u32 {
        /// Debug properties are serialized (inspector view).
        const SERIALIZE_DEBUG_PROPERTIES = 1 << 4;
        /// Data was written for a release (player) build.
        const SERIALIZE_GAME_RELEASE = 1 << 8;
        /// Scalars are stored in the opposite byte order.
        const SWAP_ENDIANNESS = 1 << 9;
    }
}

impl Default for TransferFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl TransferFlags {
    /// Release (player) data; editor-only fields are absent.
    pub fn is_release(self) -> bool {
        self.contains(Self::SERIALIZE_GAME_RELEASE)
    }

    /// Data intended for interactive inspection.
    pub fn is_for_inspector(self) -> bool {
        self.contains(Self::SERIALIZE_DEBUG_PROPERTIES)
    }
}
