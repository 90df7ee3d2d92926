use bitflags::bitflags;

bitflags! {
    /// Charge-consuming capabilities an actor declares at construction.
    ///
    /// Each set flag needs its own energy slot. Slots are ordered by bit
    /// position, so an actor with `THROW_FORCE | FUSE_DELAY` reads the force
    /// from slot 0 and the fuse delay from slot 1.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Capabilities: u8 {
        const THROW_FORCE = 1 << 0;
        const FUSE_DELAY  = 1 << 1;
        const SPREAD      = 1 << 2;
    }
}

impl Capabilities {
    /// Number of energy slots these capabilities need.
    pub fn required_slots(self) -> usize {
        self.bits().count_ones() as usize
    }

    /// Slot index feeding `capability`, if declared.
    pub fn slot_of(self, capability: Capabilities) -> Option<usize> {
        if !self.contains(capability) || capability.bits().count_ones() != 1 {
            return None;
        }
        let below = capability.bits() - 1;
        Some((self.bits() & below).count_ones() as usize)
    }
}
