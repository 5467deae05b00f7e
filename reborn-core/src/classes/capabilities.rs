use bitflags::bitflags;

bitflags! {
    /// Optional behaviours a class supports beyond the base character.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// Spends and regenerates mana.
        const MANA_USER        = 1 << 0;
        /// Can heal an ally.
        const HEALER           = 1 << 1;
        /// Has an attack that hits every living foe.
        const AREA_ATTACKER    = 1 << 2;
        /// Can cast a status effect on a target.
        const STATUS_CASTER    = 1 << 3;
        /// Ignores some status kinds entirely.
        const STATUS_RESISTANT = 1 << 4;
        /// Can call minions into the fight.
        const SUMMONER         = 1 << 5;
    }
}
