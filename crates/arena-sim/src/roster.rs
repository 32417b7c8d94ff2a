//! The two fighters of a simulated match.

/// Hit points every combatant starts with.
pub const STARTING_HP: u32 = 100;

/// A simulated fighter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combatant {
    /// Short stable key (`agent_a`, `agent_b`).
    pub key: String,
    /// Display name, also used to open every generated narrative.
    pub name: String,
    /// Flavor keywords.
    pub style: String,
    /// Remaining hit points.
    pub hp: u32,
}

impl Combatant {
    /// A fresh combatant at full health.
    pub fn new(key: impl Into<String>, name: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            style: style.into(),
            hp: STARTING_HP,
        }
    }

    /// Subtract `amount` hit points, stopping at zero.
    pub const fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    /// Whether this combatant has been knocked out.
    pub const fn is_down(&self) -> bool {
        self.hp == 0
    }
}

/// The default matchup: a hacker against a mage.
pub fn default_pair() -> (Combatant, Combatant) {
    (
        Combatant::new("agent_a", "Zero-K (Hacker)", "Cyberpunk, Technical, Glitch"),
        Combatant::new("agent_b", "Eldric (Mage)", "Fantasy, Arcane, Ancient"),
    )
}
