//! Mock narrative actions.
//!
//! Each turn both combatants get a random action: a template picked by
//! action kind with its `{adjective}`, `{noun}`, `{verb}` and `{target}`
//! slots filled from fixed word lists.

use std::fmt;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::roster::Combatant;

/// Probability that a generated action is an attack.
pub const ATTACK_CHANCE: f64 = 0.7;

/// Attack narrative templates.
pub const ATTACK_TEMPLATES: [&str; 3] = [
    "unleashes a {adjective} {noun} that {verb} the opponent's {target}.",
    "casts a {adjective} spell of {noun}, aiming to {verb} the {target}.",
    "executes a {adjective} script that {verb} the enemy's {target} with {noun}.",
];

/// Defense narrative templates.
pub const DEFEND_TEMPLATES: [&str; 3] = [
    "raises a {adjective} shield of {noun} to deflect the attack.",
    "activates a {adjective} firewall to block incoming {noun}.",
    "phases into a {adjective} dimension, evading the {noun}.",
];

const ADJECTIVES: [&str; 7] = [
    "quantum",
    "burning",
    "glitchy",
    "ancient",
    "spectral",
    "recursive",
    "void",
];
const NOUNS: [&str; 7] = [
    "packet",
    "fireball",
    "logic bomb",
    "barrier",
    "shadow",
    "algorithm",
    "mana",
];
const VERBS: [&str; 6] = [
    "shatters",
    "pierces",
    "corrupts",
    "incinerates",
    "overwrites",
    "banishes",
];
const TARGETS: [&str; 5] = ["core", "defense", "soul", "mainframe", "consciousness"];

/// Whether an action attacks or defends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Offensive move.
    Attack,
    /// Defensive move.
    Defend,
}

impl ActionKind {
    /// Label sent to the judge.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attack => "ATTACK",
            Self::Defend => "DEFEND",
        }
    }

    const fn templates(self) -> &'static [&'static str] {
        match self {
            Self::Attack => &ATTACK_TEMPLATES,
            Self::Defend => &DEFEND_TEMPLATES,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAction {
    /// Name of the acting combatant.
    pub agent_name: String,
    /// Attack or defend.
    pub kind: ActionKind,
    /// `"{name} {filled template}"`.
    pub narrative: String,
    /// Flavor intensity, 1 through 10.
    pub intensity: u8,
}

/// Generate a random action for `combatant`.
pub fn generate_action<R: Rng + ?Sized>(combatant: &Combatant, rng: &mut R) -> GeneratedAction {
    let kind = if rng.random_bool(ATTACK_CHANCE) {
        ActionKind::Attack
    } else {
        ActionKind::Defend
    };
    let template = kind.templates().choose(rng).copied().unwrap_or_default();

    let filled = template
        .replace("{adjective}", pick(&ADJECTIVES, rng))
        .replace("{noun}", pick(&NOUNS, rng))
        .replace("{verb}", pick(&VERBS, rng))
        .replace("{target}", pick(&TARGETS, rng));

    GeneratedAction {
        agent_name: combatant.name.clone(),
        kind,
        narrative: format!("{} {filled}", combatant.name),
        intensity: rng.random_range(1..=10),
    }
}

fn pick<R: Rng + ?Sized>(words: &[&'static str], rng: &mut R) -> &'static str {
    words.choose(rng).copied().unwrap_or_default()
}
