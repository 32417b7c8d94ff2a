//! Generated actions for QUICK matches.
//!
//! Nobody submits actions in a QUICK battle; each tick the worker plays the
//! agent whose turn it is with a canned move.

use arena_types::{ActiveMatch, QueuedAction};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Keyword recorded for generated actions.
pub const AUTO_KEYWORD: &str = "Auto-Attack";

/// Narratives generated actions pick from.
pub const AUTO_NARRATIVES: [&str; 4] = [
    "launches a recursive loop attack!",
    "deploys a logic bomb.",
    "overloads the neural buffer.",
    "injects a SQL query.",
];

/// One action for every QUICK match in `matches`, played by the agent whose
/// turn it is.
pub fn auto_actions<R: Rng + ?Sized>(matches: &[ActiveMatch], rng: &mut R) -> Vec<QueuedAction> {
    matches
        .iter()
        .filter(|m| m.is_quick())
        .map(|m| {
            let (_, actor) = m.actor_for_turn();
            let narrative = AUTO_NARRATIVES.choose(rng).copied().unwrap_or_default();
            QueuedAction {
                match_id: m.id.clone(),
                agent_id: actor.clone(),
                narrative: narrative.to_owned(),
                keyword: Some(AUTO_KEYWORD.to_owned()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use arena_types::BattleType;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn state(id: &str, turn: u32, battle_type: Option<BattleType>) -> ActiveMatch {
        ActiveMatch {
            id: id.into(),
            agent1_id: "alpha".into(),
            agent2_id: "bravo".into(),
            turn,
            battle_type,
        }
    }

    #[test]
    fn only_quick_matches_are_played() {
        let matches = [
            state("m-1", 1, Some(BattleType::Quick)),
            state("m-2", 1, Some(BattleType::Other)),
            state("m-3", 1, None),
        ];
        let actions = auto_actions(&matches, &mut SmallRng::seed_from_u64(7));
        assert_eq!(actions.len(), 1);
        assert_eq!(actions.first().map(|a| a.match_id.as_str()), Some("m-1"));
    }

    #[test]
    fn actor_alternates_by_turn() {
        let matches = [
            state("odd", 3, Some(BattleType::Quick)),
            state("even", 4, Some(BattleType::Quick)),
        ];
        let actions = auto_actions(&matches, &mut SmallRng::seed_from_u64(7));
        let actors: Vec<&str> = actions.iter().map(|a| a.agent_id.as_str()).collect();
        assert_eq!(actors, ["alpha", "bravo"]);
    }

    #[test]
    fn generated_actions_use_canned_moves() {
        let matches = [state("m-1", 1, Some(BattleType::Quick))];
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            for action in auto_actions(&matches, &mut rng) {
                assert!(AUTO_NARRATIVES.contains(&action.narrative.as_str()));
                assert_eq!(action.keyword_or_default(), AUTO_KEYWORD);
            }
        }
    }

    #[test]
    fn no_matches_no_actions() {
        assert!(auto_actions(&[], &mut SmallRng::seed_from_u64(1)).is_empty());
    }
}
