//! Template strategies.
//!
//! The demo agent has no LLM of its own. It picks one of a few phase plans,
//! drops inventory items into the plan's slots, and prefixes a summary of
//! the arena it is about to fight in.

use arena_types::ArenaInfo;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Items used when the inventory is empty.
pub const FALLBACK_ITEMS: [&str; 3] = ["Punch", "Kick", "Block"];

/// Longest arena description quoted in a strategy, in characters.
pub const DESCRIPTION_LIMIT: usize = 100;

const STRATEGY_TEMPLATES: [&str; 3] = [
    "My battle strategy:
Step 1: Survey the battlefield closely and take the high ground.
Step 2: Open the attack with {item1}.
Step 3: Read the opponent's response, then press on with {item2} or defend with {item3}.
Step 4: Lure the opponent into the arena's hazards.
Step 5: At the decisive moment, commit everything to a finishing blow.",
    "Battle plan:
- Opening: Hold a defensive stance with {item3} and study the opponent's patterns
- Midgame: Take the lead with a combo of {item1} and {item2}
- Late game: Turn the environment into a weapon
- Finish: Strike the weakness the opponent has exposed",
    "Victory strategy:
Phase 1: Recon - map the terrain and its hazards
Phase 2: Pressure - restrict the opponent's movement with {item1}
Phase 3: Confusion - alternate {item3} and {item2} to keep the opponent guessing
Phase 4: Focus - concentrate every attack the moment a weakness shows
Phase 5: Close out - do not let the advantage slip",
];

/// Build a strategy for an agent holding `items` in `arena`.
pub fn generate_strategy<R: Rng + ?Sized>(
    items: &[String],
    arena: &ArenaInfo,
    rng: &mut R,
) -> String {
    let template = STRATEGY_TEMPLATES.choose(rng).copied().unwrap_or_default();

    let available: Vec<&str> = if items.is_empty() {
        FALLBACK_ITEMS.to_vec()
    } else {
        items.iter().map(String::as_str).collect()
    };
    let mut item = || available.choose(rng).copied().unwrap_or_default();
    let plan = template
        .replace("{item1}", item())
        .replace("{item2}", item())
        .replace("{item3}", item());

    let description = arena.description.as_deref().map_or_else(
        || "A standard battleground".to_owned(),
        |d| d.chars().take(DESCRIPTION_LIMIT).collect(),
    );
    let hazards = if arena.hazards.is_empty() {
        "None".to_owned()
    } else {
        arena.hazards.join(", ")
    };
    let equipment = if items.is_empty() {
        "Basic gear".to_owned()
    } else {
        items.join(", ")
    };

    format!(
        "[Arena Analysis]
- Name: {name}
- Environment: {description}...
- Hazards: {hazards}
- Special condition: {special}

[My Equipment]
- {equipment}

{plan}
",
        name = arena.name.as_deref().unwrap_or("Unknown"),
        special = arena.special_condition.as_deref().unwrap_or("None"),
    )
}

/// First `limit` characters of `text` on a single line, for log output.
pub fn preview(text: &str, limit: usize) -> String {
    text.chars()
        .take(limit)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn arena() -> ArenaInfo {
        ArenaInfo {
            name: Some("Neon Scrapyard".to_owned()),
            description: Some("x".repeat(250)),
            hazards: vec!["acid rain".to_owned(), "live wires".to_owned()],
            special_condition: Some("Low gravity".to_owned()),
        }
    }

    #[test]
    fn fills_every_slot_from_the_inventory() {
        let items = vec!["Plasma Whip".to_owned(), "Mirror Cloak".to_owned()];
        let mut rng = SmallRng::seed_from_u64(4);
        for _ in 0..20 {
            let strategy = generate_strategy(&items, &arena(), &mut rng);
            assert!(!strategy.contains("{item"));
            assert!(strategy.contains("- Plasma Whip, Mirror Cloak"));
            assert!(!FALLBACK_ITEMS.iter().any(|f| strategy.contains(f)));
        }
    }

    #[test]
    fn empty_inventory_uses_fallback_items() {
        let strategy = generate_strategy(&[], &arena(), &mut SmallRng::seed_from_u64(9));
        assert!(strategy.contains("- Basic gear"));
        assert!(FALLBACK_ITEMS.iter().any(|f| strategy.contains(f)));
    }

    #[test]
    fn arena_block_is_summarized() {
        let strategy = generate_strategy(&[], &arena(), &mut SmallRng::seed_from_u64(1));
        assert!(strategy.starts_with("[Arena Analysis]\n- Name: Neon Scrapyard\n"));
        assert!(strategy.contains(&format!("- Environment: {}...\n", "x".repeat(100))));
        assert!(!strategy.contains(&"x".repeat(101)));
        assert!(strategy.contains("- Hazards: acid rain, live wires"));
        assert!(strategy.contains("- Special condition: Low gravity"));
    }

    #[test]
    fn unknown_arena_gets_placeholders() {
        let strategy =
            generate_strategy(&[], &ArenaInfo::default(), &mut SmallRng::seed_from_u64(1));
        assert!(strategy.contains("- Name: Unknown"));
        assert!(strategy.contains("- Environment: A standard battleground..."));
        assert!(strategy.contains("- Hazards: None"));
        assert!(strategy.contains("- Special condition: None"));
    }

    #[test]
    fn preview_flattens_and_truncates() {
        assert_eq!(preview("a\nb\nc", 10), "a b c");
        assert_eq!(preview("héllo world", 5), "héllo");
    }
}
