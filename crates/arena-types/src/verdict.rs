//! Judge results parsed out of LLM output.
//!
//! The judge is asked for a fixed JSON shape but nothing guarantees it
//! complies, so every field has a default and numeric fields accept
//! integers, floats, and numeric strings. Negative numbers clamp to zero.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Damage applied when the judge omits the `damage` field.
pub const DEFAULT_DAMAGE: u32 = 10;

/// Outcome text used when the judge omits the `description` field.
pub const DEFAULT_DESCRIPTION: &str = "The attack lands!";

/// Judgment of a single queued action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Hit points taken from the defender.
    #[serde(
        default = "default_damage",
        deserialize_with = "damage_or_default"
    )]
    pub damage: u32,
    /// One-sentence outcome for the battle log.
    #[serde(
        default = "default_description",
        deserialize_with = "description_or_default"
    )]
    pub description: String,
}

impl Default for Verdict {
    fn default() -> Self {
        Self {
            damage: DEFAULT_DAMAGE,
            description: default_description(),
        }
    }
}

/// Style scores the judge gives one side of a clash (each 0-100).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionScore {
    /// How original the description is.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub creativity: u32,
    /// How much sense it makes in context.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub plausibility: u32,
    /// Quality of the prose.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub style: u32,
}

/// Judgment of two simultaneous actions in the standalone simulator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClashVerdict {
    /// Scores for agent A's action.
    #[serde(default)]
    pub agent_a_score: ActionScore,
    /// Scores for agent B's action.
    #[serde(default)]
    pub agent_b_score: ActionScore,
    /// Hit points taken from agent A.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub damage_to_a: u32,
    /// Hit points taken from agent B.
    #[serde(default, deserialize_with = "number_or_zero")]
    pub damage_to_b: u32,
    /// One-sentence summary of the clash.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub summary: String,
}

const fn default_damage() -> u32 {
    DEFAULT_DAMAGE
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_owned()
}

/// Interpret a JSON value as a non-negative whole number.
///
/// Returns `None` for null, booleans, objects, arrays, and strings that do
/// not parse as a number.
pub fn lenient_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
            .or_else(|| n.as_i64().map(|_| 0))
            .or_else(|| n.as_f64().map(clamp_float)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .map(|v| u32::try_from(v.max(0)).unwrap_or(u32::MAX))
                .or_else(|| trimmed.parse::<f64>().ok().map(clamp_float))
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_float(v: f64) -> u32 {
    if v.is_nan() || v <= 0.0 {
        0
    } else if v >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        v as u32
    }
}

fn damage_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_u32(&value).unwrap_or(DEFAULT_DAMAGE))
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(lenient_u32(&value).unwrap_or(0))
}

fn description_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text(value).unwrap_or_else(default_description))
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text(value).unwrap_or_default())
}

fn text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn verdict_missing_fields_take_defaults() {
        let v: Verdict = serde_json::from_str("{}").unwrap();
        assert_eq!(v.damage, 10);
        assert_eq!(v.description, "The attack lands!");
    }

    #[test]
    fn verdict_accepts_float_and_string_damage() {
        let v: Verdict = serde_json::from_str(r#"{"damage": 17.9, "description": "ok"}"#).unwrap();
        assert_eq!(v.damage, 17);

        let v: Verdict = serde_json::from_str(r#"{"damage": " 22 "}"#).unwrap();
        assert_eq!(v.damage, 22);
    }

    #[test]
    fn negative_damage_clamps_to_zero() {
        let v: Verdict = serde_json::from_str(r#"{"damage": -5}"#).unwrap();
        assert_eq!(v.damage, 0);

        let v: Verdict = serde_json::from_str(r#"{"damage": "-3"}"#).unwrap();
        assert_eq!(v.damage, 0);
    }

    #[test]
    fn null_fields_fall_back() {
        let v: Verdict =
            serde_json::from_str(r#"{"damage": null, "description": null}"#).unwrap();
        assert_eq!(v, Verdict::default());
    }

    #[test]
    fn clash_verdict_full_shape() {
        let v: ClashVerdict = serde_json::from_value(serde_json::json!({
            "agent_a_score": {"creativity": 80, "plausibility": 70, "style": 90},
            "agent_b_score": {"creativity": 60, "plausibility": 65.5, "style": 50},
            "damage_to_a": 12,
            "damage_to_b": 25,
            "summary": "Sparks fly."
        }))
        .unwrap();
        assert_eq!(v.agent_a_score.style, 90);
        assert_eq!(v.agent_b_score.plausibility, 65);
        assert_eq!(v.damage_to_a, 12);
        assert_eq!(v.damage_to_b, 25);
        assert_eq!(v.summary, "Sparks fly.");
    }

    #[test]
    fn clash_verdict_missing_fields_are_zero() {
        let v: ClashVerdict = serde_json::from_str(r#"{"summary": "Nothing happens."}"#).unwrap();
        assert_eq!(v.damage_to_a, 0);
        assert_eq!(v.damage_to_b, 0);
        assert_eq!(v.agent_a_score, ActionScore::default());
    }

    #[test]
    fn lenient_rejects_non_numbers() {
        assert_eq!(lenient_u32(&Value::Bool(true)), None);
        assert_eq!(lenient_u32(&Value::String("lots".to_owned())), None);
        assert_eq!(lenient_u32(&serde_json::json!([1])), None);
    }
}
