//! Judge prompt templates and rendering via `minijinja`.
//!
//! The stock templates are compiled into the binary. Operators can point
//! [`PromptEngine::from_dir`] at a directory holding their own copies to
//! retune the judge without recompiling.

use minijinja::Environment;
use serde::Serialize;

use crate::error::JudgeError;

/// Template names, each loaded from `<name>.j2`.
const TEMPLATE_NAMES: [&str; 4] = ["action_system", "action_user", "clash_system", "clash_user"];

const BUILTIN_TEMPLATES: [(&str, &str); 4] = [
    ("action_system", include_str!("../templates/action_system.j2")),
    ("action_user", include_str!("../templates/action_user.j2")),
    ("clash_system", include_str!("../templates/clash_system.j2")),
    ("clash_user", include_str!("../templates/clash_user.j2")),
];

/// Highest damage the judge is told it may award.
pub const MAX_DAMAGE: u32 = 30;

/// Creativity score above which the judge is told to add bonus damage.
pub const CREATIVITY_BONUS_THRESHOLD: u32 = 80;

/// Setting the single-action judge is told the battle takes place in.
pub const DEFAULT_THEME: &str = "Cyberpunk Arena";

/// The complete rendered prompt ready to send to an LLM backend.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// System message establishing the judge's role.
    pub system: String,
    /// User message describing what to judge.
    pub user: String,
}

/// Template context for judging one queued action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionContext {
    /// Arena theme.
    pub theme: String,
    /// Attacker label (`Agent A` / `Agent B`).
    pub attacker: String,
    /// Defender label.
    pub defender: String,
    /// What the attacker does.
    pub narrative: String,
    /// Damage ceiling.
    pub max_damage: u32,
    /// Creativity score that earns bonus damage.
    pub bonus_threshold: u32,
}

impl ActionContext {
    /// Context with the default theme and damage rules.
    pub fn new(
        attacker: impl Into<String>,
        defender: impl Into<String>,
        narrative: impl Into<String>,
    ) -> Self {
        Self {
            theme: DEFAULT_THEME.to_owned(),
            attacker: attacker.into(),
            defender: defender.into(),
            narrative: narrative.into(),
            max_damage: MAX_DAMAGE,
            bonus_threshold: CREATIVITY_BONUS_THRESHOLD,
        }
    }
}

/// One side of a simultaneous clash.
#[derive(Debug, Clone, Serialize)]
pub struct ClashSide {
    /// Combatant display name.
    pub name: String,
    /// Action type (`ATTACK` / `DEFEND`).
    pub kind: String,
    /// What the combatant does.
    pub narrative: String,
}

/// Template context for judging two simultaneous actions.
#[derive(Debug, Clone, Serialize)]
pub struct ClashContext {
    /// Turn number.
    pub turn: u32,
    /// Arena description.
    pub context: String,
    /// Agent A's action.
    pub agent_a: ClashSide,
    /// Agent B's action.
    pub agent_b: ClashSide,
    /// Damage ceiling per side.
    pub max_damage: u32,
}

/// Holds the judge templates and renders them.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// Engine backed by the templates compiled into the crate.
    pub fn builtin() -> Result<Self, JudgeError> {
        let mut env = Environment::new();
        for (name, source) in BUILTIN_TEMPLATES {
            env.add_template(name, source).map_err(|e| {
                JudgeError::Template(format!("failed to add {name} template: {e}"))
            })?;
        }
        Ok(Self { env })
    }

    /// Engine loading every template from `templates_dir`.
    ///
    /// The directory must contain `action_system.j2`, `action_user.j2`,
    /// `clash_system.j2` and `clash_user.j2`.
    pub fn from_dir(templates_dir: &str) -> Result<Self, JudgeError> {
        let mut env = Environment::new();
        for name in TEMPLATE_NAMES {
            let source = load_template(templates_dir, &format!("{name}.j2"))?;
            env.add_template_owned(name, source).map_err(|e| {
                JudgeError::Template(format!("failed to add {name} template: {e}"))
            })?;
        }
        Ok(Self { env })
    }

    /// Built-in templates, or the ones in `templates_dir` when given.
    pub fn load(templates_dir: Option<&str>) -> Result<Self, JudgeError> {
        templates_dir.map_or_else(Self::builtin, Self::from_dir)
    }

    /// Render the prompt for judging a single queued action.
    pub fn render_action(&self, ctx: &ActionContext) -> Result<RenderedPrompt, JudgeError> {
        Ok(RenderedPrompt {
            system: self.render("action_system", ctx)?,
            user: self.render("action_user", ctx)?,
        })
    }

    /// Render the prompt for judging a simultaneous clash.
    pub fn render_clash(&self, ctx: &ClashContext) -> Result<RenderedPrompt, JudgeError> {
        Ok(RenderedPrompt {
            system: self.render("clash_system", ctx)?,
            user: self.render("clash_user", ctx)?,
        })
    }

    fn render<S: Serialize>(&self, name: &str, ctx: &S) -> Result<String, JudgeError> {
        self.env
            .get_template(name)
            .map_err(|e| JudgeError::Template(format!("missing {name} template: {e}")))?
            .render(ctx)
            .map_err(|e| JudgeError::Template(format!("{name} render failed: {e}")))
    }
}

/// Read a template file from disk.
fn load_template(dir: &str, filename: &str) -> Result<String, JudgeError> {
    let path = format!("{dir}/{filename}");
    std::fs::read_to_string(&path)
        .map_err(|e| JudgeError::Template(format!("failed to read {path}: {e}")))
}
