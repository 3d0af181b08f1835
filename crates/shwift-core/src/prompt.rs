//! Tier prompt templates and the pure prompt renderer.

use crate::answers::AnswerRecord;
use crate::tier::Tier;
use std::collections::BTreeSet;

/// Persona sent as the system message alongside every prompt.
pub const SYSTEM_PERSONA: &str = "You are SHWIFT, an AI engine for transformation.";

/// Returned when a record is rendered against a tier it was not collected for.
pub const UNKNOWN_TIER_PROMPT: &str = "You are SHWIFT. The tier is unknown. Return a brief message.";

/// A tier's fixed prompt text with `{key}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub tier: Tier,
    pub body: &'static str,
}

pub const TEMPLATES: [PromptTemplate; 3] = [
    PromptTemplate {
        tier: Tier::Community,
        body: include_str!("templates/community.md"),
    },
    PromptTemplate {
        tier: Tier::Lab,
        body: include_str!("templates/lab.md"),
    },
    PromptTemplate {
        tier: Tier::Pro,
        body: include_str!("templates/pro.md"),
    },
];

pub fn template_for(tier: Tier) -> &'static PromptTemplate {
    // TEMPLATES is declared in Tier::ALL order
    &TEMPLATES[tier as usize]
}

impl PromptTemplate {
    /// Placeholder names referenced by the template body.
    pub fn placeholders(&self) -> BTreeSet<&'static str> {
        let mut names = BTreeSet::new();
        let mut rest = self.body;
        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) if is_placeholder_name(&after[..end]) => {
                    names.insert(&after[..end]);
                    rest = &after[end + 1..];
                }
                _ => rest = after,
            }
        }
        names
    }

    /// Substitute every placeholder in one pass.
    ///
    /// Values are inserted verbatim and never re-scanned, so braces inside an
    /// answer stay literal.
    pub fn render(&self, answers: &AnswerRecord) -> String {
        let body = self.body.trim();
        let mut out = String::with_capacity(body.len() + 256);
        let mut rest = body;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) if is_placeholder_name(&after[..end]) => {
                    let name = &after[..end];
                    match answers.get(name) {
                        Some(value) => out.push_str(&value.to_string()),
                        None => {
                            tracing::warn!(placeholder = name, tier = %self.tier, "No answer for placeholder");
                            out.push_str(&rest[start..start + end + 2]);
                        }
                    }
                    rest = &after[end + 1..];
                }
                _ => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

fn is_placeholder_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Render the prompt for `tier` from a collected record.
///
/// Pure and deterministic. A record collected under a different tier cannot
/// be rendered, and yields [`UNKNOWN_TIER_PROMPT`] instead of an error.
pub fn build_prompt(tier: Tier, answers: &AnswerRecord) -> String {
    if answers.tier() != tier {
        tracing::warn!(
            requested = %tier,
            collected = %answers.tier(),
            "Answer record does not belong to the requested tier"
        );
        return UNKNOWN_TIER_PROMPT.to_string();
    }
    template_for(tier).render(answers)
}
