use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Audience segment a diagnostic session runs under.
///
/// The tier selects both the question set and the prompt template, and is
/// fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Community,
    Lab,
    Pro,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown tier code: {0}")]
pub struct UnknownTier(pub String);

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Community, Tier::Lab, Tier::Pro];

    pub fn code(self) -> &'static str {
        match self {
            Tier::Community => "community",
            Tier::Lab => "lab",
            Tier::Pro => "pro",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Community => "SHWIFT Community – Personal growth",
            Tier::Lab => "SHWIFT Lab – Founders & builders",
            Tier::Pro => "SHWIFT Pro – Organisations",
        }
    }

    /// One-line description of who the tier is meant for.
    pub fn explanation(self) -> &'static str {
        match self {
            Tier::Community => {
                "You're entering via SHWIFT Community — a space for individuals in transition \
                 who want clarity, momentum, and gentle but focused guidance."
            }
            Tier::Lab => {
                "You're entering via SHWIFT Lab — designed for founders and builders who are \
                 shaping products, ventures, or ideas and want sharper execution, narrative \
                 clarity, and better learning loops."
            }
            Tier::Pro => {
                "You're entering via SHWIFT Pro — focused on organisations: strategy clarity, \
                 leadership alignment, operating model health, and transformation readiness."
            }
        }
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Community
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "community" => Ok(Tier::Community),
            "lab" => Ok(Tier::Lab),
            "pro" => Ok(Tier::Pro),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}

/// Resolve the tier for a session.
///
/// The URL parameter only seeds the default selection; a recognised user
/// choice always wins. Anything unrecognised falls back silently, so this
/// never fails.
pub fn resolve_tier(url_param: Option<&str>, user_choice: Option<&str>) -> Tier {
    let default = url_param
        .and_then(|code| code.parse::<Tier>().ok())
        .unwrap_or_default();

    let tier = user_choice
        .and_then(|choice| choice.parse::<Tier>().ok())
        .unwrap_or(default);

    tracing::debug!(tier = %tier, "{}", tier.explanation());
    tier
}
