use thiserror::Error;

use crate::wormhole::WormholeId;

/// Convenient result alias for the Wormway library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a request or link references a location outside the loaded set.
    #[error("unknown location: {name}{}", format_suggestions(.suggestions))]
    InvalidLocation {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when the same location name appears twice in a graph load.
    #[error("duplicate location encountered: {name}")]
    DuplicateLocation { name: String },

    /// Raised when a static link is dangling or malformed.
    #[error("invalid link {from} -> {to}: {reason}")]
    InvalidLink {
        from: String,
        to: String,
        reason: String,
    },

    /// Raised when a wormhole report fails validation.
    #[error("invalid wormhole: {message}")]
    InvalidWormhole { message: String },

    /// Raised when removing or looking up a wormhole id that is not registered.
    #[error("unknown wormhole id: {id}")]
    UnknownWormhole { id: WormholeId },

    /// Raised when no route could be found between two locations.
    #[error("no route found between {start} and {goal}")]
    NoRoute { start: String, goal: String },

    /// Raised when a computed route plan lacks any candidates.
    #[error("route plan was empty")]
    EmptyRoutePlan,

    /// Raised when a fleet manifest names a vehicle type missing from the mass table.
    #[error("unknown vehicle type: {name}{}", format_suggestions(.suggestions))]
    UnknownVehicle {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when fleet masses or counts are unusable.
    #[error("invalid fleet: {message}")]
    InvalidFleet { message: String },

    /// Raised when mass table data fails validation.
    #[error("invalid mass table: {message}")]
    MassTableValidation { message: String },

    /// Raised when duplicate vehicle names are encountered during mass table load.
    #[error("duplicate vehicle type encountered: {name}")]
    DuplicateVehicle { name: String },

    /// Raised when injected tuning constants are out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// Rank `candidates` by similarity to `query` and return up to `limit` close matches.
///
/// Shared by location and vehicle lookups so both report the same style of hint.
pub(crate) fn suggest<'a, I>(query: &str, candidates: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    const MIN_SIMILARITY: f64 = 0.75;

    let needle = query.to_lowercase();
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|candidate| {
            (
                strsim::jaro_winkler(&needle, &candidate.to_lowercase()),
                candidate,
            )
        })
        .filter(|(score, _)| *score >= MIN_SIMILARITY)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.to_string())
        .collect()
}
