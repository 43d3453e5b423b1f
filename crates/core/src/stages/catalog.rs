//! Built-in destination catalog and interest matching.

use tp_protocol::trip_models::DestinationSuggestion;

struct Destination {
    name: &'static str,
    tags: &'static [&'static str],
}

const CATALOG: &[Destination] = &[
    Destination {
        name: "Orlando",
        tags: &["theme parks", "water parks", "shows", "family resorts"],
    },
    Destination {
        name: "San Diego",
        tags: &["beaches", "zoos", "aquariums", "parks"],
    },
    Destination {
        name: "Washington DC",
        tags: &["museums", "history", "monuments", "parks"],
    },
    Destination {
        name: "Denver",
        tags: &["hiking", "mountains", "museums", "outdoors"],
    },
    Destination {
        name: "Honolulu",
        tags: &["beaches", "snorkeling", "hiking", "culture"],
    },
    Destination {
        name: "Chicago",
        tags: &["museums", "architecture", "food", "aquariums"],
    },
    Destination {
        name: "Yellowstone",
        tags: &["wildlife", "hiking", "camping", "outdoors"],
    },
    Destination {
        name: "New York",
        tags: &["museums", "shows", "food", "parks"],
    },
];

/// Loose interest match: the interest (singularised) appears in the text,
/// or the text appears in the interest.
pub(crate) fn matches_interest(text: &str, interest: &str) -> bool {
    let text = text.trim().to_lowercase();
    let interest = interest.trim().to_lowercase();
    if text.is_empty() || interest.is_empty() {
        return false;
    }
    let stem = interest.trim_end_matches('s');
    text.contains(stem) || interest.contains(text.trim_end_matches('s'))
}

/// Number of interests matched by any of the given texts.
pub(crate) fn interest_score(texts: &[&str], interests: &[String]) -> u32 {
    let matched = interests
        .iter()
        .filter(|interest| texts.iter().any(|text| matches_interest(text, interest)))
        .count();
    u32::try_from(matched).unwrap_or(u32::MAX)
}

/// Rank catalog destinations by interest overlap.
///
/// A requested destination always comes first, whether or not it is in the
/// catalog. Ties keep catalog order.
pub fn suggest(
    interests: &[String],
    requested: Option<&str>,
    limit: usize,
) -> Vec<DestinationSuggestion> {
    let mut ranked: Vec<DestinationSuggestion> = CATALOG
        .iter()
        .map(|destination| {
            let reasons: Vec<String> = interests
                .iter()
                .filter(|interest| {
                    destination
                        .tags
                        .iter()
                        .any(|tag| matches_interest(tag, interest))
                })
                .map(|interest| format!("Great for {}", interest.trim().to_lowercase()))
                .collect();
            DestinationSuggestion {
                name: destination.name.to_string(),
                score: u32::try_from(reasons.len()).unwrap_or(u32::MAX),
                reasons,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    if let Some(requested) = requested.map(str::trim).filter(|r| !r.is_empty()) {
        let existing = ranked
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(requested));
        let mut chosen = match existing {
            Some(index) => ranked.remove(index),
            None => DestinationSuggestion {
                name: requested.to_string(),
                score: 0,
                reasons: Vec::new(),
            },
        };
        chosen.reasons.insert(0, "Requested destination".to_string());
        ranked.insert(0, chosen);
    }

    ranked.truncate(limit.max(1));
    ranked
}
