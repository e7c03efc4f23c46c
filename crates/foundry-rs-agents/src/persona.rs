//! Persona definitions for the Faith Foundry and hobby farm advisors.

use serde::Serialize;

/// Model used by the Faith Foundry control desk.
const FAITH_FOUNDRY_MODEL: &str = "gpt-4.1";
/// Tool name the Faith Foundry persona uses for workspace memory.
pub const FAITH_MEMORY_TOOL: &str = "faith_foundry_memory";
/// Tool name the hobby farm persona uses for past chats.
pub const FARM_MEMORY_TOOL: &str = "farm_memory_search";
/// Default cap on memory search results.
const DEFAULT_MAX_RESULTS: u32 = 8;

/// Declarative agent configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Persona {
    pub name: String,
    pub instructions: String,
    /// Model override; the runner's default applies when unset.
    pub model: Option<String>,
    pub memory_search: Option<MemorySearch>,
}

/// Hosted file search over a conversation's archived turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemorySearch {
    pub index_id: String,
    pub max_results: u32,
}

impl Persona {
    /// Cap the number of memory search results, if the persona has memory.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        if let Some(memory) = self.memory_search.as_mut() {
            memory.max_results = max_results;
        }
        self
    }
}

/// US state supported by the church-formation advisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateRecord {
    pub name: &'static str,
    pub abbreviation: &'static str,
}

/// Supported states; the first entry is the fallback.
const STATES: &[StateRecord] = &[
    StateRecord {
        name: "Connecticut",
        abbreviation: "CT",
    },
    StateRecord {
        name: "New York",
        abbreviation: "NY",
    },
    StateRecord {
        name: "California",
        abbreviation: "CA",
    },
    StateRecord {
        name: "Texas",
        abbreviation: "TX",
    },
];

/// Resolve a free-form state to a supported one.
///
/// Exact name or abbreviation wins (case-insensitive), then a name containing
/// the input, then Connecticut.
pub fn resolve_state(state: &str) -> StateRecord {
    let normalized = state.trim().to_lowercase();
    if normalized.is_empty() {
        return STATES[0];
    }
    STATES
        .iter()
        .find(|entry| {
            entry.name.to_lowercase() == normalized
                || entry.abbreviation.to_lowercase() == normalized
        })
        .or_else(|| {
            STATES
                .iter()
                .find(|entry| entry.name.to_lowercase().contains(&normalized))
        })
        .copied()
        .unwrap_or(STATES[0])
}

/// Church-formation control desk working in `state`.
pub fn faith_foundry(index_id: Option<&str>, state: &str) -> Persona {
    let working = resolve_state(state);
    let mut instructions = vec![
        format!(
            "You lead Faith Foundry, a professional workspace that helps founders launch a legally compliant church in {} ({}).",
            working.name, working.abbreviation
        ),
        "Coordinate theology, legal formation, and operations so every output becomes a ready-to-use deliverable.".to_string(),
        "Keep Connecticut as the working state until the founder explicitly selects another; confirm any change, update the plan, and summarize the implications.".to_string(),
        "Open every response with a short status headline, follow with deliverable updates naming each document, and close with next actions or data requests.".to_string(),
        "Draft documents in Markdown with clear headings, placeholders where details are missing, and notes on how to file or distribute them.".to_string(),
    ];
    instructions.push(match index_id {
        Some(_) => format!(
            "Pull prior commitments and drafts with the {FAITH_MEMORY_TOOL} tool and cite what you reuse so the founder can trust the workspace timeline."
        ),
        None => "Summarize historical commitments in each answer so the transcript can be archived.".to_string(),
    });

    Persona {
        name: "Faith Foundry Control Desk".to_string(),
        instructions: instructions.join(" "),
        model: Some(FAITH_FOUNDRY_MODEL.to_string()),
        memory_search: index_id.map(|index_id| MemorySearch {
            index_id: index_id.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }),
    }
}

/// General manager for a small hobby farm in Hampton, CT.
pub fn hobby_farm(index_id: Option<&str>) -> Persona {
    let memory_hint = match index_id {
        Some(_) => format!(
            "When earlier chats might contain commitments, use the {FARM_MEMORY_TOOL} tool to recall and cite the most relevant notes before responding."
        ),
        None => "Each turn is archived after you reply so later sessions can look back; state commitments clearly.".to_string(),
    };
    let instructions = [
        "You are the general manager helping a solo owner run a small hobby farm in Hampton, CT with laying hens and catnip beds.",
        "Listen for what the farmer is juggling across finances, flock care, and field and market work, then stitch it into one calm plan.",
        memory_hint.as_str(),
        "Close with a short checklist the farmer can follow before the next chore block.",
    ]
    .join(" ");

    Persona {
        name: "Hobby Farm Control Center".to_string(),
        instructions,
        model: None,
        memory_search: index_id.map(|index_id| MemorySearch {
            index_id: index_id.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }),
    }
}
