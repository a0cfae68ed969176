//! Compiled-in line set for the Sheldon rover character
//!
//! Used whenever no artifact file is configured. Some clips are stored in
//! `.mov` containers; the paths are kept exactly as recorded.

use std::collections::HashMap;

use serde_json::Value;

use crate::artifact::LineArtifact;
use crate::model::{AudioEntry, LineId};

/// (id, asset path, caption)
const LINES: &[(u32, &str, &str)] = &[
    (322, "assets/audio/collision_2_2.mov", "This is malarkey!"),
    (
        421,
        "assets/audio/stuck_2_1.mp3",
        "I am overwhelmed! Overwhelmed, overworked, and showing too much mercy!",
    ),
    (920, "assets/audio/saw_human_2_0.mp3", "You're doomed!"),
    (
        950,
        "assets/audio/random_0_0.mp3",
        "Have you suffered a recent blow to the head?",
    ),
    (
        960,
        "assets/audio/random_1_0.mov",
        "What sort of background do you have in science?",
    ),
    (970, "assets/audio/random_2_0.mp3", "Bazinga!"),
    (
        971,
        "assets/audio/random_2_1.mov",
        "Oh, you want me to share credit? Get out.",
    ),
];

const GROUPS: &[(&str, &[u32])] = &[
    ("COLLISION", &[322]),
    ("STUCK", &[421]),
    ("SAW_HUMAN", &[920]),
    ("RANDOM", &[950, 960, 970, 971]),
];

/// Entry and group maps of the compiled-in line set
pub(crate) fn parts() -> (HashMap<LineId, AudioEntry>, HashMap<String, Vec<LineId>>) {
    let entries: HashMap<LineId, AudioEntry> = LINES
        .iter()
        .filter_map(|(id, file, text)| {
            LineId::new(*id).map(|id| (id, AudioEntry::new(*file, *text)))
        })
        .collect();

    let groups: HashMap<String, Vec<LineId>> = GROUPS
        .iter()
        .map(|(name, ids)| {
            (
                name.to_string(),
                ids.iter().copied().filter_map(LineId::new).collect(),
            )
        })
        .collect();

    (entries, groups)
}

/// The compiled-in line set in serialized form, in declaration order
pub fn builtin_artifact() -> LineArtifact {
    LineArtifact {
        lines: LINES
            .iter()
            .map(|(id, file, text)| (id.to_string(), AudioEntry::new(*file, *text)))
            .collect(),
        groups: GROUPS
            .iter()
            .map(|(name, ids)| (name.to_string(), ids.iter().copied().map(Value::from).collect()))
            .collect(),
    }
}
