use serde::Deserialize;

/// Configuration for the search swarm.
///
/// `max_parallel_branches` is the single tunable of the branching protocol:
/// a step fans out only while `width * (1 + children)` stays within it,
/// otherwise the path degrades to linear continuation inside one message.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwarmConfig {
    /// Subscription the workers pull from
    pub subscription_id: String,
    /// Topic search messages are published to
    pub topic_id: String,
    /// Ceiling on sibling paths carried as separate messages
    pub max_parallel_branches: u32,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            subscription_id: "sudoku-search".to_string(),
            topic_id: "sudoku-search".to_string(),
            max_parallel_branches: 10,
        }
    }
}
