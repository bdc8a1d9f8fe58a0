use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::store::MongoDBConfig;

/// The available store backends. We differentiate them via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[serde(tag = "type")]
pub enum StoreConfig {
    #[serde(rename = "mongo")]
    MongoDB(MongoDBConfig),
    /// Keeps employees in process memory; nothing survives a restart.
    #[serde(rename = "memory")]
    Memory,
}
