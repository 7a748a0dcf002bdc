use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What to do with a sharded table when the statement doesn't carry
/// enough values for its sharding strategy.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum IncompleteConditions {
    /// Send the statement to every data node of the table (default).
    #[default]
    FanOut,
    /// Reject the statement.
    Error,
}

impl fmt::Display for IncompleteConditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            IncompleteConditions::FanOut => "fan_out",
            IncompleteConditions::Error => "error",
        };
        f.write_str(value)
    }
}

impl FromStr for IncompleteConditions {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fan_out" | "fanout" => Ok(IncompleteConditions::FanOut),
            "error" => Ok(IncompleteConditions::Error),
            _ => Err(()),
        }
    }
}

/// General settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct General {
    /// Routing policy for sharded tables without usable sharding values.
    ///
    /// _Default:_ `fan_out`
    #[serde(default)]
    pub incomplete_conditions: IncompleteConditions,

    /// Data source for tables that aren't in the sharding rule. When not set,
    /// statements referencing such tables are rejected.
    #[serde(default)]
    pub default_data_source: Option<String>,
}
