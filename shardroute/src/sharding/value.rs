//! Values a sharding function is applied to.

use std::cmp::Ordering;

use serde::Serialize;
use shardroute_config::FlexibleType;

/// Sharding value of one column, extracted from a predicate
/// or an `INSERT` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShardingValue {
    /// `=` and `IN`. Empty when no value can satisfy the predicates.
    List(Vec<FlexibleType>),
    /// `BETWEEN`, both ends inclusive.
    Range {
        start: FlexibleType,
        end: FlexibleType,
    },
}

impl ShardingValue {
    /// Value for an equality.
    pub fn single(value: impl Into<FlexibleType>) -> Self {
        Self::List(vec![value.into()])
    }

    /// Value for a `BETWEEN`.
    pub fn range(start: impl Into<FlexibleType>, end: impl Into<FlexibleType>) -> Self {
        Self::Range {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Returns true if no value can match.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(values) => values.is_empty(),
            Self::Range { start, end } => compare(start, end) == Some(Ordering::Greater),
        }
    }

    /// Values that satisfy both `self` and `other`, i.e. two predicates
    /// on the same column joined with `AND`.
    ///
    /// Values of different types can't be compared and are kept.
    pub fn intersect(&self, other: &ShardingValue) -> ShardingValue {
        match (self, other) {
            (Self::List(left), Self::List(right)) => Self::List(
                left.iter()
                    .filter(|value| right.contains(value))
                    .cloned()
                    .collect(),
            ),

            (Self::List(values), Self::Range { start, end })
            | (Self::Range { start, end }, Self::List(values)) => Self::List(
                values
                    .iter()
                    .filter(|value| within(value, start, end))
                    .cloned()
                    .collect(),
            ),

            (
                Self::Range { start, end },
                Self::Range {
                    start: other_start,
                    end: other_end,
                },
            ) => {
                let start = match compare(start, other_start) {
                    Some(Ordering::Less) => other_start,
                    _ => start,
                };
                let end = match compare(end, other_end) {
                    Some(Ordering::Greater) => other_end,
                    _ => end,
                };

                if compare(start, end) == Some(Ordering::Greater) {
                    Self::List(vec![])
                } else {
                    Self::Range {
                        start: start.clone(),
                        end: end.clone(),
                    }
                }
            }
        }
    }
}

/// Order two values of the same type.
pub(crate) fn compare(left: &FlexibleType, right: &FlexibleType) -> Option<Ordering> {
    match (left, right) {
        (FlexibleType::Integer(left), FlexibleType::Integer(right)) => Some(left.cmp(right)),
        (FlexibleType::String(left), FlexibleType::String(right)) => Some(left.cmp(right)),
        (FlexibleType::Uuid(left), FlexibleType::Uuid(right)) => Some(left.cmp(right)),
        _ => None,
    }
}

fn within(value: &FlexibleType, start: &FlexibleType, end: &FlexibleType) -> bool {
    let above = compare(value, start).map(|o| o != Ordering::Less);
    let below = compare(value, end).map(|o| o != Ordering::Greater);
    above.unwrap_or(true) && below.unwrap_or(true)
}
