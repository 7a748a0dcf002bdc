//! Joining independently routed groups.

use tracing::debug;

use super::{Error, RoutingUnit};

/// Cartesian product of the groups' units, keeping only combinations
/// on a single data source.
pub fn combine(groups: Vec<Vec<RoutingUnit>>, tables: &[&str]) -> Result<Vec<RoutingUnit>, Error> {
    let mut groups = groups.into_iter();
    let Some(mut result) = groups.next() else {
        return Ok(vec![]);
    };

    for group in groups {
        let mut combined = vec![];
        for left in &result {
            for right in group
                .iter()
                .filter(|right| right.data_source() == left.data_source())
            {
                combined.push(left.clone().merge(right));
            }
        }
        result = combined;
    }

    if result.is_empty() {
        return Err(Error::CrossDataSourceJoin(
            tables.iter().map(|t| t.to_string()).collect(),
        ));
    }

    debug!("{} routing units after combining", result.len());

    Ok(result)
}
