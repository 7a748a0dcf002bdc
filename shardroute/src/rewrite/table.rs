//! Tokens for table names.

use super::TableToken;
use crate::parser::Statement;
use crate::rule::ShardingRule;

/// One token per occurrence of a sharded table. Broadcast and default
/// tables keep their names and need none.
pub fn generate(rule: &ShardingRule, statement: &Statement) -> Vec<TableToken> {
    statement
        .table_segments()
        .iter()
        .filter(|segment| rule.table_rule(&segment.name).is_some())
        .map(|segment| TableToken::new(segment.start, segment.stop, &segment.name))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test::{rule, select};

    #[test]
    fn test_sharded_tables_only() {
        let statement = select(
            "SELECT * FROM t_order o JOIN t_config c ON o.status = c.status",
            &["t_order o", "t_config c"],
            None,
        );
        let tokens = generate(&rule(), &statement);
        assert_eq!(tokens, vec![TableToken::new(14, 21, "t_order")]);
    }
}
