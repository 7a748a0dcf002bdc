//! Inline data node expressions.
//!
//! `ds_${0..1}.t_order_${0..1}` expands into the four data nodes
//! `ds_0.t_order_0`, `ds_0.t_order_1`, `ds_1.t_order_0` and `ds_1.t_order_1`.
//! Groups are either inclusive integer ranges (`${0..3}`, zero-padded
//! when the lower bound is, e.g. `${00..15}`) or literal lists
//! (`${['a', 'b']}`). Top-level commas separate independent expressions.

use super::Error;

#[derive(Debug, Clone, PartialEq)]
enum Part {
    Literal(String),
    Choices(Vec<String>),
}

/// Expand an inline expression into every value it describes,
/// in declaration order.
pub fn expand(expression: &str) -> Result<Vec<String>, Error> {
    let mut result = vec![];

    for alternative in split_top_level(expression)? {
        let alternative = alternative.trim();
        if alternative.is_empty() {
            continue;
        }
        let parts = parse(alternative, expression)?;
        result.extend(product(&parts));
    }

    Ok(result)
}

/// Returns true if the string contains at least one `${...}` group.
pub fn is_inline(expression: &str) -> bool {
    expression.contains("${")
}

fn invalid(expression: &str, reason: impl ToString) -> Error {
    Error::InlineExpression {
        expression: expression.to_string(),
        reason: reason.to_string(),
    }
}

fn split_top_level(expression: &str) -> Result<Vec<&str>, Error> {
    let mut result = vec![];
    let mut in_group = false;
    let mut start = 0;
    let mut prev = None;

    for (offset, c) in expression.char_indices() {
        match c {
            '{' if prev == Some('$') => {
                if in_group {
                    return Err(invalid(expression, "nested groups are not supported"));
                }
                in_group = true;
            }
            '}' if in_group => in_group = false,
            ',' if !in_group => {
                result.push(&expression[start..offset]);
                start = offset + 1;
            }
            _ => (),
        }
        prev = Some(c);
    }

    if in_group {
        return Err(invalid(expression, "unterminated group"));
    }

    result.push(&expression[start..]);
    Ok(result)
}

fn parse(alternative: &str, expression: &str) -> Result<Vec<Part>, Error> {
    let mut parts = vec![];
    let mut rest = alternative;

    while let Some(open) = rest.find("${") {
        if open > 0 {
            parts.push(Part::Literal(rest[..open].to_string()));
        }
        let close = rest[open..]
            .find('}')
            .map(|close| close + open)
            .ok_or_else(|| invalid(expression, "unterminated group"))?;
        parts.push(Part::Choices(choices(&rest[open + 2..close], expression)?));
        rest = &rest[close + 1..];
    }

    if !rest.is_empty() {
        parts.push(Part::Literal(rest.to_string()));
    }

    Ok(parts)
}

fn choices(group: &str, expression: &str) -> Result<Vec<String>, Error> {
    let group = group.trim();

    if let Some(list) = group.strip_prefix('[').and_then(|g| g.strip_suffix(']')) {
        let items = list
            .split(',')
            .map(|item| item.trim().trim_matches(|c| c == '\'' || c == '"'))
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect::<Vec<_>>();
        if items.is_empty() {
            return Err(invalid(expression, "empty list"));
        }
        return Ok(items);
    }

    if let Some((start, end)) = group.split_once("..") {
        let (start, end) = (start.trim(), end.trim());
        let lower: i64 = start
            .parse()
            .map_err(|_| invalid(expression, format!("\"{}\" is not an integer", start)))?;
        let upper: i64 = end
            .parse()
            .map_err(|_| invalid(expression, format!("\"{}\" is not an integer", end)))?;
        if lower > upper {
            return Err(invalid(expression, "range lower bound exceeds upper bound"));
        }
        let width = if start.len() > 1 && start.starts_with('0') {
            start.len()
        } else {
            0
        };
        return Ok((lower..=upper)
            .map(|value| format!("{:0width$}", value, width = width))
            .collect());
    }

    if group.is_empty() {
        return Err(invalid(expression, "empty group"));
    }

    Ok(vec![group.to_string()])
}

fn product(parts: &[Part]) -> Vec<String> {
    let mut result = vec![String::new()];

    for part in parts {
        result = match part {
            Part::Literal(literal) => result
                .into_iter()
                .map(|mut prefix| {
                    prefix.push_str(literal);
                    prefix
                })
                .collect(),
            Part::Choices(choices) => result
                .iter()
                .flat_map(|prefix| choices.iter().map(move |choice| format!("{prefix}{choice}")))
                .collect(),
        };
    }

    result
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_expand_range_product() {
        let nodes = expand("ds_${0..1}.t_order_${0..1}").unwrap();
        assert_eq!(
            nodes,
            vec![
                "ds_0.t_order_0",
                "ds_0.t_order_1",
                "ds_1.t_order_0",
                "ds_1.t_order_1"
            ]
        );
    }

    #[test]
    fn test_expand_list_and_alternatives() {
        let nodes = expand("ds_${['a', \"b\"]}.t_user, ds_c.t_user_${2..3}").unwrap();
        assert_eq!(
            nodes,
            vec!["ds_a.t_user", "ds_b.t_user", "ds_c.t_user_2", "ds_c.t_user_3"]
        );
    }

    #[test]
    fn test_expand_zero_padded() {
        let nodes = expand("t_${08..10}").unwrap();
        assert_eq!(nodes, vec!["t_08", "t_09", "t_10"]);
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(expand("ds_0.t_config").unwrap(), vec!["ds_0.t_config"]);
        assert!(!is_inline("ds_0.t_config"));
        assert!(is_inline("ds_${0..1}.t_config"));
    }

    #[test]
    fn test_invalid_expressions() {
        assert!(expand("ds_${0..1.t_order").is_err());
        assert!(expand("ds_${3..1}").is_err());
        assert!(expand("ds_${a..b}").is_err());
        assert!(expand("ds_${[]}").is_err());
        assert!(expand("ds_${${0..1}}").is_err());
    }
}
