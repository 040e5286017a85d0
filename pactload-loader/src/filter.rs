//! Consumer inclusion filter.

use std::collections::HashSet;

use pactload_broker::ConsumerDescriptor;
use pactload_core::{parse_list_expression, ValueResolver};

/// Keep only consumers named by `inclusions`, preserving order.
///
/// Each inclusion is a list expression. No inclusions, or inclusions that
/// expand to nothing, mean no restriction.
pub fn filter_consumers(
    consumers: Vec<ConsumerDescriptor>,
    inclusions: &[String],
    resolver: &dyn ValueResolver,
) -> Vec<ConsumerDescriptor> {
    if inclusions.is_empty() {
        return consumers;
    }
    let included: HashSet<String> = inclusions
        .iter()
        .flat_map(|expr| parse_list_expression(expr, resolver))
        .collect();
    if included.is_empty() {
        return consumers;
    }
    consumers
        .into_iter()
        .filter(|c| included.contains(c.name.as_str()))
        .collect()
}
