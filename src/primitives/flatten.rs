//! Order-preserving flattening of nested binding lists.

use std::slice;

use super::types::BindingValue;

/// Flatten arbitrarily nested lists into a new list, left to right.
///
/// Walks with an explicit stack of iterators, so nesting depth is bounded by
/// memory rather than the call stack. The input is only borrowed.
pub fn flatten(values: &[BindingValue]) -> Vec<BindingValue> {
    let mut out = Vec::with_capacity(values.len());
    let mut stack: Vec<slice::Iter<'_, BindingValue>> = vec![values.iter()];

    while let Some(iter) = stack.last_mut() {
        match iter.next() {
            Some(BindingValue::List(items)) => stack.push(items.iter()),
            Some(value) => out.push(value.clone()),
            None => {
                stack.pop();
            }
        }
    }

    out
}
