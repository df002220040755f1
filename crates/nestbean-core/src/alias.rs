//! Alias partitioning
//!
//! Splits a flat alias array into root aliases (no dot) and nested groups
//! keyed by the first dotted segment. Each parsed alias remembers where its
//! value sits in the incoming tuple (`original_index`) and where it goes in
//! the sub-tuple handed to its owner (`local_index`). Local indices follow
//! first-encounter order in the incoming alias array.

use indexmap::IndexMap;

use crate::errors::{NestBeanError, Result};
use crate::model::Value;

/// Separator between nested path segments
pub const PATH_SEPARATOR: char = '.';

/// One alias after its group prefix has been stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAlias {
    pub name: String,
    pub local_index: usize,
    pub original_index: usize,
}

/// Result of partitioning one alias array
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasPartition {
    /// Aliases targeting fields of the root class
    pub root: Vec<ParsedAlias>,
    /// Nested groups keyed by root field name, in first-encounter order
    pub groups: IndexMap<String, Vec<ParsedAlias>>,
}

impl AliasPartition {
    pub fn is_root_only(&self) -> bool {
        self.groups.is_empty()
    }

    /// Smallest tuple length every parsed alias fits into
    pub fn width(&self) -> usize {
        self.root
            .iter()
            .chain(self.groups.values().flatten())
            .map(|alias| alias.original_index + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Partition aliases into root aliases and nested groups
pub fn partition<S: AsRef<str>>(aliases: &[S]) -> AliasPartition {
    let mut partition = AliasPartition::default();

    for (original_index, alias) in aliases.iter().enumerate() {
        let alias = alias.as_ref();

        let Some((head, tail)) = alias.split_once(PATH_SEPARATOR) else {
            let local_index = partition.root.len();
            partition.root.push(ParsedAlias {
                name: alias.to_string(),
                local_index,
                original_index,
            });
            continue;
        };

        let group = partition.groups.entry(head.to_string()).or_default();
        let local_index = group.len();
        group.push(ParsedAlias {
            name: tail.to_string(),
            local_index,
            original_index,
        });
    }

    partition
}

/// Names of parsed aliases laid out by local index
pub fn sub_aliases(aliases: &[ParsedAlias]) -> Vec<String> {
    let mut names = vec![String::new(); aliases.len()];
    for alias in aliases {
        if let Some(slot) = names.get_mut(alias.local_index) {
            *slot = alias.name.clone();
        }
    }
    names
}

/// Build the sub-tuple for a set of parsed aliases
///
/// # Errors
/// * `TupleIndexOutOfRange` - If an original index points past the tuple
pub fn sub_tuple(aliases: &[ParsedAlias], tuple: &[Value]) -> Result<Vec<Value>> {
    let mut values = vec![Value::Null; aliases.len()];
    for alias in aliases {
        let value = tuple
            .get(alias.original_index)
            .ok_or(NestBeanError::TupleIndexOutOfRange {
                index: alias.original_index,
                len: tuple.len(),
            })?;
        if let Some(slot) = values.get_mut(alias.local_index) {
            *slot = value.clone();
        }
    }
    Ok(values)
}
