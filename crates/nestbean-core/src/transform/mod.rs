//! Tuple-to-bean transformers
//!
//! - `flat` → one bean from dot-free aliases (the generic flat builder)
//! - `nested` → recursive transformer for dotted aliases

pub mod flat;
pub mod nested;

pub use flat::FlatBeanBuilder;
pub use nested::NestedBeanTransformer;

use crate::errors::Result;
use crate::model::Value;

/// Converts one result row into one output value
///
/// Hosts drive a transformer once per row, then hand the collected results
/// to `transform_list` for any whole-list post-processing.
pub trait ResultTransformer {
    type Output;

    /// Transform one tuple and its parallel alias array
    ///
    /// # Errors
    /// Implementation specific; see each transformer.
    fn transform_tuple<S: AsRef<str>>(&self, tuple: &[Value], aliases: &[S])
        -> Result<Self::Output>;

    /// Post-process the collected results
    fn transform_list(&self, results: Vec<Self::Output>) -> Vec<Self::Output> {
        results
    }

    /// Whether the transformed value is itself one of the tuple elements
    fn is_transformed_value_a_tuple_element<S: AsRef<str>>(
        &self,
        _aliases: &[S],
        _tuple_len: usize,
    ) -> bool {
        false
    }

    /// Which tuple positions take part in the transform
    fn include_in_transform<S: AsRef<str>>(&self, _aliases: &[S], tuple_len: usize) -> Vec<bool> {
        vec![true; tuple_len]
    }
}
