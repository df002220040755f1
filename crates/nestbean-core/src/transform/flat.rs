use std::sync::Arc;

use super::ResultTransformer;
use crate::errors::{NestBeanError, Result};
use crate::model::{Bean, BeanClass, FieldAccessor, Value};

/// Builds one bean from a flat tuple whose aliases carry no dots
///
/// Every alias must name a field of the class or one of its ancestors.
/// Values are written through the class's direct accessors.
#[derive(Debug, Clone)]
pub struct FlatBeanBuilder {
    class: Arc<BeanClass>,
}

impl FlatBeanBuilder {
    pub fn new(class: Arc<BeanClass>) -> Self {
        Self { class }
    }

    pub fn class(&self) -> &Arc<BeanClass> {
        &self.class
    }

    /// Resolve one accessor per alias, in alias order
    ///
    /// # Errors
    /// * `FieldNotFound` - If an alias names an undeclared field
    pub fn resolve<S: AsRef<str>>(&self, aliases: &[S]) -> Result<Vec<FieldAccessor>> {
        aliases
            .iter()
            .map(|alias| self.class.accessor(alias.as_ref()).cloned())
            .collect()
    }

    /// Instantiate a bean and write `tuple[i]` through `writers[i]`
    ///
    /// # Errors
    /// * `ArityMismatch` - If tuple and writers differ in length
    /// * `TypeMismatch` - If a value does not fit its field
    pub fn build_with(&self, writers: &[FieldAccessor], tuple: &[Value]) -> Result<Bean> {
        if writers.len() != tuple.len() {
            return Err(NestBeanError::ArityMismatch {
                tuple_len: tuple.len(),
                alias_len: writers.len(),
            });
        }

        let mut bean = self.class.instantiate();
        for (writer, value) in writers.iter().zip(tuple) {
            writer.set(&mut bean, value.clone())?;
        }
        Ok(bean)
    }
}

impl ResultTransformer for FlatBeanBuilder {
    type Output = Bean;

    /// Values past the last alias are never read.
    ///
    /// # Errors
    /// * `ArityMismatch` - If the tuple has fewer values than aliases
    /// * `FieldNotFound` - If an alias names an undeclared field
    /// * `TypeMismatch` - If a value does not fit its field
    fn transform_tuple<S: AsRef<str>>(&self, tuple: &[Value], aliases: &[S]) -> Result<Bean> {
        if tuple.len() < aliases.len() {
            return Err(NestBeanError::ArityMismatch {
                tuple_len: tuple.len(),
                alias_len: aliases.len(),
            });
        }

        let writers = self.resolve(aliases)?;
        self.build_with(&writers, &tuple[..writers.len()])
    }
}
