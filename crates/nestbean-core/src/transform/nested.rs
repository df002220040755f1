//! Recursive tuple-to-bean transformer
//!
//! A `NestedBeanTransformer` is bound to one class and starts out
//! uninitialized. The first call partitions the alias array, resolves every
//! root field and nested group against the class, and builds one child
//! transformer per group (recursively, so the whole alias tree is resolved up
//! front). The resulting plan is installed once and reused for every later
//! call, whatever aliases those calls pass.
//!
//! Initialization runs under a one-time guard: concurrent first callers block
//! until one of them finishes, and a failed initialization installs nothing,
//! so the next call starts over.

use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::OnceCell;

use super::{FlatBeanBuilder, ResultTransformer};
use crate::alias::{self, ParsedAlias};
use crate::errors::{NestBeanError, Result};
use crate::model::{Bean, BeanClass, FieldAccessor, Value};
use crate::{log_op_end, log_op_error, log_op_start};

/// Transformer from flat tuples with dotted aliases to nested beans
#[derive(Debug)]
pub struct NestedBeanTransformer {
    class: Arc<BeanClass>,
    plan: OnceCell<TransformPlan>,
}

#[derive(Debug)]
struct TransformPlan {
    root_aliases: Vec<ParsedAlias>,
    root_writers: Vec<FieldAccessor>,
    root_builder: FlatBeanBuilder,
    groups: Vec<NestedGroup>,
}

#[derive(Debug)]
struct NestedGroup {
    field: String,
    writer: FieldAccessor,
    aliases: Vec<ParsedAlias>,
    sub_aliases: Vec<String>,
    transformer: NestedBeanTransformer,
}

impl NestedBeanTransformer {
    /// Create a transformer, rejecting a missing class up front
    ///
    /// # Errors
    /// * `InvalidArgument` - If `bean_class` is `None`
    pub fn of(bean_class: Option<Arc<BeanClass>>) -> Result<Self> {
        bean_class
            .map(Self::new)
            .ok_or_else(|| NestBeanError::InvalidArgument {
                parameter: "beanClass".to_string(),
            })
    }

    pub fn new(class: Arc<BeanClass>) -> Self {
        Self {
            class,
            plan: OnceCell::new(),
        }
    }

    fn with_plan(class: Arc<BeanClass>, plan: TransformPlan) -> Self {
        Self {
            class,
            plan: OnceCell::with_value(plan),
        }
    }

    pub fn class(&self) -> &Arc<BeanClass> {
        &self.class
    }

    pub fn is_initialized(&self) -> bool {
        self.plan.get().is_some()
    }

    /// Root field names of the cached nested groups (empty before first use)
    pub fn nested_fields(&self) -> Vec<&str> {
        self.plan
            .get()
            .map(|plan| plan.groups.iter().map(|g| g.field.as_str()).collect())
            .unwrap_or_default()
    }

    /// Transform every row with the same alias layout, stopping at the first error
    ///
    /// # Errors
    /// Any error from [`ResultTransformer::transform_tuple`]
    pub fn transform_rows<I, R, S>(&self, rows: I, aliases: &[S]) -> Result<Vec<Bean>>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[Value]>,
        S: AsRef<str>,
    {
        log_op_start!("transform_rows", class = self.class.name());
        let start = Instant::now();

        let beans = rows
            .into_iter()
            .map(|row| self.transform_tuple(row.as_ref(), aliases))
            .collect::<Result<Vec<_>>>()
            .map_err(|e| {
                log_op_error!(
                    "transform_rows",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    class = self.class.name()
                );
                e
            })?;
        let beans = self.transform_list(beans);

        log_op_end!(
            "transform_rows",
            duration_ms = start.elapsed().as_millis() as u64,
            class = self.class.name(),
            row_count = beans.len()
        );

        Ok(beans)
    }

    fn initialize<S: AsRef<str>>(&self, aliases: &[S]) -> Result<TransformPlan> {
        log_op_start!(
            "transformer_initialize",
            class = self.class.name(),
            alias_count = aliases.len()
        );
        let start = Instant::now();

        let plan = TransformPlan::build(&self.class, aliases).map_err(|e| {
            log_op_error!(
                "transformer_initialize",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                class = self.class.name()
            );
            e
        })?;

        log_op_end!(
            "transformer_initialize",
            duration_ms = start.elapsed().as_millis() as u64,
            class = self.class.name(),
            root_count = plan.root_aliases.len(),
            group_count = plan.groups.len()
        );

        Ok(plan)
    }
}

impl ResultTransformer for NestedBeanTransformer {
    type Output = Bean;

    /// Values past the last alias are never read.
    ///
    /// # Errors
    /// * `ArityMismatch` - If the tuple has fewer values than aliases
    /// * `FieldNotFound` - On first use, if any alias segment names an undeclared field
    /// * `TypeMismatch` - If a group prefix names a scalar field, or a value does not fit its field
    /// * `UnresolvedClass` - If a group's field refers to a class that was never bound
    /// * `TupleIndexOutOfRange` - If the tuple is shorter than the cached plan needs
    fn transform_tuple<S: AsRef<str>>(&self, tuple: &[Value], aliases: &[S]) -> Result<Bean> {
        if tuple.len() < aliases.len() {
            return Err(NestBeanError::ArityMismatch {
                tuple_len: tuple.len(),
                alias_len: aliases.len(),
            });
        }

        let plan = self.plan.get_or_try_init(|| self.initialize(aliases))?;
        plan.apply(tuple)
    }
}

impl TransformPlan {
    fn build<S: AsRef<str>>(class: &Arc<BeanClass>, aliases: &[S]) -> Result<Self> {
        let partition = alias::partition(aliases);

        let root_builder = FlatBeanBuilder::new(Arc::clone(class));
        let root_writers = root_builder.resolve(&alias::sub_aliases(&partition.root))?;

        let mut groups = Vec::with_capacity(partition.groups.len());
        for (field, group_aliases) in partition.groups {
            let writer = class.accessor(&field)?.clone();
            let child_class = Arc::clone(class.nested_class(&field, writer.field_type())?);

            let sub_aliases = alias::sub_aliases(&group_aliases);
            let child_plan = TransformPlan::build(&child_class, &sub_aliases)?;

            tracing::debug!(
                class = class.name(),
                field = %field,
                child = child_class.name(),
                alias_count = sub_aliases.len(),
                "nested group resolved"
            );

            groups.push(NestedGroup {
                field,
                writer,
                aliases: group_aliases,
                sub_aliases,
                transformer: NestedBeanTransformer::with_plan(child_class, child_plan),
            });
        }

        Ok(Self {
            root_aliases: partition.root,
            root_writers,
            root_builder,
            groups,
        })
    }

    fn apply(&self, tuple: &[Value]) -> Result<Bean> {
        let root_tuple = alias::sub_tuple(&self.root_aliases, tuple)?;
        let mut bean = self.root_builder.build_with(&self.root_writers, &root_tuple)?;

        // The root bean must exist before any child is written into it.
        for group in &self.groups {
            let sub_tuple = alias::sub_tuple(&group.aliases, tuple)?;
            let child = group
                .transformer
                .transform_tuple(&sub_tuple, &group.sub_aliases)?;
            group.writer.set(&mut bean, Value::from(child))?;
        }

        Ok(bean)
    }
}
