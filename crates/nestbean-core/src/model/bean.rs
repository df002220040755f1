use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::class::BeanClass;
use super::value::{Value, NULL};
use crate::errors::{NestBeanError, Result};

/// One materialized record of a [`BeanClass`]
///
/// Slots are laid out in the class's combined field table order. Every slot
/// starts out null; the transformer fills them through field accessors.
#[derive(Clone)]
pub struct Bean {
    class: Arc<BeanClass>,
    slots: Vec<Value>,
}

impl Bean {
    pub(crate) fn new(class: Arc<BeanClass>, width: usize) -> Self {
        Self {
            class,
            slots: vec![Value::Null; width],
        }
    }

    pub fn class(&self) -> &Arc<BeanClass> {
        &self.class
    }

    /// Read a field (own or inherited)
    ///
    /// # Errors
    /// * `FieldNotFound` - If the class does not declare the field
    pub fn get(&self, field: &str) -> Result<&Value> {
        let accessor = self.class.accessor(field)?;
        Ok(accessor.get(self))
    }

    /// Read a value through a dotted path such as `"nested.id"`
    ///
    /// A null bean anywhere along the path yields null.
    ///
    /// # Errors
    /// * `FieldNotFound` - If a segment is not declared
    /// * `TypeMismatch` - If a non-final segment holds a scalar
    /// * `UnresolvedClass` - If the path crosses a class reference that was never bound
    pub fn get_path(&self, path: &str) -> Result<&Value> {
        let Some((head, tail)) = path.split_once('.') else {
            return self.get(path);
        };
        match self.get(head)? {
            Value::Null => {
                self.class.resolve_path(path)?;
                Ok(&NULL)
            }
            Value::Bean(child) => child.get_path(tail),
            _ => {
                let ty = self.class.field_type(head)?;
                Err(self.class.not_a_bean_field(head, ty))
            }
        }
    }

    /// Nested bean held by a field, if set
    pub fn nested(&self, field: &str) -> Option<&Bean> {
        self.get(field).ok().and_then(Value::as_bean)
    }

    /// Write a field through the public surface
    ///
    /// # Errors
    /// * `FieldNotFound` - If the class does not declare the field
    /// * `FieldNotWritable` - If the field is read-only
    /// * `TypeMismatch` - If the value does not fit the declared type
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        let accessor = self.class.accessor(field)?.clone();
        if !accessor.is_writable() {
            return Err(NestBeanError::FieldNotWritable {
                field: field.to_string(),
                class: self.class.name().to_string(),
            });
        }
        accessor.set(self, value.into())
    }

    /// Field name/value pairs in table order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.class
            .fields()
            .map(move |accessor| (accessor.name(), accessor.get(self)))
    }

    /// JSON object of the bean's fields, nested beans as nested objects
    ///
    /// # Errors
    /// * `Serialization` - If a value cannot be represented in JSON (a non-finite float)
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Deserialize into a typed struct via the bean's JSON form
    ///
    /// # Errors
    /// * `Serialization` - If the JSON form does not match `T`
    pub fn into_typed<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.to_json()?)?)
    }

    pub(crate) fn slot(&self, slot: usize) -> &Value {
        self.slots.get(slot).unwrap_or(&NULL)
    }

    pub(crate) fn write_slot(&mut self, slot: usize, value: Value) -> Result<()> {
        let len = self.slots.len();
        let target = self
            .slots
            .get_mut(slot)
            .ok_or_else(|| NestBeanError::Internal {
                message: format!(
                    "slot {} out of range for bean of class {} with {} slots",
                    slot,
                    self.class.name(),
                    len
                ),
            })?;
        *target = value;
        Ok(())
    }
}

impl PartialEq for Bean {
    fn eq(&self, other: &Self) -> bool {
        self.class.name() == other.class.name() && self.slots == other.slots
    }
}

impl fmt::Debug for Bean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.class.name())?;
        f.debug_map().entries(self.iter()).finish()
    }
}

impl Serialize for Bean {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
