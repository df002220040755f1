use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;

use super::bean::Bean;
use super::value::Value;
use crate::errors::{NestBeanError, Result};

/// Late-bound reference to a bean class, resolved by name
///
/// Field types point at their class through this handle so a class can
/// refer to itself (`Employee.manager: Employee`) or to a class that refers
/// back to it. Clones share one binding. A class graph with reference
/// cycles is never freed, like any other loaded class metadata.
#[derive(Clone)]
pub struct ClassRef {
    name: String,
    target: Arc<OnceCell<Arc<BeanClass>>>,
}

impl ClassRef {
    /// Reference an existing class
    pub fn to(class: &Arc<BeanClass>) -> Self {
        Self {
            name: class.name().to_string(),
            target: Arc::new(OnceCell::with_value(Arc::clone(class))),
        }
    }

    /// Reference a class that is not built yet
    ///
    /// A class built with a field of this type binds the reference itself
    /// when the names match; otherwise call [`ClassRef::bind`].
    pub fn forward(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: Arc::new(OnceCell::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_bound(&self) -> bool {
        self.target.get().is_some()
    }

    /// The bound class, if any
    pub fn get(&self) -> Option<&Arc<BeanClass>> {
        self.target.get()
    }

    /// Bind this reference (and every clone of it) to `class`
    ///
    /// Binding again to the same class is a no-op.
    ///
    /// # Errors
    /// * `ClassRefMismatch` - If the names differ or another class is already bound
    pub fn bind(&self, class: &Arc<BeanClass>) -> Result<()> {
        let mismatch = || NestBeanError::ClassRefMismatch {
            expected: self.name.clone(),
            actual: class.name().to_string(),
        };
        if class.name() != self.name {
            return Err(mismatch());
        }
        let bound = self.target.get_or_init(|| Arc::clone(class));
        if Arc::ptr_eq(bound, class) {
            Ok(())
        } else {
            Err(mismatch())
        }
    }

    /// # Errors
    /// * `UnresolvedClass` - If the reference was never bound
    pub fn resolve(&self) -> Result<&Arc<BeanClass>> {
        self.get().ok_or_else(|| NestBeanError::UnresolvedClass {
            name: self.name.clone(),
        })
    }
}

impl fmt::Debug for ClassRef {
    // Name only: a bound class may reach this reference again.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRef")
            .field("name", &self.name)
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Declared type of a bean field
#[derive(Debug, Clone)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    Text,
    Timestamp,
    /// Accepts any value without conversion
    Any,
    /// A nested bean of the referenced class (or one of its descendants)
    Bean(ClassRef),
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldType::Bean(a), FieldType::Bean(b)) => a.name() == b.name(),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }
}

impl FieldType {
    pub fn bean(class: &Arc<BeanClass>) -> Self {
        FieldType::Bean(ClassRef::to(class))
    }

    /// Bean type for a class built later, typically the one being declared
    pub fn forward(name: impl Into<String>) -> Self {
        FieldType::Bean(ClassRef::forward(name))
    }

    /// Parse a scalar type keyword as written in a class catalog
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "bool" | "boolean" => Some(FieldType::Bool),
            "int" | "integer" | "long" => Some(FieldType::Int),
            "float" | "double" => Some(FieldType::Float),
            "text" | "string" => Some(FieldType::Text),
            "timestamp" | "datetime" => Some(FieldType::Timestamp),
            "any" => Some(FieldType::Any),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Text => "text",
            FieldType::Timestamp => "timestamp",
            FieldType::Any => "any",
            FieldType::Bean(class) => class.name(),
        }
    }

    pub fn is_bean(&self) -> bool {
        matches!(self, FieldType::Bean(_))
    }

    /// The bound bean class of a bean field
    pub fn as_bean_class(&self) -> Option<&Arc<BeanClass>> {
        match self {
            FieldType::Bean(class) => class.get(),
            _ => None,
        }
    }

    /// Fit a value to this type, widening ints into float fields.
    ///
    /// Null fits every type. On mismatch the rejected value is handed back.
    pub(crate) fn conform(&self, value: Value) -> std::result::Result<Value, Value> {
        match (self, value) {
            (_, Value::Null) => Ok(Value::Null),
            (FieldType::Any, v) => Ok(v),
            (FieldType::Bool, v @ Value::Bool(_)) => Ok(v),
            (FieldType::Int, v @ Value::Int(_)) => Ok(v),
            (FieldType::Float, Value::Int(i)) => Ok(Value::Float(i as f64)),
            (FieldType::Float, v @ Value::Float(_)) => Ok(v),
            (FieldType::Text, v @ Value::Text(_)) => Ok(v),
            (FieldType::Timestamp, v @ Value::Timestamp(_)) => Ok(v),
            (FieldType::Bean(class), Value::Bean(bean))
                if class
                    .get()
                    .map_or(false, |class| class.is_assignable_from(bean.class())) =>
            {
                Ok(Value::Bean(bean))
            }
            (_, v) => Err(v),
        }
    }

    /// Convert a JSON scalar into a value of this type.
    ///
    /// Timestamps accept RFC 3339 strings or epoch milliseconds. Bean fields
    /// never come from JSON directly; they are built from dotted aliases.
    pub fn coerce_json(&self, json: &serde_json::Value) -> Option<Value> {
        use serde_json::Value as J;

        match (self, json) {
            (_, J::Null) => Some(Value::Null),
            (FieldType::Bool, J::Bool(b)) => Some(Value::Bool(*b)),
            (FieldType::Int, J::Number(n)) => n.as_i64().map(Value::Int),
            (FieldType::Float, J::Number(n)) => n.as_f64().map(Value::Float),
            (FieldType::Text, J::String(s)) => Some(Value::Text(s.clone())),
            (FieldType::Timestamp, J::String(s)) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|ts| Value::Timestamp(ts.with_timezone(&Utc))),
            (FieldType::Timestamp, J::Number(n)) => n
                .as_i64()
                .and_then(DateTime::from_timestamp_millis)
                .map(Value::Timestamp),
            (FieldType::Any, J::Bool(b)) => Some(Value::Bool(*b)),
            (FieldType::Any, J::Number(n)) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float)),
            (FieldType::Any, J::String(s)) => Some(Value::Text(s.clone())),
            _ => None,
        }
    }
}

/// A field as declared on one class
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub ty: FieldType,
    /// Whether `Bean::set` may write the field. Direct accessors ignore this.
    pub writable: bool,
}

/// Direct read/write handle for one field of a class
///
/// Built once per class when the class is built. Writes go straight to the
/// bean's slot and bypass the `writable` flag; only the declared type is
/// enforced.
#[derive(Debug, Clone)]
pub struct FieldAccessor {
    name: String,
    slot: usize,
    ty: FieldType,
    writable: bool,
}

impl FieldAccessor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn field_type(&self) -> &FieldType {
        &self.ty
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn get<'a>(&self, bean: &'a Bean) -> &'a Value {
        bean.slot(self.slot)
    }

    /// Write a value into the bean's slot
    ///
    /// # Errors
    /// * `TypeMismatch` - If the value does not fit the declared type
    pub fn set(&self, bean: &mut Bean, value: Value) -> Result<()> {
        let value = self
            .ty
            .conform(value)
            .map_err(|rejected| NestBeanError::TypeMismatch {
                field: self.name.clone(),
                class: bean.class().name().to_string(),
                expected: self.ty.name().to_string(),
                actual: rejected.type_name().to_string(),
            })?;
        bean.write_slot(self.slot, value)
    }
}

/// Target record type for transformation
///
/// A class has a fully qualified name, an optional parent and its own
/// declared fields. The combined field table is built ancestor-first when the
/// class is built: a field redeclared by a descendant replaces the ancestor's
/// entry (type and writability) but keeps the ancestor's slot, so ancestor
/// accessors stay valid on descendant beans.
#[derive(Debug)]
pub struct BeanClass {
    name: String,
    parent: Option<Arc<BeanClass>>,
    declared: Vec<FieldDef>,
    table: IndexMap<String, FieldAccessor>,
}

impl BeanClass {
    pub fn builder(name: impl Into<String>) -> BeanClassBuilder {
        BeanClassBuilder {
            name: name.into(),
            parent: None,
            declared: Vec::new(),
        }
    }

    /// Fully qualified class name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<BeanClass>> {
        self.parent.as_ref()
    }

    /// Fields declared directly on this class, in declaration order
    pub fn declared_fields(&self) -> &[FieldDef] {
        &self.declared
    }

    /// Combined field table, inherited fields first
    pub fn fields(&self) -> impl Iterator<Item = &FieldAccessor> {
        self.table.values()
    }

    pub fn field_count(&self) -> usize {
        self.table.len()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Look up the direct accessor for a field (own or inherited)
    ///
    /// # Errors
    /// * `FieldNotFound` - If neither this class nor an ancestor declares the field
    pub fn accessor(&self, name: &str) -> Result<&FieldAccessor> {
        self.table
            .get(name)
            .ok_or_else(|| NestBeanError::FieldNotFound {
                field: name.to_string(),
                class: self.name.clone(),
            })
    }

    /// Declared type of a field (own or inherited)
    ///
    /// # Errors
    /// * `FieldNotFound` - If neither this class nor an ancestor declares the field
    pub fn field_type(&self, name: &str) -> Result<&FieldType> {
        self.accessor(name).map(FieldAccessor::field_type)
    }

    /// Declared type at the end of a dotted alias path
    ///
    /// # Errors
    /// * `FieldNotFound` - If a segment is not declared on the class it is resolved against
    /// * `TypeMismatch` - If a non-final segment is not a bean field
    pub fn resolve_path(&self, path: &str) -> Result<&FieldType> {
        match path.split_once('.') {
            None => self.field_type(path),
            Some((head, tail)) => {
                let ty = self.field_type(head)?;
                self.nested_class(head, ty)?.resolve_path(tail)
            }
        }
    }

    /// True when `other` is this class or one of its descendants
    pub fn is_assignable_from(&self, other: &BeanClass) -> bool {
        let mut current = Some(other);
        while let Some(class) = current {
            if class.name == self.name {
                return true;
            }
            current = class.parent.as_deref();
        }
        false
    }

    /// Create an empty bean with every slot set to null
    pub fn instantiate(self: &Arc<Self>) -> Bean {
        Bean::new(Arc::clone(self), self.table.len())
    }

    /// Class behind a bean-typed field
    ///
    /// # Errors
    /// * `TypeMismatch` - If the field is not a bean field
    /// * `UnresolvedClass` - If its class reference was never bound
    pub(crate) fn nested_class<'a>(
        &self,
        field: &str,
        ty: &'a FieldType,
    ) -> Result<&'a Arc<BeanClass>> {
        match ty {
            FieldType::Bean(class) => class.resolve(),
            other => Err(self.not_a_bean_field(field, other)),
        }
    }

    pub(crate) fn not_a_bean_field(&self, field: &str, ty: &FieldType) -> NestBeanError {
        NestBeanError::TypeMismatch {
            field: field.to_string(),
            class: self.name.clone(),
            expected: "bean class".to_string(),
            actual: ty.name().to_string(),
        }
    }
}

/// Builder for [`BeanClass`]
#[derive(Debug)]
pub struct BeanClassBuilder {
    name: String,
    parent: Option<Arc<BeanClass>>,
    declared: Vec<FieldDef>,
}

impl BeanClassBuilder {
    pub fn extends(mut self, parent: &Arc<BeanClass>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.declared.push(FieldDef {
            name: name.into(),
            ty,
            writable: true,
        });
        self
    }

    /// Declare a field that `Bean::set` refuses to write
    pub fn read_only_field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.declared.push(FieldDef {
            name: name.into(),
            ty,
            writable: false,
        });
        self
    }

    pub fn build(self) -> Arc<BeanClass> {
        let mut table: IndexMap<String, FieldAccessor> = self
            .parent
            .as_ref()
            .map(|parent| parent.table.clone())
            .unwrap_or_default();

        for def in &self.declared {
            if let Some(existing) = table.get_mut(&def.name) {
                existing.ty = def.ty.clone();
                existing.writable = def.writable;
                continue;
            }
            let slot = table.len();
            table.insert(
                def.name.clone(),
                FieldAccessor {
                    name: def.name.clone(),
                    slot,
                    ty: def.ty.clone(),
                    writable: def.writable,
                },
            );
        }

        let class = Arc::new(BeanClass {
            name: self.name,
            parent: self.parent,
            declared: self.declared,
            table,
        });

        // Forward references to this very class can be bound now.
        for def in &class.declared {
            if let FieldType::Bean(target) = &def.ty {
                if !target.is_bound() && target.name() == class.name {
                    target.bind(&class).ok();
                }
            }
        }

        class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic() -> Arc<BeanClass> {
        BeanClass::builder("acme.Basic")
            .field("id", FieldType::Int)
            .field("description", FieldType::Text)
            .build()
    }

    #[test]
    fn test_inherited_fields_come_first() {
        let parent = basic();
        let child = BeanClass::builder("acme.Child")
            .extends(&parent)
            .field("createdAt", FieldType::Timestamp)
            .build();

        let names: Vec<_> = child.fields().map(|f| f.name().to_string()).collect();
        assert_eq!(names, vec!["id", "description", "createdAt"]);
        assert_eq!(child.declared_fields().len(), 1);
        assert_eq!(child.field_type("id").unwrap(), &FieldType::Int);
    }

    #[test]
    fn test_descendant_redeclaration_wins_and_keeps_slot() {
        let parent = basic();
        let child = BeanClass::builder("acme.Child")
            .extends(&parent)
            .field("id", FieldType::Text)
            .build();

        let id = child.accessor("id").unwrap();
        assert_eq!(id.field_type(), &FieldType::Text);
        assert_eq!(id.slot(), parent.accessor("id").unwrap().slot());
        assert_eq!(child.field_count(), 2);
    }

    #[test]
    fn test_missing_field_names_class() {
        let class = basic();
        let err = class.accessor("nope").unwrap_err();
        assert_eq!(err.to_string(), "Field nope not found in class acme.Basic");
    }

    #[test]
    fn test_resolve_path_walks_bean_fields() {
        let inner = basic();
        let outer = BeanClass::builder("acme.Outer")
            .field("inner", FieldType::bean(&inner))
            .build();

        assert_eq!(outer.resolve_path("inner.id").unwrap(), &FieldType::Int);
        assert!(matches!(
            outer.resolve_path("inner.id.x"),
            Err(NestBeanError::TypeMismatch { .. })
        ));
        assert!(matches!(
            outer.resolve_path("other.id"),
            Err(NestBeanError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn test_self_reference_binds_on_build() {
        let employee = BeanClass::builder("hr.Employee")
            .field("name", FieldType::Text)
            .field("manager", FieldType::forward("hr.Employee"))
            .build();

        let manager = employee.field_type("manager").unwrap();
        assert!(Arc::ptr_eq(manager.as_bean_class().unwrap(), &employee));
        assert_eq!(
            employee.resolve_path("manager.manager.name").unwrap(),
            &FieldType::Text
        );
        // Debug stops at the reference instead of recursing.
        assert!(format!("{:?}", employee).contains("hr.Employee"));
    }

    #[test]
    fn test_mutual_reference_bound_explicitly() {
        let department_ref = ClassRef::forward("hr.Department");
        let employee = BeanClass::builder("hr.Employee")
            .field("department", FieldType::Bean(department_ref.clone()))
            .build();
        assert!(matches!(
            employee.resolve_path("department.name"),
            Err(NestBeanError::UnresolvedClass { .. })
        ));

        let department = BeanClass::builder("hr.Department")
            .field("name", FieldType::Text)
            .field("head", FieldType::bean(&employee))
            .build();
        department_ref.bind(&department).unwrap();
        department_ref.bind(&department).unwrap();

        assert_eq!(
            employee.resolve_path("department.head.department.name").unwrap(),
            &FieldType::Text
        );
        assert!(matches!(
            department_ref.bind(&employee),
            Err(NestBeanError::ClassRefMismatch { .. })
        ));
    }

    #[test]
    fn test_assignability_follows_parent_chain() {
        let parent = basic();
        let child = BeanClass::builder("acme.Child").extends(&parent).build();

        assert!(parent.is_assignable_from(&child));
        assert!(!child.is_assignable_from(&parent));
    }

    #[test]
    fn test_conform_widens_and_rejects() {
        assert_eq!(FieldType::Float.conform(Value::Int(2)), Ok(Value::Float(2.0)));
        assert_eq!(FieldType::Int.conform(Value::Null), Ok(Value::Null));
        assert_eq!(
            FieldType::Int.conform(Value::Text("1".into())),
            Err(Value::Text("1".into()))
        );
    }

    #[test]
    fn test_coerce_json_timestamp() {
        let from_str = FieldType::Timestamp
            .coerce_json(&serde_json::json!("2024-01-02T03:04:05Z"))
            .unwrap();
        let from_millis = FieldType::Timestamp
            .coerce_json(&serde_json::json!(1_704_164_645_000_i64))
            .unwrap();
        assert_eq!(from_str, from_millis);
        assert_eq!(FieldType::Int.coerce_json(&serde_json::json!("1")), None);
    }
}
