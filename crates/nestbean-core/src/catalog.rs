//! Class catalog
//!
//! Declares bean classes in TOML so hosts (and the CLI) can build
//! transformers without hand-written class definitions:
//!
//! ```toml
//! [[class]]
//! name = "shop.Customer"
//! fields = [
//!   { name = "id", type = "int" },
//!   { name = "name", type = "text" },
//! ]
//!
//! [[class]]
//! name = "shop.Order"
//! fields = [
//!   { name = "id", type = "int", writable = false },
//!   { name = "customer", type = "shop.Customer" },
//! ]
//! ```
//!
//! A field type is either a scalar keyword (see [`FieldType::from_keyword`])
//! or the name of a class in the catalog, including the declaring class
//! itself. Classes may appear in any order. Field types may form cycles
//! (`Employee.manager: Employee`); `extends` chains may not.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::{NestBeanError, Result};
use crate::model::{BeanClass, ClassRef, FieldType};
use crate::transform::NestedBeanTransformer;

/// One `[[class]]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// One field entry of a class table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default = "default_writable")]
    pub writable: bool,
}

fn default_writable() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default, rename = "class")]
    classes: Vec<ClassSpec>,
}

/// Resolved set of bean classes, keyed by fully qualified name
#[derive(Debug, Default)]
pub struct ClassCatalog {
    classes: IndexMap<String, Arc<BeanClass>>,
}

impl ClassCatalog {
    /// Parse and resolve a TOML catalog
    ///
    /// # Errors
    /// * `Serialization` - If the document is not valid TOML for a catalog
    /// * any error from [`ClassCatalog::from_specs`]
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let document: CatalogDocument = toml::from_str(source)?;
        Self::from_specs(document.classes)
    }

    /// Resolve class specs into classes
    ///
    /// # Errors
    /// * `InvalidCatalog` - If a class or field name is empty
    /// * `DuplicateClass` - If a class name is declared twice
    /// * `UnknownClass` - If `extends` or a field type names no declared class
    /// * `ClassCycle` - If a class reaches itself through `extends`
    pub fn from_specs(specs: Vec<ClassSpec>) -> Result<Self> {
        let mut by_name: IndexMap<String, ClassSpec> = IndexMap::new();
        for spec in specs {
            validate_spec(&spec)?;
            if by_name.contains_key(&spec.name) {
                return Err(NestBeanError::DuplicateClass { name: spec.name });
            }
            by_name.insert(spec.name.clone(), spec);
        }

        // Field types go through late-bound references, so only `extends`
        // has to be resolved in dependency order.
        let refs: IndexMap<String, ClassRef> = by_name
            .keys()
            .map(|name| (name.clone(), ClassRef::forward(name.clone())))
            .collect();

        let mut resolver = Resolver {
            specs: &by_name,
            refs: &refs,
            resolved: IndexMap::new(),
            visiting: HashSet::new(),
        };
        for name in by_name.keys() {
            resolver.resolve(name)?;
        }

        // Keep declaration order rather than resolution order.
        let mut classes = IndexMap::with_capacity(by_name.len());
        for (name, class_ref) in &refs {
            let class = resolver.resolve(name)?;
            class_ref.bind(&class)?;
            classes.insert(name.clone(), class);
        }

        tracing::debug!(class_count = classes.len(), "class catalog resolved");
        Ok(Self { classes })
    }

    /// # Errors
    /// * `UnknownClass` - If no class has this name
    pub fn get(&self, name: &str) -> Result<Arc<BeanClass>> {
        self.classes
            .get(name)
            .cloned()
            .ok_or_else(|| NestBeanError::UnknownClass {
                name: name.to_string(),
            })
    }

    /// Fresh, uninitialized transformer for a class
    ///
    /// # Errors
    /// * `UnknownClass` - If no class has this name
    pub fn transformer(&self, name: &str) -> Result<NestedBeanTransformer> {
        self.get(name).map(NestedBeanTransformer::new)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

fn validate_spec(spec: &ClassSpec) -> Result<()> {
    if spec.name.trim().is_empty() {
        return Err(NestBeanError::InvalidCatalog {
            reason: "class name cannot be empty".to_string(),
        });
    }
    for field in &spec.fields {
        if field.name.trim().is_empty() || field.name.contains(crate::alias::PATH_SEPARATOR) {
            return Err(NestBeanError::InvalidCatalog {
                reason: format!(
                    "class {} declares invalid field name '{}'",
                    spec.name, field.name
                ),
            });
        }
    }
    Ok(())
}

struct Resolver<'a> {
    specs: &'a IndexMap<String, ClassSpec>,
    refs: &'a IndexMap<String, ClassRef>,
    resolved: IndexMap<String, Arc<BeanClass>>,
    visiting: HashSet<String>,
}

impl Resolver<'_> {
    fn resolve(&mut self, name: &str) -> Result<Arc<BeanClass>> {
        if let Some(class) = self.resolved.get(name) {
            return Ok(Arc::clone(class));
        }
        let specs = self.specs;
        let spec = specs
            .get(name)
            .ok_or_else(|| NestBeanError::UnknownClass {
                name: name.to_string(),
            })?;
        if !self.visiting.insert(name.to_string()) {
            return Err(NestBeanError::ClassCycle {
                name: name.to_string(),
            });
        }

        let mut builder = BeanClass::builder(spec.name.clone());
        if let Some(parent) = &spec.extends {
            let parent = self.resolve(parent)?;
            builder = builder.extends(&parent);
        }
        for field in &spec.fields {
            let ty = match FieldType::from_keyword(&field.ty) {
                Some(scalar) => scalar,
                None => self
                    .refs
                    .get(&field.ty)
                    .cloned()
                    .map(FieldType::Bean)
                    .ok_or_else(|| NestBeanError::UnknownClass {
                        name: field.ty.clone(),
                    })?,
            };
            builder = if field.writable {
                builder.field(field.name.clone(), ty)
            } else {
                builder.read_only_field(field.name.clone(), ty)
            };
        }

        let class = builder.build();
        self.visiting.remove(name);
        self.resolved.insert(name.to_string(), Arc::clone(&class));
        Ok(class)
    }
}
