//! nestbean Core - flat tuples into nested beans
//!
//! Converts one result row (a tuple of values plus a parallel array of
//! aliases such as `"customer.address.city"`) into a graph of nested beans:
//! - Bean classes with inherited fields and per-field direct accessors
//! - Alias partitioning by first dotted segment
//! - A flat builder for dot-free aliases
//! - A recursive transformer with one-time, first-call initialization
//! - A TOML class catalog
//!
//! ```
//! use nestbean_core::{BeanClass, FieldType, NestedBeanTransformer, ResultTransformer, Value};
//!
//! let customer = BeanClass::builder("shop.Customer")
//!     .field("id", FieldType::Int)
//!     .field("name", FieldType::Text)
//!     .build();
//! let order = BeanClass::builder("shop.Order")
//!     .field("id", FieldType::Int)
//!     .field("customer", FieldType::bean(&customer))
//!     .build();
//!
//! let transformer = NestedBeanTransformer::new(order);
//! let bean = transformer
//!     .transform_tuple(
//!         &[Value::from(1), Value::from(7), Value::from("Ada")],
//!         &["id", "customer.id", "customer.name"],
//!     )
//!     .unwrap();
//!
//! assert_eq!(bean.get_path("customer.name").unwrap().as_text(), Some("Ada"));
//! ```

pub mod alias;
pub mod catalog;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod transform;

#[doc(hidden)]
pub use nestbean_core_types;
#[doc(hidden)]
pub use tracing;

// Re-export commonly used types
pub use catalog::ClassCatalog;
pub use errors::{ExError, ExErrorKind, NestBeanError, Result};
pub use model::{Bean, BeanClass, ClassRef, FieldAccessor, FieldType, Value};
pub use transform::{FlatBeanBuilder, NestedBeanTransformer, ResultTransformer};
