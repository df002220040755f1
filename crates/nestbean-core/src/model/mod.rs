pub mod bean;
pub mod class;
pub mod value;

pub use bean::Bean;
pub use class::{BeanClass, BeanClassBuilder, ClassRef, FieldAccessor, FieldDef, FieldType};
pub use value::Value;
