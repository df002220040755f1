use std::sync::Arc;

use nestbean_core::{BeanClass, FieldType};

pub const BASIC_BEAN: &str = "com.acme.beans.BasicBean";
pub const BEAN_WITH_NESTED_BASIC_ONE: &str = "com.acme.beans.BeanWithNestedBasicOne";
pub const MULTI_LEVEL_NESTED_BEAN: &str = "com.acme.beans.MultiLevelNestedBean";
pub const INHERITED_BEAN: &str = "com.acme.beans.InheritedBean";

/// `id: int`, `description: text`
#[allow(dead_code)]
pub fn basic_bean() -> Arc<BeanClass> {
    BeanClass::builder(BASIC_BEAN)
        .field("id", FieldType::Int)
        .field("description", FieldType::Text)
        .build()
}

/// `id`, `description`, `nested: BasicBean`
#[allow(dead_code)]
pub fn bean_with_nested_basic_one() -> Arc<BeanClass> {
    BeanClass::builder(BEAN_WITH_NESTED_BASIC_ONE)
        .field("id", FieldType::Int)
        .field("description", FieldType::Text)
        .field("nested", FieldType::bean(&basic_bean()))
        .build()
}

/// `nested: BasicBean`, `nestedMultiLevel: BeanWithNestedBasicOne`
#[allow(dead_code)]
pub fn multi_level_nested_bean() -> Arc<BeanClass> {
    BeanClass::builder(MULTI_LEVEL_NESTED_BEAN)
        .field("nested", FieldType::bean(&basic_bean()))
        .field(
            "nestedMultiLevel",
            FieldType::bean(&bean_with_nested_basic_one()),
        )
        .build()
}

/// BeanWithNestedBasicOne plus `createdAt: timestamp`
#[allow(dead_code)]
pub fn inherited_bean() -> Arc<BeanClass> {
    BeanClass::builder(INHERITED_BEAN)
        .extends(&bean_with_nested_basic_one())
        .field("createdAt", FieldType::Timestamp)
        .build()
}

/// Aliases as owned strings, the way a host usually hands them over
#[allow(dead_code)]
pub fn aliases(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
