#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::{TimeZone, Utc};
use nestbean_core::{
    FlatBeanBuilder, NestBeanError, NestedBeanTransformer, ResultTransformer, Value,
};

use common::*;

fn values(tuple: &[Value]) -> Vec<Value> {
    tuple.to_vec()
}

#[test]
fn test_transform_basic_bean() {
    let tuple = [Value::from(1), Value::from("test")];
    let aliases = ["id", "description"];

    let bean = NestedBeanTransformer::of(Some(basic_bean()))
        .unwrap()
        .transform_tuple(&tuple, &aliases)
        .unwrap();

    assert_eq!(bean.get("id").unwrap(), &tuple[0]);
    assert_eq!(bean.get("description").unwrap(), &tuple[1]);
}

#[test]
fn test_root_only_matches_flat_builder() {
    let tuple = [Value::from("test"), Value::from(1)];
    let aliases = ["description", "id"];

    let nested = NestedBeanTransformer::new(basic_bean())
        .transform_tuple(&tuple, &aliases)
        .unwrap();
    let flat = FlatBeanBuilder::new(basic_bean())
        .transform_tuple(&tuple, &aliases)
        .unwrap();

    assert_eq!(nested, flat);
}

#[test]
fn test_transform_nested_bean() {
    let tuple = [
        Value::from(1),
        Value::from("test"),
        Value::from(2),
        Value::from("test 2"),
    ];
    let aliases = ["id", "description", "nested.id", "nested.description"];

    let bean = NestedBeanTransformer::of(Some(bean_with_nested_basic_one()))
        .unwrap()
        .transform_tuple(&tuple, &aliases)
        .unwrap();

    assert_eq!(bean.get("id").unwrap(), &tuple[0]);
    assert_eq!(bean.get("description").unwrap(), &tuple[1]);

    let nested = bean.nested("nested").expect("nested bean should be set");
    assert_eq!(nested.class().name(), BASIC_BEAN);
    assert_eq!(nested.get("id").unwrap(), &tuple[2]);
    assert_eq!(nested.get("description").unwrap(), &tuple[3]);
}

#[test]
fn test_nested_only_leaves_root_fields_null() {
    let tuple = [Value::from(2), Value::from("test 2")];
    let aliases = ["nested.id", "nested.description"];

    let bean = NestedBeanTransformer::new(bean_with_nested_basic_one())
        .transform_tuple(&tuple, &aliases)
        .unwrap();

    assert!(bean.get("id").unwrap().is_null());
    assert!(bean.get("description").unwrap().is_null());
    assert_eq!(bean.get_path("nested.id").unwrap(), &Value::Int(2));
}

#[test]
fn test_transform_more_than_two_levels_of_nested_bean() {
    let tuple = [
        Value::from(1),
        Value::from("test"),
        Value::from(2),
        Value::from("test 2"),
        Value::from(3),
        Value::from("test 3"),
        Value::from(4),
        Value::from("test 4"),
    ];
    let aliases = [
        "nested.id",
        "nested.description",
        "nestedMultiLevel.id",
        "nestedMultiLevel.description",
        "nestedMultiLevel.nested.id",
        "nestedMultiLevel.nested.description",
    ];

    let bean = NestedBeanTransformer::of(Some(multi_level_nested_bean()))
        .unwrap()
        .transform_tuple(&tuple, &aliases)
        .unwrap();

    assert_eq!(bean.get_path("nested.id").unwrap(), &tuple[0]);
    assert_eq!(bean.get_path("nested.description").unwrap(), &tuple[1]);
    assert_eq!(bean.get_path("nestedMultiLevel.id").unwrap(), &tuple[2]);
    assert_eq!(
        bean.get_path("nestedMultiLevel.description").unwrap(),
        &tuple[3]
    );
    assert_eq!(
        bean.get_path("nestedMultiLevel.nested.id").unwrap(),
        &tuple[4]
    );
    assert_eq!(
        bean.get_path("nestedMultiLevel.nested.description").unwrap(),
        &tuple[5]
    );

    let middle = bean.nested("nestedMultiLevel").unwrap();
    assert_eq!(middle.class().name(), BEAN_WITH_NESTED_BASIC_ONE);
    assert_eq!(middle.nested("nested").unwrap().class().name(), BASIC_BEAN);
}

#[test]
fn test_multi_level_with_all_values_aliased() {
    let tuple = [
        Value::from(1),
        Value::from("test"),
        Value::from(2),
        Value::from("test 2"),
        Value::from(3),
        Value::from("test 3"),
        Value::from(4),
        Value::from("test 4"),
    ];
    let aliases = [
        "nested.id",
        "nested.description",
        "nestedMultiLevel.id",
        "nestedMultiLevel.description",
        "nestedMultiLevel.nested.id",
        "nestedMultiLevel.nested.description",
        "nestedMultiLevel.nested.id",
        "nestedMultiLevel.nested.description",
    ];

    let bean = NestedBeanTransformer::new(multi_level_nested_bean())
        .transform_tuple(&tuple, &aliases)
        .unwrap();

    // A repeated alias writes the same field again; the later value wins.
    assert_eq!(bean.get_path("nested.id").unwrap(), &Value::Int(1));
    assert_eq!(
        bean.get_path("nestedMultiLevel.nested.description").unwrap(),
        &Value::from("test 4")
    );
}

#[test]
fn test_transform_inherited_fields() {
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let tuple = [
        Value::from(1),
        Value::from("test"),
        Value::from(created_at),
        Value::from(2),
        Value::from("test 2"),
    ];
    let aliases = [
        "id",
        "description",
        "createdAt",
        "nested.id",
        "nested.description",
    ];

    let bean = NestedBeanTransformer::of(Some(inherited_bean()))
        .unwrap()
        .transform_tuple(&tuple, &aliases)
        .unwrap();

    assert_eq!(bean.class().name(), INHERITED_BEAN);
    assert_eq!(bean.get("id").unwrap(), &tuple[0]);
    assert_eq!(bean.get("description").unwrap(), &tuple[1]);
    assert_eq!(bean.get("createdAt").unwrap(), &tuple[2]);
    assert_eq!(bean.get_path("nested.id").unwrap(), &tuple[3]);
    assert_eq!(bean.get_path("nested.description").unwrap(), &tuple[4]);
}

#[test]
fn test_nested_field_not_found() {
    let tuple = [
        Value::from(1),
        Value::from("test"),
        Value::from(2),
        Value::from("test 2"),
    ];
    let aliases = ["id", "description", "nest.id", "nest.description"];

    let err = NestedBeanTransformer::of(Some(bean_with_nested_basic_one()))
        .unwrap()
        .transform_tuple(&tuple, &aliases)
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("Field nest not found in class {}", BEAN_WITH_NESTED_BASIC_ONE)
    );
    assert!(matches!(err, NestBeanError::FieldNotFound { .. }));
}

#[test]
fn test_root_field_not_found() {
    let err = NestedBeanTransformer::new(basic_bean())
        .transform_tuple(&[Value::from(1)], &["ident"])
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("Field ident not found in class {}", BASIC_BEAN)
    );
}

#[test]
fn test_deep_field_not_found_names_nested_class() {
    let err = NestedBeanTransformer::new(multi_level_nested_bean())
        .transform_tuple(&[Value::from(1)], &["nestedMultiLevel.nested.code"])
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("Field code not found in class {}", BASIC_BEAN)
    );
}

#[test]
fn test_of_requires_bean_class() {
    let err = NestedBeanTransformer::of(None).unwrap_err();

    assert_eq!(err.to_string(), "beanClass is required");
    assert_eq!(
        err,
        NestBeanError::InvalidArgument {
            parameter: "beanClass".to_string()
        }
    );
}

#[test]
fn test_repeated_calls_yield_equal_beans() {
    let transformer = NestedBeanTransformer::new(bean_with_nested_basic_one());
    let tuple = values(&[
        Value::from(1),
        Value::from("test"),
        Value::from(2),
        Value::from("test 2"),
    ]);
    let aliases = aliases(&["id", "description", "nested.id", "nested.description"]);

    let first = transformer.transform_tuple(&tuple, &aliases).unwrap();
    let second = transformer.transform_tuple(&tuple, &aliases).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.get_path("nested.description").unwrap(), &tuple[3]);
}

#[test]
fn test_cached_layout_ignores_later_aliases() {
    let transformer = NestedBeanTransformer::new(bean_with_nested_basic_one());
    transformer
        .transform_tuple(
            &[Value::from(1), Value::from(2)],
            &["id", "nested.id"],
        )
        .unwrap();

    // Same width, different names: the first layout still decides placement.
    let bean = transformer
        .transform_tuple(&[Value::from(5), Value::from(6)], &["nested.id", "id"])
        .unwrap();

    assert_eq!(bean.get("id").unwrap(), &Value::Int(5));
    assert_eq!(bean.get_path("nested.id").unwrap(), &Value::Int(6));
}

#[test]
fn test_arity_mismatch() {
    let err = NestedBeanTransformer::new(basic_bean())
        .transform_tuple(&[Value::from(1)], &["id", "description"])
        .unwrap_err();

    assert_eq!(
        err,
        NestBeanError::ArityMismatch {
            tuple_len: 1,
            alias_len: 2
        }
    );
}

#[test]
fn test_value_type_mismatch() {
    let err = NestedBeanTransformer::new(bean_with_nested_basic_one())
        .transform_tuple(&[Value::from("two")], &["nested.id"])
        .unwrap_err();

    assert_eq!(
        err,
        NestBeanError::TypeMismatch {
            field: "id".to_string(),
            class: BASIC_BEAN.to_string(),
            expected: "int".to_string(),
            actual: "text".to_string(),
        }
    );
}

#[test]
fn test_null_values_are_accepted() {
    let bean = NestedBeanTransformer::new(bean_with_nested_basic_one())
        .transform_tuple(&[Value::Null, Value::Null], &["id", "nested.id"])
        .unwrap();

    assert!(bean.get("id").unwrap().is_null());
    // The child bean is still created, with its own fields null.
    assert!(bean.nested("nested").is_some());
    assert!(bean.get_path("nested.id").unwrap().is_null());
}

#[test]
fn test_transform_rows() {
    let transformer = NestedBeanTransformer::new(bean_with_nested_basic_one());
    let rows = vec![
        vec![Value::from(1), Value::from(10)],
        vec![Value::from(2), Value::from(20)],
        vec![Value::from(3), Value::from(30)],
    ];

    let beans = transformer
        .transform_rows(&rows, &["id", "nested.id"])
        .unwrap();

    let nested_ids: Vec<_> = beans
        .iter()
        .map(|b| b.get_path("nested.id").unwrap().as_int().unwrap())
        .collect();
    assert_eq!(nested_ids, vec![10, 20, 30]);
}

#[test]
fn test_transform_rows_stops_at_first_bad_row() {
    let transformer = NestedBeanTransformer::new(basic_bean());
    let rows = vec![
        vec![Value::from(1)],
        vec![Value::from("x")],
        vec![Value::from(3)],
    ];

    let err = transformer.transform_rows(&rows, &["id"]).unwrap_err();
    assert!(matches!(err, NestBeanError::TypeMismatch { .. }));
}

#[test]
fn test_cached_plan_wider_than_later_tuple() {
    let transformer = NestedBeanTransformer::new(bean_with_nested_basic_one());
    transformer
        .transform_tuple(
            &[
                Value::from(1),
                Value::from("test"),
                Value::from(2),
                Value::from("test 2"),
            ],
            &["id", "description", "nested.id", "nested.description"],
        )
        .unwrap();

    let err = transformer
        .transform_tuple(&[Value::from(1), Value::from(2)], &["id", "nested.id"])
        .unwrap_err();

    assert!(matches!(
        err,
        NestBeanError::TupleIndexOutOfRange { len: 2, .. }
    ));
}
