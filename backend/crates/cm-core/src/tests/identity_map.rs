use crate::{CoreError, DependencyKey, IdentityMap, IdentityMapping};

use googletest::prelude::*;

#[test]
fn given_mapping_without_target_or_new_flag_when_validated_then_invalid_mapping() {
    let mut mapping = IdentityMapping::new_object("template", "7", "Home");
    mapping.is_new_object = false;

    let result = mapping.validate();

    assert!(matches!(result, Err(CoreError::InvalidMapping { .. })));
}

#[test]
fn given_new_object_without_target_when_validated_then_ok() {
    let mapping = IdentityMapping::new_object("template", "7", "Home");

    assert_that!(mapping.validate(), ok(anything()));
}

#[test]
fn given_map_with_one_bad_mapping_when_validated_then_error() {
    let mut map = IdentityMap::new("src1");
    map.insert(IdentityMapping::existing("template", "1", "A", "100"));
    let mut bad = IdentityMapping::new_object("template", "2", "B");
    bad.is_new_object = false;
    map.insert(bad);

    assert!(map.validate().is_err());
}

#[test]
fn given_new_mapping_when_resolved_then_target_id_available() {
    let mut map = IdentityMap::new("src1");
    map.insert(IdentityMapping::new_object("template", "7", "Home"));
    let key = DependencyKey::new("template", "7");

    let resolved = map.resolve(&key, "42");

    assert_that!(resolved, eq(true));
    assert_that!(map.target_id(&key), some(eq("42")));
    assert_that!(map.get(&key).unwrap().is_new_object, eq(true));
}

#[test]
fn given_unknown_key_when_resolved_then_false() {
    let mut map = IdentityMap::new("src1");

    assert_that!(map.resolve(&DependencyKey::new("template", "9"), "1"), eq(false));
    assert_that!(map.is_empty(), eq(true));
}

#[test]
fn given_map_when_serialized_then_keys_are_plain_strings() {
    let mut map = IdentityMap::new("src1");
    map.insert(IdentityMapping::existing("template", "1", "A", "100"));

    let json = serde_json::to_value(&map).unwrap();

    assert_that!(json["sourceServer"].as_str(), some(eq("src1")));
    assert_that!(
        json["mappings"]["template:1"]["targetId"].as_str(),
        some(eq("100"))
    );
}
