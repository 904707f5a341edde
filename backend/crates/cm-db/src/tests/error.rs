use crate::DbError;

use cm_core::{CoreError, IdentityMapping};

use googletest::prelude::*;

#[test]
fn given_invalid_mapping_core_error_when_converted_then_invalid_mapping_variant() {
    // Given
    let mut mapping = IdentityMapping::new_object("template", "7", "Home");
    mapping.is_new_object = false;
    let core_error = mapping.validate().unwrap_err();

    // When
    let error = DbError::from(core_error);

    // Then
    assert!(matches!(error, DbError::InvalidMapping { ref key, .. } if key == "template:7"));
}

#[test]
fn given_other_core_error_when_converted_then_wrapped() {
    // Given
    let core_error = CoreError::InvalidStatus {
        value: "bogus".to_string(),
        location: cm_core::ErrorLocation::from(std::panic::Location::caller()),
    };

    // When
    let error = DbError::from(core_error);

    // Then
    assert!(matches!(error, DbError::Core { .. }));
    assert_that!(error.to_string(), contains_substring("bogus"));
}
