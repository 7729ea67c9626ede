use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SuperShowError::input("x")
            .to_string()
            .contains("input error:")
    );
    assert!(
        SuperShowError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        SuperShowError::measurement("x")
            .to_string()
            .contains("measurement error:")
    );
    assert!(
        SuperShowError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SuperShowError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_input_errors_are_user_facing() {
    assert!(SuperShowError::input("bad font").is_user_facing());
    assert!(!SuperShowError::measurement("timeout").is_user_facing());
    assert!(!SuperShowError::validation("x").is_user_facing());
}
