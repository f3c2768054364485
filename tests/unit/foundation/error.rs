use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        OverprintError::invalid_scene("x")
            .to_string()
            .contains("invalid scene:")
    );
    assert!(
        OverprintError::decode("x")
            .to_string()
            .contains("decode failure:")
    );
    assert!(
        OverprintError::encode("x")
            .to_string()
            .contains("encode failure:")
    );
    assert!(OverprintError::font("x").to_string().contains("font error:"));
    assert!(
        OverprintError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        OverprintError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = OverprintError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn client_errors_are_input_failures_only() {
    assert!(OverprintError::invalid_scene("x").is_client_error());
    assert!(OverprintError::decode("x").is_client_error());
    assert!(OverprintError::serde("x").is_client_error());
    assert!(!OverprintError::encode("x").is_client_error());
    assert!(!OverprintError::font("x").is_client_error());
    assert!(!OverprintError::Other(anyhow::anyhow!("x")).is_client_error());
}
