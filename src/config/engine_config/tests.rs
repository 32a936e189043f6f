use super::*;

#[test]
fn test_default_config_is_valid() {
    let config = EngineConfig::default();
    assert!(config.validate().is_ok());
    assert!(config.weights.is_monotonic());
    assert!(config.overall.is_valid());
    assert!(config.engagement.is_valid());
}

#[test]
fn test_type_weights_decrease_with_richness() {
    let weights = CommunicationWeights::default();
    assert_eq!(weights.weight(CommunicationType::FaceToFace), 1.0);
    assert!(
        weights.weight(CommunicationType::FaceToFace) > weights.weight(CommunicationType::Meeting)
    );
    assert!(weights.weight(CommunicationType::Chat) > weights.weight(CommunicationType::Email));
    assert!(weights.weight(CommunicationType::Email) > weights.weight(CommunicationType::Other));
}

#[test]
fn test_non_monotonic_weights_rejected() {
    let mut config = EngineConfig::default();
    config.weights.email = 0.9;
    assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
}

#[test]
fn test_overall_weights_validation() {
    let valid = OverallWeights {
        energy: 0.3,
        engagement: 0.4,
        exploration: 0.3,
    };
    assert!(valid.is_valid());

    let invalid = OverallWeights {
        energy: 0.5,
        engagement: 0.5,
        exploration: 0.5,
    };
    assert!(!invalid.is_valid());

    let mut config = EngineConfig::default();
    config.overall = invalid;
    assert!(config.validate().is_err());
}

#[test]
fn test_unnormalized_overall_weights_rejected() {
    let mut config = EngineConfig::default();
    config.overall = OverallWeights {
        energy: 2.0,
        engagement: 1.0,
        exploration: 1.0,
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_modifier_out_of_range_rejected() {
    let mut config = EngineConfig::default();
    config.weights.group_modifier = 0.0;
    assert!(config.validate().is_err());

    let mut config = EngineConfig::default();
    config.weights.cross_team_modifier = 1.5;
    assert!(config.validate().is_err());
}

#[test]
fn test_non_positive_resolution_rejected() {
    let mut config = EngineConfig::default();
    config.community.resolution = 0.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let toml_str = r#"
[weights]
email = 0.15

[overall]
energy = 0.3
engagement = 0.4
exploration = 0.3

[community]
seed = 7
"#;
    let config: EngineConfig = toml::from_str(toml_str).unwrap();
    assert_eq!(config.weights.email, 0.15);
    assert_eq!(config.weights.face_to_face, 1.0);
    assert_eq!(config.overall.energy, 0.3);
    assert_eq!(config.community.seed, 7);
    assert_eq!(config.community.resolution, 1.0);
    assert_eq!(config.roles.top_k, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_toml_roundtrip_of_defaults() {
    let rendered = EngineConfig::default().to_toml_string().unwrap();
    let parsed: EngineConfig = toml::from_str(&rendered).unwrap();
    assert_eq!(parsed, EngineConfig::default());
}

#[test]
fn test_load_engine_config_prefers_toml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[roles]\ntop_k = 5\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join(".teampulserc.json"),
        r#"{"roles": {"top_k": 9}}"#,
    )
    .unwrap();

    let config = load_engine_config(dir.path());
    assert_eq!(config.roles.top_k, 5);
}

#[test]
fn test_load_engine_config_json_fallback() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".teampulserc.json"),
        r#"{"community": {"seed": 99}}"#,
    )
    .unwrap();

    let config = load_engine_config(dir.path());
    assert_eq!(config.community.seed, 99);
}

#[test]
fn test_load_engine_config_invalid_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "[overall]\nenergy = 0.9\nengagement = 0.9\nexploration = 0.9\n",
    )
    .unwrap();

    let config = load_engine_config(dir.path());
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_load_config_file_reports_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[weights]\nother = 2.0\n").unwrap();
    let err = load_config_file(&path).unwrap_err();
    assert!(err.to_string().contains("invalid configuration"));
}
