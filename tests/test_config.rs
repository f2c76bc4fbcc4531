//! Integration tests for configuration validation and capacity helpers.

use htm_spatial_pooler::{estimate_memory_bytes, ConfigError, PoolerConfig, PoolerError};

#[test]
fn test_presets_all_validate() {
    assert!(PoolerConfig::small().validate().is_ok());
    assert!(PoolerConfig::standard().validate().is_ok());
    assert!(PoolerConfig::large().validate().is_ok());
}

#[test]
fn test_invalid_config_surfaces_through_engine_construction() {
    let mut cfg = PoolerConfig::standard();
    cfg.max_boost = 0.5; // below the documented floor of 1.0
    let err = htm_spatial_pooler::SpatialPooler::new(cfg).unwrap_err();
    assert!(matches!(err, PoolerError::Config(ConfigError::OutOfRange { field: "max_boost", .. })));
}

#[test]
fn test_memory_estimate_grows_with_scale() {
    let small = estimate_memory_bytes(1024, 512);
    let large = estimate_memory_bytes(2048, 1024);
    assert!(large > small * 3);
}

#[test]
fn test_default_equals_standard() {
    assert_eq!(PoolerConfig::default(), PoolerConfig::standard());
}
