use protocell_core::config::AppConfig;
use protocell_data::Activation;

#[test]
fn test_default_config_is_valid() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.brain.topology().layers, vec![7, 15, 15, 12]);
}

#[test]
fn test_partial_toml_fills_defaults() {
    let config = AppConfig::from_toml(
        r#"
        log_interval = 10

        [world]
        seed = 3
        wrap = true

        [brain]
        hidden_layers = [8]

        [brain.activations]
        input = "identity"
        hidden = "tanh"
        output = "sigmoid"
        "#,
    )
    .expect("valid config");

    assert_eq!(config.log_interval, 10);
    assert_eq!(config.world.seed, Some(3));
    assert!(config.world.wrap);
    assert_eq!(config.brain.activations.hidden, Activation::Tanh);
    assert_eq!(config.brain.topology().layers, vec![7, 8, 12]);
    assert_eq!(config.metabolism.hatch_age, 500);
    assert_eq!(config.persistence.saves_dir, "saves");
}

#[test]
fn test_shipped_config_file_parses() {
    let content = include_str!("../config.toml");
    let config = AppConfig::from_toml(content).expect("shipped config is valid");
    assert_eq!(config.world.eggs_per_quadrant, 500);
    assert_eq!(config.persistence.autosave_period_secs, 1800);
}

#[test]
fn test_out_of_range_values_are_rejected() {
    let cases: Vec<(&str, Box<dyn Fn(&mut AppConfig)>)> = vec![
        ("inverted trait range", Box::new(|c| c.genome.radius.min = 10.0)),
        ("zero log interval", Box::new(|c| c.log_interval = 0)),
        ("negative efficiency", Box::new(|c| c.metabolism.plant_efficiency = -0.1)),
        ("zero minimum threads", Box::new(|c| c.threads.minimum = 0)),
        ("zero partitions", Box::new(|c| c.threads.partitions = Some(0))),
    ];
    for (name, mutate) in cases {
        let mut config = AppConfig::default();
        mutate(&mut config);
        assert!(config.validate().is_err(), "{name} should be rejected");
    }
}

#[test]
fn test_malformed_toml_is_an_error() {
    assert!(AppConfig::from_toml("[world\nseed = ").is_err());
    assert!(AppConfig::from_toml("[metabolism]\nhatch_age = -4").is_err());
}

#[test]
fn test_fingerprint_tracks_simulation_sections() {
    let base = AppConfig::default();
    let mut persistence_only = base.clone();
    persistence_only.persistence.saves_dir = "elsewhere".to_string();
    let mut metabolism = base.clone();
    metabolism.metabolism.hatch_age = 10;

    assert_eq!(base.fingerprint(), persistence_only.fingerprint());
    assert_ne!(base.fingerprint(), metabolism.fingerprint());
    assert_eq!(base.fingerprint().len(), 64);
}
