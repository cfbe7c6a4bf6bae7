//! Configuration layering: defaults, TOML file, environment.

use figment::Jail;
use pretty_assertions::assert_eq;

use oasis_schemas::{config::CONFIG_FILE, ConfigError, FailureMode, Settings};

#[test]
fn defaults_without_sources() {
    Jail::expect_with(|_jail| {
        let settings = Settings::load(None).map_err(|e| e.to_string())?;
        assert_eq!(settings, Settings::default());
        Ok(())
    });
}

#[test]
fn local_file_overrides_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            CONFIG_FILE,
            r#"
                studio_host = "oasis-staging"

                [api]
                dataset = "staging"

                [validation]
                failure_mode = "warn"
            "#,
        )?;

        let settings = Settings::load(None).map_err(|e| e.to_string())?;
        assert_eq!(settings.api.project_id, "dvvkusmi");
        assert_eq!(settings.api.dataset, "staging");
        assert_eq!(settings.studio_host, "oasis-staging");
        assert_eq!(settings.validation.failure_mode, FailureMode::Warn);
        Ok(())
    });
}

#[test]
fn env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[api]\ndataset = \"staging\"\n")?;
        jail.set_env("OASIS_SCHEMAS_API__DATASET", "preview");
        jail.set_env("OASIS_SCHEMAS_AUTO_UPDATES", "false");

        let settings = Settings::load(Some("custom.toml".as_ref())).map_err(|e| e.to_string())?;
        assert_eq!(settings.api.dataset, "preview");
        assert!(!settings.auto_updates);
        assert!(!settings.cli_config().auto_updates);
        Ok(())
    });
}

#[test]
fn invalid_project_id_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("OASIS_SCHEMAS_API__PROJECT_ID", "Not-Valid");

        match Settings::load(None) {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "api.project_id"),
            other => panic!("expected invalid project id, got {other:?}"),
        }
        Ok(())
    });
}

#[test]
fn numeric_env_values_read_as_text() {
    Jail::expect_with(|jail| {
        jail.set_env("OASIS_SCHEMAS_API__PROJECT_ID", "12345678");
        jail.set_env("OASIS_SCHEMAS_API__DATASET", "2024");

        let settings = Settings::load(None).map_err(|e| e.to_string())?;
        assert_eq!(settings.api.project_id, "12345678");
        assert_eq!(settings.api.dataset, "2024");
        assert_eq!(settings.cli_config().api.project_id, "12345678");
        Ok(())
    });
}

#[test]
fn numeric_toml_values_read_as_text() {
    Jail::expect_with(|jail| {
        jail.create_file(CONFIG_FILE, "[api]\nproject_id = 42\n")?;

        let settings = Settings::load(None).map_err(|e| e.to_string())?;
        assert_eq!(settings.api.project_id, "42");
        Ok(())
    });
}
