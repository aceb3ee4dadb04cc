use rocket::figment::providers::{Env, Format as _, Toml};
use rocket::figment::{Figment, Profile};
use rocket::Config;
use serde::Deserialize;
use std::num::NonZeroU64;
use std::path::PathBuf;

/// Adapted from [`Config::figment`] but with the
/// ability to have two rocket config files.
pub(crate) fn figment() -> Figment {
    Figment::from(Config::default())
        .merge(Toml::file(Env::var_or("ROCKET_DEFAULT_CONFIG", "Rocket.default.toml")).nested())
        .merge(Toml::file(Env::var_or("ROCKET_CONFIG", "Rocket.toml")).nested())
        .merge(Env::prefixed("ROCKET_").ignore(&["PROFILE"]).global())
        .select(Profile::from_env_or(
            "ROCKET_PROFILE",
            Config::DEFAULT_PROFILE,
        ))
}

/// Application settings that live next to Rocket's own configuration.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AppConfig {
    #[serde(default = "default_venues_per_page")]
    pub(crate) venues_per_page: NonZeroU64,
    /// Directory that uploaded venue images are stored in and served from.
    #[serde(default = "default_media_dir")]
    pub(crate) media_dir: PathBuf,
}

fn default_venues_per_page() -> NonZeroU64 {
    NonZeroU64::MIN.saturating_add(1)
}

fn default_media_dir() -> PathBuf {
    PathBuf::from("media")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::figment::providers::Serialized;

    #[test]
    fn defaults_apply_when_keys_are_missing() {
        let config: AppConfig = Figment::new().extract().unwrap();
        assert_eq!(2, config.venues_per_page.get());
        assert_eq!(PathBuf::from("media"), config.media_dir);
    }

    #[test]
    fn page_size_can_be_configured() {
        let config: AppConfig = Figment::new()
            .merge(Serialized::default("venues_per_page", 10))
            .extract()
            .unwrap();
        assert_eq!(10, config.venues_per_page.get());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let result: Result<AppConfig, _> = Figment::new()
            .merge(Serialized::default("venues_per_page", 0))
            .extract();
        assert!(result.is_err());
    }
}
