use crate::config::config::{AppConfig, StoreBackend};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "PROFILE_DESK_";

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 优先级（后者覆盖前者）：
    /// 1. 内置开发环境默认值
    /// 2. ./profile-desk.toml
    /// 3. 环境变量（`PROFILE_DESK_API__BASE_URL` 形式）
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(default_config_path())
    }

    /// 从指定路径加载配置
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig, figment::Error> {
        let figment = Figment::from(Serialized::defaults(AppConfig::development()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract()
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.api.timeout_secs == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if config.api.collection_path.trim_matches('/').is_empty() {
            return Err(ConfigValidationError::MissingCollectionPath);
        }

        if config.api.backend == StoreBackend::Http {
            if config.api.base_url.trim().is_empty() {
                return Err(ConfigValidationError::MissingBaseUrl);
            }
            reqwest::Url::parse(&config.api.base_url)
                .map_err(|e| ConfigValidationError::InvalidBaseUrl(e.to_string()))?;
        }

        Ok(())
    }

    /// 命令行每次运行都是新进程，内存存储无法跨运行保留数据
    pub fn require_persistent_backend(config: &AppConfig) -> Result<(), ConfigValidationError> {
        match config.api.backend {
            StoreBackend::Http => Ok(()),
            StoreBackend::Memory => Err(ConfigValidationError::EphemeralBackend),
        }
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("请求超时无效，必须大于 0")]
    InvalidTimeout,

    #[error("服务地址未配置")]
    MissingBaseUrl,

    #[error("服务地址无效: {0}")]
    InvalidBaseUrl(String),

    #[error("集合资源路径未配置")]
    MissingCollectionPath,

    #[error("内存存储仅用于测试与嵌入，命令行需使用 http 后端")]
    EphemeralBackend,
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("profile-desk.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::load()?;
            assert_eq!(config.api.base_url, "http://localhost:3001");
            assert_eq!(config.api.collection_path, "profile-list");
            assert_eq!(config.app_name, "profile-desk");
            Ok(())
        });
    }

    #[test]
    fn test_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "profile-desk.toml",
                r#"
                    environment = "staging"

                    [api]
                    base_url = "http://staging.local"
                    timeout_secs = 5

                    [logging]
                    level = "warn"
                "#,
            )?;
            jail.set_env("PROFILE_DESK_API__BASE_URL", "http://override.local");
            jail.set_env("PROFILE_DESK_API__BACKEND", "memory");

            let config = ConfigLoader::load()?;
            assert_eq!(config.environment, "staging");
            assert_eq!(config.api.base_url, "http://override.local");
            assert_eq!(config.api.backend, StoreBackend::Memory);
            assert_eq!(config.api.timeout_secs, 5);
            assert_eq!(config.api.collection_path, "profile-list");
            assert_eq!(config.logging.level, "warn");
            Ok(())
        });
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::development();
        assert!(ConfigLoader::validate(&config).is_ok());

        config.api.base_url = "not a url".into();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidBaseUrl(_))
        ));

        config.api.backend = StoreBackend::Memory;
        assert!(ConfigLoader::validate(&config).is_ok());

        config.api.timeout_secs = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidTimeout)
        ));

        let mut config = AppConfig::development();
        config.api.collection_path = "/".into();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::MissingCollectionPath)
        ));
    }

    #[test]
    fn test_cli_requires_persistent_backend() {
        let mut config = AppConfig::development();
        assert!(ConfigLoader::require_persistent_backend(&config).is_ok());

        config.api.backend = StoreBackend::Memory;
        assert!(ConfigLoader::validate(&config).is_ok());
        assert!(matches!(
            ConfigLoader::require_persistent_backend(&config),
            Err(ConfigValidationError::EphemeralBackend)
        ));
    }
}
