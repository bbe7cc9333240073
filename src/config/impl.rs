use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::{AppConfig, GradingConfig, JwtConfig};

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

// 仓库内 config.toml 自带的占位密钥，生产环境必须替换
const PLACEHOLDER_SECRET: &str = "change-me-in-production";

// 单独设置的环境变量 → 配置键
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("JWT_SECRET", "jwt.secret"),
    ("DATABASE_URL", "database.url"),
    ("GRADING_SUBMIT_TIMEOUT_MS", "grading.submit_timeout_ms"),
    ("GRADING_FEE_DUE_DAYS", "grading.fee_due_days"),
];

impl AppConfig {
    /// 加载配置：config.toml → config.{APP_ENV}.toml → DOJO_* → 单独的环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{environment}")).required(false))
            .add_source(
                Environment::with_prefix("DOJO")
                    .separator("_")
                    .try_parsing(true),
            );

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;

        // 0 表示按 CPU 核数决定
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.jwt
            .validate(self.is_production())
            .and_then(|_| self.grading.validate())
            .map_err(ConfigError::Message)
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Unix 套接字路径，未配置时为 None
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

impl JwtConfig {
    fn validate(&self, production: bool) -> Result<(), String> {
        if self.secret.is_empty() {
            return Err("jwt.secret must be set".to_string());
        }
        if production && self.secret == PLACEHOLDER_SECRET {
            return Err("jwt.secret still uses the placeholder value".to_string());
        }
        if self.access_token_expiry <= 0 || self.refresh_token_expiry <= 0 {
            return Err("jwt token expiry must be positive".to_string());
        }
        Ok(())
    }
}

impl GradingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.submit_timeout_ms == 0 {
            return Err("grading.submit_timeout_ms must be positive".to_string());
        }
        if self.fee_due_days < 0 {
            return Err("grading.fee_due_days must not be negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry: 15,
            refresh_token_expiry: 7,
            refresh_token_remember_me_expiry: 30,
        }
    }

    #[test]
    fn test_placeholder_secret_only_rejected_in_production() {
        assert!(jwt(PLACEHOLDER_SECRET).validate(false).is_ok());
        assert!(jwt(PLACEHOLDER_SECRET).validate(true).is_err());
        assert!(jwt("a-real-secret").validate(true).is_ok());
        assert!(jwt("").validate(false).is_err());
    }

    #[test]
    fn test_grading_defaults_are_valid() {
        let grading = GradingConfig::default();
        assert!(grading.validate().is_ok());
        assert_eq!(grading.success_redirect_delay().as_millis(), 2000);

        let zero_timeout = GradingConfig {
            submit_timeout_ms: 0,
            ..GradingConfig::default()
        };
        assert!(zero_timeout.validate().is_err());
    }
}
