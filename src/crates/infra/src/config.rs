use crate::auth::AuthConfig;
use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;
use std::error::Error;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::RwLock;

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawConfig {
    jwt_expire_secs: i64,
    jwt_secret_key: String,
    salt_cost: i32,
    database_url: String,
    /// 首次启动时自动创建的管理员
    bootstrap_admin_username: String,
    bootstrap_admin_password: String,
    /// 服务器配置
    server: RawServerConfig,
    /// 导入配置
    import: RawImportConfig,
}

/// 服务器配置（原始配置）
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawServerConfig {
    /// 监听地址
    host: String,
    /// 监听端口
    port: u16,
}

impl Default for RawServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5620,
        }
    }
}

/// 导入配置（原始配置）
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawImportConfig {
    /// 单次导入的最大行数
    max_rows: usize,
    /// 清空操作的确认短语，必须逐字输入
    delete_all_phrase: String,
}

impl Default for RawImportConfig {
    fn default() -> Self {
        Self {
            max_rows: 2000,
            delete_all_phrase: "DELETE ALL PARTNERS".to_string(),
        }
    }
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            jwt_expire_secs: 3600,
            salt_cost: 10,
            jwt_secret_key: "secret".to_string(),
            database_url: "".to_string(),
            bootstrap_admin_username: "admin".to_string(),
            bootstrap_admin_password: "admin".to_string(),
            server: RawServerConfig::default(),
            import: RawImportConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// 导入配置
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// 单次导入的最大行数
    pub max_rows: usize,
    /// 清空操作的确认短语
    pub delete_all_phrase: String,
}

#[derive(Debug, Clone)]
pub struct AppConfigImpl {
    pub jwt_expire_secs: Arc<AtomicU64>,
    pub salt_cost: Arc<AtomicU64>,
    pub jwt_secret_key: Arc<RwLock<String>>,
    pub database_url: Arc<RwLock<String>>,
    pub bootstrap_admin_username: Arc<RwLock<String>>,
    pub bootstrap_admin_password: Arc<RwLock<String>>,
    pub server: Arc<RwLock<ServerConfig>>,
    pub import: Arc<RwLock<ImportConfig>>,
}

impl AppConfigImpl {
    fn new(data: RawConfig) -> Self {
        let server_config = ServerConfig {
            host: data.server.host,
            port: data.server.port,
        };
        let import_config = ImportConfig {
            max_rows: data.import.max_rows,
            delete_all_phrase: data.import.delete_all_phrase,
        };
        AppConfigImpl {
            jwt_expire_secs: Arc::new(AtomicU64::new(data.jwt_expire_secs as u64)),
            salt_cost: Arc::new(AtomicU64::new(data.salt_cost as u64)),
            jwt_secret_key: Arc::new(RwLock::new(data.jwt_secret_key)),
            database_url: Arc::new(RwLock::new(data.database_url)),
            bootstrap_admin_username: Arc::new(RwLock::new(data.bootstrap_admin_username)),
            bootstrap_admin_password: Arc::new(RwLock::new(data.bootstrap_admin_password)),
            server: Arc::new(RwLock::new(server_config)),
            import: Arc::new(RwLock::new(import_config)),
        }
    }

    pub fn load() -> Result<AppConfigImpl, Box<dyn Error>> {
        dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        let raw: RawConfig = config.try_deserialize()?; // serde 自动填充默认值
        let app_config = AppConfigImpl::new(raw);
        Ok(app_config)
    }

    pub fn server(&self) -> ServerConfig {
        let cfg_val = self.server.read().unwrap();
        cfg_val.clone()
    }

    pub fn import(&self) -> ImportConfig {
        let cfg_val = self.import.read().unwrap();
        cfg_val.clone()
    }

    pub fn database_url(&self) -> String {
        let cfg_val = self.database_url.read().unwrap();
        (*cfg_val).clone()
    }

    pub fn bootstrap_admin(&self) -> (String, String) {
        let username = self.bootstrap_admin_username.read().unwrap().clone();
        let password = self.bootstrap_admin_password.read().unwrap().clone();
        (username, password)
    }
}

impl AuthConfig for AppConfigImpl {
    fn jwt_secret(&self) -> &str {
        static CACHED_SECRET: OnceLock<String> = OnceLock::new();

        let secret_string = {
            let cfg_val = self.jwt_secret_key.read().unwrap();
            cfg_val.clone()
        };

        CACHED_SECRET.get_or_init(|| secret_string)
    }

    fn jwt_expire_secs(&self) -> i64 {
        self.jwt_expire_secs.load(Ordering::SeqCst) as i64
    }

    fn salt_cost(&self) -> i32 {
        self.salt_cost.load(Ordering::SeqCst) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfigImpl::new(RawConfig::default());
        let import = cfg.import();
        assert_eq!(import.max_rows, 2000);
        assert_eq!(import.delete_all_phrase, "DELETE ALL PARTNERS");
        assert_eq!(cfg.server().port, 5620);
    }
}
