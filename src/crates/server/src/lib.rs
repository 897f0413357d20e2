pub mod auth;
pub mod consts;
pub mod middleware;
pub mod partners;
pub mod users;

use application::auth::AuthService;
use application::command::shared::IdGenerator;
use application::import::reconcile::CancelFlag;
use infra::auth::{AuthConfig, BcryptPasswordHasher, JwtTokenService};
use infra::config::AppConfigImpl;
use infra::id_generator::SnowflakeIdGenerator;
use infra::repository::postgres::command::user::UserRepositoryImpl;
use log::{info, warn};
use sea_orm::DatabaseConnection;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbBackend, Statement};
use std::sync::Arc;

pub struct AppState {
    pub app_cfg: AppConfigImpl,
    pub db: DatabaseConnection,
    pub id_generator: Arc<dyn IdGenerator>,
    /// 当前导入批次的取消标记，导入开始时复位
    pub import_cancel: CancelFlag,
}

impl AppState {
    pub async fn init_db(db_url: &str) -> DatabaseConnection {
        use std::time::Duration;

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(90)
            .min_connections(20)
            .connect_timeout(Duration::from_secs(3))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(60))
            .max_lifetime(Duration::from_secs(300))
            .sqlx_logging(false)
            .sqlx_logging_level(log::LevelFilter::Info);

        let db = Database::connect(opt)
            .await
            .expect("Failed to connect to database");

        let backend = DbBackend::Postgres;
        db.execute(Statement::from_string(backend, "SELECT 1".to_owned()))
            .await
            .expect("Failed to execute test query");

        info!("Database connection pool initialized successfully");
        db
    }

    pub async fn new(db: DatabaseConnection, app_cfg: AppConfigImpl) -> Self {
        let id_generator: Arc<dyn IdGenerator> = Arc::new(SnowflakeIdGenerator::new(1).unwrap());

        Self {
            app_cfg,
            db,
            id_generator,
            import_cancel: CancelFlag::new(),
        }
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(
            Arc::new(UserRepositoryImpl::new(self.db.clone())),
            Arc::new(BcryptPasswordHasher::new(self.app_cfg.salt_cost())),
            Arc::new(JwtTokenService::new(
                self.app_cfg.jwt_secret(),
                self.app_cfg.jwt_expire_secs(),
            )),
            self.id_generator.clone(),
        )
    }
}

/// 首次启动时创建默认管理员
pub async fn init_admin_user(state: &AppState) {
    let (username, password) = state.app_cfg.bootstrap_admin();
    match state.auth_service().create_admin(&username, &password).await {
        Ok(()) => info!("bootstrap admin '{}' created", username),
        Err(e) => warn!("bootstrap admin skipped: {}", e),
    }
}
