use super::value::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use thiserror::Error;

/// 用户领域错误
#[derive(Error, Debug)]
pub enum UserError {
    #[error("invalid user or password!{0}")]
    InvalidUserOrPassword(String),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("user is deleted")]
    UserDeleted,
    #[error("version conflict: {0}")]
    VersionConflictErr(i64),
    #[error("{0}")]
    DbErr(String),
    #[error("{0}")]
    OtherErr(String),
    #[error("{0}")]
    AuthError(String),
}

#[derive(Debug, Clone, PartialEq)]
#[repr(i32)]
pub enum UserStatus {
    Active = 1,
    New = 2,
    Deleted = 3,
}

impl From<UserStatus> for i32 {
    fn from(value: UserStatus) -> Self {
        value as i32
    }
}

impl TryFrom<i32> for UserStatus {
    type Error = String;
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(UserStatus::Active),
            2 => Ok(UserStatus::New),
            3 => Ok(UserStatus::Deleted),
            _ => Err(format!("invalid value:{}", value)),
        }
    }
}

/// 用户聚合根
///
/// 后台运营人员。用户可以登录系统、管理合作伙伴数据并触发导入。
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,                    // 用户唯一标识符
    pub username: String,              // 用户登录名，唯一
    pub name: String,                  // 用户昵称/显示名称
    pub email: String,                 // 用户电子邮件地址
    pub is_admin: bool,                // 用户是否为管理员
    pub password: String,              // 加密后的密码 (bcrypt)
    pub last_login_at: NaiveDateTime,  // 最后登录时间
    pub status: UserStatus,            // 用户状态
    pub version: i64,                  // 当前版本，用于乐观锁
}

impl User {
    pub fn new(
        id: UserId,
        username: &str,
        name: Option<&str>,
        email: &str,
        is_admin: bool,
        hashed_password: &str,
    ) -> Result<Self, UserError> {
        Ok(User {
            id,
            username: String::from(username),
            name: {
                if let Some(name) = name {
                    String::from(name)
                } else {
                    String::from(username)
                }
            },
            email: String::from(email),
            is_admin,
            password: String::from(hashed_password),
            last_login_at: DateTime::<Utc>::from_timestamp(0, 0).unwrap().naive_utc(),
            status: UserStatus::New,
            version: 0,
        })
    }

    pub fn change_password(&mut self, new_hashed_password: &str) -> Result<&mut Self, UserError> {
        self.password = String::from(new_hashed_password);
        Ok(self)
    }

    pub fn update_profile(&mut self, name: Option<&str>, email: Option<&str>) -> &mut Self {
        if let Some(name) = name {
            self.name = String::from(name);
        }

        if let Some(email) = email {
            self.email = String::from(email);
        }

        self
    }

    pub fn mark_login(&mut self) -> &mut Self {
        self.last_login_at = Local::now().naive_utc();
        self
    }

    pub fn is_active(&self) -> Result<(), UserError> {
        if self.status == UserStatus::Deleted {
            return Err(UserError::UserDeleted);
        }
        Ok(())
    }
}

/// 用户仓储接口
///
/// 依赖反转原则 (DIP) 的体现。定义领域需要的仓储能力，
/// 由基础设施层实现。
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 获取用户总数
    async fn count(&self) -> Result<u64, UserError>;

    /// 根据用户名查找用户
    async fn find_by_username<'a>(&'a self, username: &'a str) -> Result<Option<User>, UserError>;

    /// 根据用户ID查找用户
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError>;

    /// 保存用户（创建或更新）
    async fn save(&self, user: &User) -> Result<(), UserError>;

    /// 删除用户
    async fn delete<'a>(&'a self, username: &'a str) -> Result<(), UserError>;
}
