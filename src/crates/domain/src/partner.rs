use super::value::PartnerId;
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use thiserror::Error;

/// 默认四轮运力目标
pub const DEFAULT_CAR_TARGET: i32 = 50;
/// 默认两轮运力目标
pub const DEFAULT_BIKE_TARGET: i32 = 50;
/// 默认总运力目标
pub const DEFAULT_TOTAL_TARGET: i32 = 100;

/// 合作伙伴领域错误
///
/// 合作伙伴领域中可能发生的所有错误类型。
#[derive(Error, Debug)]
pub enum PartnerError {
    #[error("partner not found: {0}")]
    PartnerNotFound(String),
    #[error("partner code already exists: {0}")]
    DuplicateCode(String),
    #[error("version conflict: {0}")]
    VersionConflictErr(i64),
    #[error("invalid status value: {0}")]
    InvalidStatus(String),
    #[error("{0}")]
    DbErr(String),
    #[error("{0}")]
    OtherErr(String),
}

/// 营业状态：门店是否开门营业
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum BusinessStatus {
    Open = 1,
    Close = 2,
}

impl From<BusinessStatus> for i32 {
    fn from(value: BusinessStatus) -> Self {
        value as i32
    }
}

impl TryFrom<i32> for BusinessStatus {
    type Error = String;
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(BusinessStatus::Open),
            2 => Ok(BusinessStatus::Close),
            _ => Err(format!("invalid value:{}", value)),
        }
    }
}

impl BusinessStatus {
    /// 解析表格里的状态文本，大小写不敏感
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "open" => Some(BusinessStatus::Open),
            "close" | "closed" => Some(BusinessStatus::Close),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessStatus::Open => "Open",
            BusinessStatus::Close => "Close",
        }
    }
}

/// 合作状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CooperationStatus {
    Active = 1,
    Inactive = 2,
    Pending = 3,
    Suspended = 4,
}

impl From<CooperationStatus> for i32 {
    fn from(value: CooperationStatus) -> Self {
        value as i32
    }
}

impl TryFrom<i32> for CooperationStatus {
    type Error = String;
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CooperationStatus::Active),
            2 => Ok(CooperationStatus::Inactive),
            3 => Ok(CooperationStatus::Pending),
            4 => Ok(CooperationStatus::Suspended),
            _ => Err(format!("invalid value:{}", value)),
        }
    }
}

impl CooperationStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "active" => Some(CooperationStatus::Active),
            "inactive" => Some(CooperationStatus::Inactive),
            "pending" => Some(CooperationStatus::Pending),
            "suspended" => Some(CooperationStatus::Suspended),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CooperationStatus::Active => "Active",
            CooperationStatus::Inactive => "Inactive",
            CooperationStatus::Pending => "Pending",
            CooperationStatus::Suspended => "Suspended",
        }
    }
}

/// 运力类型：两轮、四轮或混合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CapacityType {
    Car = 1,
    Bike = 2,
    Mixed = 3,
}

impl From<CapacityType> for i32 {
    fn from(value: CapacityType) -> Self {
        value as i32
    }
}

impl TryFrom<i32> for CapacityType {
    type Error = String;
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CapacityType::Car),
            2 => Ok(CapacityType::Bike),
            3 => Ok(CapacityType::Mixed),
            _ => Err(format!("invalid value:{}", value)),
        }
    }
}

impl CapacityType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "car" | "4w" => Some(CapacityType::Car),
            "bike" | "2w" => Some(CapacityType::Bike),
            "mixed" | "both" => Some(CapacityType::Mixed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityType::Car => "Car",
            CapacityType::Bike => "Bike",
            CapacityType::Mixed => "Mixed",
        }
    }
}

/// 合作伙伴字段补丁
///
/// 表格导入或编辑表单产生的一组可选字段。None 表示"本次没有提供"，
/// 应用到已有记录时保留旧值（coalesce 语义）。
#[derive(Debug, Clone, Default)]
pub struct PartnerPatch {
    pub name: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub business_status: Option<BusinessStatus>,
    pub cooperation_status: Option<CooperationStatus>,
    pub capacity_type: Option<CapacityType>,
    pub car_target: Option<i32>,
    pub bike_target: Option<i32>,
    pub total_target: Option<i32>,
    pub email: Option<String>,
    pub secondary_email: Option<String>,
    pub phone: Option<String>,
    pub manager_ids: Option<String>,
    pub is_active: Option<bool>,
}

/// 合作伙伴聚合根
///
/// 合作伙伴是车队运营中的核心聚合根，代表一个承接装配/配送业务的
/// 线下实体，带有运力目标和多个状态字段。业务键为 partner_code，
/// 由表格上传方提供；内部主键为雪花 ID。
#[derive(Debug, Clone)]
pub struct Partner {
    pub id: PartnerId,                         // 内部唯一标识
    pub partner_code: String,                  // 业务键，唯一
    pub name: String,                          // 名称，永不为空
    pub city: String,                          // 城市，永不为空
    pub region: Option<String>,                // 大区
    pub business_status: BusinessStatus,       // 营业状态
    pub cooperation_status: CooperationStatus, // 合作状态
    pub capacity_type: CapacityType,           // 运力类型
    pub car_target: i32,                       // 四轮目标
    pub bike_target: i32,                      // 两轮目标
    pub total_target: i32,                     // 总目标
    pub email: Option<String>,                 // 联系邮箱
    pub secondary_email: Option<String>,       // 备用邮箱
    pub phone: Option<String>,                 // 联系电话
    pub manager_ids: Option<String>,           // 负责人ID列表，自由文本
    pub is_active: bool,                       // 是否启用
    pub version: i64,                          // 当前版本，用于乐观锁
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Partner {
    /// 以默认目标值 50/50/100 创建新的合作伙伴
    pub fn new(id: PartnerId, partner_code: &str, name: &str, city: &str) -> Self {
        let now = Local::now().naive_utc();
        Partner {
            id,
            partner_code: String::from(partner_code),
            name: String::from(name),
            city: String::from(city),
            region: None,
            business_status: BusinessStatus::Open,
            cooperation_status: CooperationStatus::Pending,
            capacity_type: CapacityType::Mixed,
            car_target: DEFAULT_CAR_TARGET,
            bike_target: DEFAULT_BIKE_TARGET,
            total_target: DEFAULT_TOTAL_TARGET,
            email: None,
            secondary_email: None,
            phone: None,
            manager_ids: None,
            is_active: true,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// 应用字段补丁，None 字段保留现值
    ///
    /// 注意 car_target/bike_target 与 total_target 之间的大小关系
    /// 只是业务口径，不在这里做约束检查。
    pub fn apply_patch(&mut self, patch: &PartnerPatch) -> &mut Self {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(city) = &patch.city {
            self.city = city.clone();
        }
        if patch.region.is_some() {
            self.region = patch.region.clone();
        }
        if let Some(status) = patch.business_status {
            self.business_status = status;
        }
        if let Some(status) = patch.cooperation_status {
            self.cooperation_status = status;
        }
        if let Some(capacity) = patch.capacity_type {
            self.capacity_type = capacity;
        }
        if let Some(target) = patch.car_target {
            self.car_target = target;
        }
        if let Some(target) = patch.bike_target {
            self.bike_target = target;
        }
        if let Some(target) = patch.total_target {
            self.total_target = target;
        }
        if patch.email.is_some() {
            self.email = patch.email.clone();
        }
        if patch.secondary_email.is_some() {
            self.secondary_email = patch.secondary_email.clone();
        }
        if patch.phone.is_some() {
            self.phone = patch.phone.clone();
        }
        if patch.manager_ids.is_some() {
            self.manager_ids = patch.manager_ids.clone();
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Local::now().naive_utc();
        self
    }
}

/// 合作伙伴仓储接口
///
/// 依赖反转原则 (DIP) 的体现。定义领域需要的仓储能力，
/// 由基础设施层实现。"未找到"返回 Ok(None)，与查询错误严格区分。
#[async_trait]
pub trait PartnerRepository: Send + Sync {
    /// 获取合作伙伴总数
    async fn count(&self) -> Result<u64, PartnerError>;

    /// 根据内部ID查找
    async fn find_by_id(&self, id: PartnerId) -> Result<Option<Partner>, PartnerError>;

    /// 根据业务键查找
    async fn find_by_code<'a>(&'a self, code: &'a str) -> Result<Option<Partner>, PartnerError>;

    /// 根据名称查找（业务键缺失时的兜底匹配）
    async fn find_by_name<'a>(&'a self, name: &'a str) -> Result<Option<Partner>, PartnerError>;

    /// 保存合作伙伴（创建或更新）
    async fn save(&self, partner: &Partner) -> Result<(), PartnerError>;

    /// 删除单个合作伙伴
    async fn delete(&self, id: PartnerId) -> Result<(), PartnerError>;

    /// 删除全部合作伙伴，返回删除行数
    async fn delete_all(&self) -> Result<u64, PartnerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_partner_defaults() {
        let p = Partner::new(PartnerId::from(1), "P-001", "北方装配点", "Tianjin");
        assert_eq!(p.car_target, 50);
        assert_eq!(p.bike_target, 50);
        assert_eq!(p.total_target, 100);
        assert!(p.is_active);
        assert_eq!(p.version, 0);
    }

    #[test]
    fn test_apply_patch_coalesce() {
        let mut p = Partner::new(PartnerId::from(1), "P-001", "Old Name", "Old City");
        p.email = Some("old@example.com".to_string());

        let patch = PartnerPatch {
            name: Some("New Name".to_string()),
            car_target: Some(75),
            ..Default::default()
        };
        p.apply_patch(&patch);

        assert_eq!(p.name, "New Name");
        assert_eq!(p.car_target, 75);
        // 补丁中缺失的字段保留旧值
        assert_eq!(p.city, "Old City");
        assert_eq!(p.email.as_deref(), Some("old@example.com"));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(BusinessStatus::parse("Open"), Some(BusinessStatus::Open));
        assert_eq!(BusinessStatus::parse(" closed "), Some(BusinessStatus::Close));
        assert_eq!(BusinessStatus::parse("何か"), None);
        assert_eq!(
            CooperationStatus::parse("SUSPENDED"),
            Some(CooperationStatus::Suspended)
        );
        assert_eq!(CapacityType::parse("both"), Some(CapacityType::Mixed));
    }

    #[test]
    fn test_status_roundtrip_i32() {
        for status in [
            CooperationStatus::Active,
            CooperationStatus::Inactive,
            CooperationStatus::Pending,
            CooperationStatus::Suspended,
        ] {
            let v: i32 = status.into();
            assert_eq!(CooperationStatus::try_from(v).unwrap(), status);
        }
        assert!(CooperationStatus::try_from(99).is_err());
    }
}
