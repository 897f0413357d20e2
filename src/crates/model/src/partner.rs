use chrono::NaiveDateTime;
use serde::Serialize;

/// 合作伙伴读模型，用于列表与详情响应
#[derive(Debug, Clone, Serialize)]
pub struct PartnerRecord {
    pub id: i64,
    pub partner_code: String,
    pub name: String,
    pub city: String,
    pub region: Option<String>,
    pub business_status: String,
    pub cooperation_status: String,
    pub capacity_type: String,
    pub car_target: i32,
    pub bike_target: i32,
    pub total_target: i32,
    pub email: Option<String>,
    pub secondary_email: Option<String>,
    pub phone: Option<String>,
    pub manager_ids: Option<String>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

/// 分页结果
#[derive(Debug, Clone, Serialize)]
pub struct PartnerPage {
    pub items: Vec<PartnerRecord>,
    pub total: u64,
    pub page_num: u64,
    pub page_size: u64,
}
