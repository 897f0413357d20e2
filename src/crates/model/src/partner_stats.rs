use serde::Serialize;

/// 按大区统计的合作伙伴数量
#[derive(Debug, Clone, Serialize)]
pub struct RegionCount {
    pub region: String,
    pub partner_count: i64,
}

/// 看板统计读模型
///
/// 首页看板一次性展示的聚合数字。主路径由数据库聚合查询产出，
/// 聚合查询失败时由全量列表在内存中折算（降级路径）。
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    pub total_partners: i64,
    pub open_count: i64,
    pub closed_count: i64,
    pub active_count: i64,
    pub inactive_count: i64,
    pub pending_count: i64,
    pub suspended_count: i64,
    pub enabled_count: i64,
    pub car_target_sum: i64,
    pub bike_target_sum: i64,
    pub total_target_sum: i64,
    pub regions: Vec<RegionCount>,
}
