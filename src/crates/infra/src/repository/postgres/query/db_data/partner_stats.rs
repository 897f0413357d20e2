use model::partner_stats::RegionCount;
use sea_orm::FromQueryResult;

/// 全表聚合的一行结果
#[derive(FromQueryResult, Debug)]
pub struct StatsTotalsModel {
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
}

#[derive(FromQueryResult, Debug)]
pub struct RegionCountModel {
    pub region: String,
    pub partner_count: i64,
}

impl From<RegionCountModel> for RegionCount {
    fn from(model: RegionCountModel) -> Self {
        Self {
            region: model.region,
            partner_count: model.partner_count,
        }
    }
}
