use crate::query::QueryError;
use async_trait::async_trait;
use model::partner::{PartnerPage, PartnerRecord};
use model::partner_stats::DashboardStats;

/// 列表过滤条件，全部可选
#[derive(Debug, Clone, Default)]
pub struct PartnerFilter {
    pub region: Option<String>,
    pub cooperation_status: Option<i32>,
    pub business_status: Option<i32>,
    pub is_active: Option<bool>,
    /// 模糊匹配 name/city/partner_code
    pub q: Option<String>,
}

#[async_trait]
pub trait PartnerDao: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Option<PartnerRecord>, QueryError>;
    /// 分页查询，page_num 从 0 开始
    async fn list(
        &self,
        filter: &PartnerFilter,
        page_size: u64,
        page_num: u64,
    ) -> Result<PartnerPage, QueryError>;
    /// 全量拉取，仅供统计降级路径使用
    async fn get_all(&self) -> Result<Vec<PartnerRecord>, QueryError>;
}

#[async_trait]
pub trait PartnerStatsDao: Send + Sync {
    /// 一次数据库聚合出全部看板数字
    async fn get_stats(&self) -> Result<DashboardStats, QueryError>;
}
