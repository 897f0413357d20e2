use crate::query::dao::{PartnerDao, PartnerStatsDao};
use crate::query::QueryError;
use log::warn;
use model::partner_stats::{DashboardStats, RegionCount};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 看板统计查询
///
/// 主路径走数据库聚合；聚合查询失败时退化为全量拉取 + 内存折算，
/// 保证看板在聚合视图不可用时仍有数字可看。
#[derive(Clone)]
pub struct GetDashboardStats {
    stats_dao: Arc<dyn PartnerStatsDao>,
    partner_dao: Arc<dyn PartnerDao>,
}

impl GetDashboardStats {
    pub fn new(stats_dao: Arc<dyn PartnerStatsDao>, partner_dao: Arc<dyn PartnerDao>) -> Self {
        Self {
            stats_dao,
            partner_dao,
        }
    }

    pub async fn handle(&self) -> Result<DashboardStats, QueryError> {
        match self.stats_dao.get_stats().await {
            Ok(stats) => Ok(stats),
            Err(e) => {
                warn!("stats aggregate failed, falling back to full scan: {}", e);
                self.fold_from_list().await
            }
        }
    }

    /// 降级路径：全量读出后在内存里聚合
    async fn fold_from_list(&self) -> Result<DashboardStats, QueryError> {
        let partners = self.partner_dao.get_all().await?;
        let mut stats = DashboardStats::default();
        let mut regions: BTreeMap<String, i64> = BTreeMap::new();

        for p in &partners {
            stats.total_partners += 1;
            match p.business_status.as_str() {
                "Open" => stats.open_count += 1,
                "Close" => stats.closed_count += 1,
                _ => {}
            }
            match p.cooperation_status.as_str() {
                "Active" => stats.active_count += 1,
                "Inactive" => stats.inactive_count += 1,
                "Pending" => stats.pending_count += 1,
                "Suspended" => stats.suspended_count += 1,
                _ => {}
            }
            if p.is_active {
                stats.enabled_count += 1;
            }
            stats.car_target_sum += p.car_target as i64;
            stats.bike_target_sum += p.bike_target as i64;
            stats.total_target_sum += p.total_target as i64;
            if let Some(region) = &p.region {
                *regions.entry(region.clone()).or_default() += 1;
            }
        }

        stats.regions = regions
            .into_iter()
            .map(|(region, partner_count)| RegionCount {
                region,
                partner_count,
            })
            .collect();
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::dao::PartnerFilter;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use model::partner::{PartnerPage, PartnerRecord};

    struct BrokenStatsDao;

    #[async_trait]
    impl PartnerStatsDao for BrokenStatsDao {
        async fn get_stats(&self) -> Result<DashboardStats, QueryError> {
            Err(QueryError::DbError("aggregate view missing".to_string()))
        }
    }

    struct FixedPartnerDao(Vec<PartnerRecord>);

    #[async_trait]
    impl PartnerDao for FixedPartnerDao {
        async fn get_by_id(&self, _id: i64) -> Result<Option<PartnerRecord>, QueryError> {
            Ok(None)
        }

        async fn list(
            &self,
            _filter: &PartnerFilter,
            _page_size: u64,
            _page_num: u64,
        ) -> Result<PartnerPage, QueryError> {
            unimplemented!()
        }

        async fn get_all(&self) -> Result<Vec<PartnerRecord>, QueryError> {
            Ok(self.0.clone())
        }
    }

    fn record(region: &str, cooperation: &str, car: i32) -> PartnerRecord {
        PartnerRecord {
            id: 1,
            partner_code: "P-001".to_string(),
            name: "x".to_string(),
            city: "y".to_string(),
            region: Some(region.to_string()),
            business_status: "Open".to_string(),
            cooperation_status: cooperation.to_string(),
            capacity_type: "Mixed".to_string(),
            car_target: car,
            bike_target: 50,
            total_target: 100,
            email: None,
            secondary_email: None,
            phone: None,
            manager_ids: None,
            is_active: true,
            updated_at: DateTime::<Utc>::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    #[tokio::test]
    async fn test_fallback_folds_stats_in_memory() {
        let svc = GetDashboardStats::new(
            Arc::new(BrokenStatsDao),
            Arc::new(FixedPartnerDao(vec![
                record("North", "Active", 60),
                record("North", "Pending", 40),
                record("South", "Active", 50),
            ])),
        );

        let stats = svc.handle().await.unwrap();
        assert_eq!(stats.total_partners, 3);
        assert_eq!(stats.open_count, 3);
        assert_eq!(stats.active_count, 2);
        assert_eq!(stats.pending_count, 1);
        assert_eq!(stats.car_target_sum, 150);
        assert_eq!(stats.regions.len(), 2);
        assert_eq!(stats.regions[0].region, "North");
        assert_eq!(stats.regions[0].partner_count, 2);
    }
}
