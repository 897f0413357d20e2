use super::normalize::{clean_partner_row, CleanedPartner};
use super::validate::validate;
use super::RawRow;
use crate::command::shared::IdGenerator;
use crate::error::AppError;
use domain::partner::{Partner, PartnerRepository};
use domain::value::PartnerId;
use log::{info, warn};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 导入取消标记
///
/// 在行与行之间检查。置位后剩余行全部记为 skipped，当前行不中断。
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// 新一轮导入开始前复位
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 单行问题记录，row 从 1 开始计（与表格行号对应，不含表头）
#[derive(Debug, Clone, Serialize)]
pub struct RowIssue {
    pub row: usize,
    pub messages: Vec<String>,
}

/// 导入汇总，直接序列化给前端展示
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub skipped: usize,
    /// 校验警告，不阻断导入
    pub warnings: Vec<RowIssue>,
    /// 被默认值填充过的行，提示运营复核
    pub needs_review: Vec<RowIssue>,
}

/// 表格导入应用服务
///
/// 行与行严格串行处理：单次人工触发、量级在几百行以内，
/// 不做批量合并写入。单行失败只累计计数，整批从不中止。
pub struct PartnerImportService {
    partner_repo: Arc<dyn PartnerRepository>,
    id_generator: Arc<dyn IdGenerator>,
    max_rows: usize,
}

impl PartnerImportService {
    pub fn new(
        partner_repo: Arc<dyn PartnerRepository>,
        id_generator: Arc<dyn IdGenerator>,
        max_rows: usize,
    ) -> Self {
        Self {
            partner_repo,
            id_generator,
            max_rows,
        }
    }

    /// 逐行规整、校验并 upsert
    pub async fn import(
        &self,
        rows: &[RawRow],
        cancel: &CancelFlag,
    ) -> Result<ImportSummary, AppError> {
        if rows.len() > self.max_rows {
            return Err(AppError::ImportError(format!(
                "too many rows: {} (limit {})",
                rows.len(),
                self.max_rows
            )));
        }

        let mut summary = ImportSummary {
            total: rows.len(),
            ..Default::default()
        };

        for (index, raw) in rows.iter().enumerate() {
            if cancel.is_cancelled() {
                summary.skipped = rows.len() - index;
                warn!("partner import cancelled, {} rows skipped", summary.skipped);
                break;
            }

            let row_no = index + 1;
            let cleaned = clean_partner_row(raw);

            let issues = validate(&cleaned);
            if !issues.is_empty() {
                // 校验只告警，不拦截
                summary.warnings.push(RowIssue {
                    row: row_no,
                    messages: issues,
                });
            }
            if !cleaned.defaulted_fields.is_empty() {
                summary.needs_review.push(RowIssue {
                    row: row_no,
                    messages: cleaned
                        .defaulted_fields
                        .iter()
                        .map(|f| f.to_string())
                        .collect(),
                });
            }

            // 查询出错（区别于"未找到"）只影响当前行
            let existing = match self.lookup(&cleaned).await {
                Ok(existing) => existing,
                Err(e) => {
                    warn!("row {}: lookup failed: {}", row_no, e);
                    summary.failed += 1;
                    continue;
                }
            };

            let outcome = match existing {
                Some(partner) => self.update_existing(partner, &cleaned).await,
                None => self.insert_new(&cleaned).await,
            };
            match outcome {
                Ok(true) => summary.created += 1,
                Ok(false) => summary.updated += 1,
                Err(e) => {
                    warn!("row {}: save failed: {}", row_no, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "partner import finished: total={} created={} updated={} failed={} skipped={}",
            summary.total, summary.created, summary.updated, summary.failed, summary.skipped
        );
        Ok(summary)
    }

    /// 先按业务键查找，再按名称兜底
    async fn lookup(&self, cleaned: &CleanedPartner) -> Result<Option<Partner>, AppError> {
        if let Some(code) = &cleaned.partner_code {
            if let Some(partner) = self.partner_repo.find_by_code(code).await? {
                return Ok(Some(partner));
            }
        }
        Ok(self.partner_repo.find_by_name(&cleaned.name).await?)
    }

    /// 更新已有记录，返回 Ok(false) 表示 updated
    async fn update_existing(
        &self,
        mut partner: Partner,
        cleaned: &CleanedPartner,
    ) -> Result<bool, AppError> {
        if let Some(code) = &cleaned.partner_code {
            partner.partner_code = code.clone();
        }
        partner.apply_patch(&cleaned.to_patch());
        self.partner_repo.save(&partner).await?;
        Ok(false)
    }

    /// 插入新记录，返回 Ok(true) 表示 created
    async fn insert_new(&self, cleaned: &CleanedPartner) -> Result<bool, AppError> {
        let id = self.id_generator.next_id().await?;
        // 业务键缺失时派生一个，保证唯一约束；校验环节已对缺失告警
        let code = cleaned
            .partner_code
            .clone()
            .unwrap_or_else(|| format!("AUTO-{}", id));
        let mut partner = Partner::new(PartnerId::from(id), &code, &cleaned.name, &cleaned.city);
        partner.apply_patch(&cleaned.to_patch());
        self.partner_repo.save(&partner).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain::partner::PartnerError;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicI64;
    use std::sync::Mutex;

    /// 内存仓储：以业务键为主索引，可注入指定业务键上的查询故障
    #[derive(Default)]
    struct MemPartnerRepo {
        by_code: Mutex<HashMap<String, Partner>>,
        fail_lookup_code: Option<String>,
    }

    impl MemPartnerRepo {
        fn with_failure(code: &str) -> Self {
            Self {
                fail_lookup_code: Some(code.to_string()),
                ..Default::default()
            }
        }

        fn get(&self, code: &str) -> Option<Partner> {
            self.by_code.lock().unwrap().get(code).cloned()
        }
    }

    #[async_trait]
    impl PartnerRepository for MemPartnerRepo {
        async fn count(&self) -> Result<u64, PartnerError> {
            Ok(self.by_code.lock().unwrap().len() as u64)
        }

        async fn find_by_id(&self, id: PartnerId) -> Result<Option<Partner>, PartnerError> {
            Ok(self
                .by_code
                .lock()
                .unwrap()
                .values()
                .find(|p| p.id == id)
                .cloned())
        }

        async fn find_by_code<'a>(
            &'a self,
            code: &'a str,
        ) -> Result<Option<Partner>, PartnerError> {
            if self.fail_lookup_code.as_deref() == Some(code) {
                return Err(PartnerError::DbErr("connection reset".to_string()));
            }
            Ok(self.by_code.lock().unwrap().get(code).cloned())
        }

        async fn find_by_name<'a>(
            &'a self,
            name: &'a str,
        ) -> Result<Option<Partner>, PartnerError> {
            Ok(self
                .by_code
                .lock()
                .unwrap()
                .values()
                .find(|p| p.name == name)
                .cloned())
        }

        async fn save(&self, partner: &Partner) -> Result<(), PartnerError> {
            self.by_code
                .lock()
                .unwrap()
                .insert(partner.partner_code.clone(), partner.clone());
            Ok(())
        }

        async fn delete(&self, id: PartnerId) -> Result<(), PartnerError> {
            self.by_code
                .lock()
                .unwrap()
                .retain(|_, p| p.id != id);
            Ok(())
        }

        async fn delete_all(&self) -> Result<u64, PartnerError> {
            let mut map = self.by_code.lock().unwrap();
            let n = map.len() as u64;
            map.clear();
            Ok(n)
        }
    }

    struct SeqIdGenerator(AtomicI64);

    #[async_trait]
    impl IdGenerator for SeqIdGenerator {
        async fn next_id(&self) -> Result<i64, AppError> {
            Ok(self.0.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    fn service(repo: Arc<MemPartnerRepo>) -> PartnerImportService {
        PartnerImportService::new(repo, Arc::new(SeqIdGenerator(AtomicI64::new(0))), 1000)
    }

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_row(code: &str, name: &str) -> RawRow {
        row(&[
            ("partner_id", code),
            ("name", name),
            ("city", "Indore"),
            ("region", "Central"),
            ("cooperation_status", "Active"),
            ("car_target", "60"),
        ])
    }

    #[tokio::test]
    async fn test_one_update_one_insert() {
        let repo = Arc::new(MemPartnerRepo::default());
        let svc = service(repo.clone());

        // 预置一条记录，再导入两行：一行命中业务键，一行全新
        let existing = Partner::new(PartnerId::from(99), "P-001", "Old Name", "Old City");
        repo.save(&existing).await.unwrap();

        let rows = vec![full_row("P-001", "New Name"), full_row("P-002", "Fresh")];
        let summary = svc.import(&rows, &CancelFlag::new()).await.unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.failed, 0);

        let updated = repo.get("P-001").unwrap();
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.car_target, 60);
        // 命中更新时保留内部ID
        assert_eq!(updated.id, PartnerId::from(99));
    }

    #[tokio::test]
    async fn test_lookup_failure_does_not_halt_batch() {
        let repo = Arc::new(MemPartnerRepo::with_failure("P-BAD"));
        let svc = service(repo.clone());

        let rows = vec![full_row("P-BAD", "Broken"), full_row("P-OK", "Fine")];
        let summary = svc.import(&rows, &CancelFlag::new()).await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.created, 1);
        assert!(repo.get("P-OK").is_some());
    }

    #[tokio::test]
    async fn test_reimport_is_idempotent() {
        let repo = Arc::new(MemPartnerRepo::default());
        let svc = service(repo.clone());
        let rows = vec![full_row("P-001", "One"), full_row("P-002", "Two")];

        let first = svc.import(&rows, &CancelFlag::new()).await.unwrap();
        assert_eq!(first.created, 2);
        assert_eq!(first.updated, 0);

        // 第二次导入同一份文件：全部按业务键命中
        let second = svc.import(&rows, &CancelFlag::new()).await.unwrap();
        assert_eq!(second.created, 0);
        assert_eq!(second.updated, 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_cancel_skips_remaining_rows() {
        let repo = Arc::new(MemPartnerRepo::default());
        let svc = service(repo.clone());
        let cancel = CancelFlag::new();
        cancel.cancel();

        let rows = vec![full_row("P-001", "One"), full_row("P-002", "Two")];
        let summary = svc.import(&rows, &cancel).await.unwrap();

        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.created, 0);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_validation_warns_but_imports() {
        let repo = Arc::new(MemPartnerRepo::default());
        let svc = service(repo.clone());

        // region 缺失：产生警告，但行仍然入库
        let rows = vec![row(&[
            ("partner_id", "P-010"),
            ("name", "Warned"),
            ("city", "Surat"),
            ("cooperation_status", "Pending"),
        ])];
        let summary = svc.import(&rows, &CancelFlag::new()).await.unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.warnings.len(), 1);
        assert_eq!(summary.warnings[0].row, 1);
        assert_eq!(summary.warnings[0].messages, vec!["region is required"]);
    }

    #[tokio::test]
    async fn test_missing_targets_get_defaults() {
        let repo = Arc::new(MemPartnerRepo::default());
        let svc = service(repo.clone());

        let rows = vec![row(&[
            ("partner_id", "P-020"),
            ("name", "Defaulted"),
            ("city", "Bhopal"),
            ("region", "Central"),
            ("cooperation_status", "Active"),
        ])];
        svc.import(&rows, &CancelFlag::new()).await.unwrap();

        let saved = repo.get("P-020").unwrap();
        assert_eq!(saved.car_target, 50);
        assert_eq!(saved.bike_target, 50);
        assert_eq!(saved.total_target, 100);
    }

    #[tokio::test]
    async fn test_row_cap_rejected() {
        let repo = Arc::new(MemPartnerRepo::default());
        let svc = PartnerImportService::new(
            repo,
            Arc::new(SeqIdGenerator(AtomicI64::new(0))),
            1,
        );
        let rows = vec![full_row("P-001", "One"), full_row("P-002", "Two")];
        let err = svc.import(&rows, &CancelFlag::new()).await.unwrap_err();
        assert!(matches!(err, AppError::ImportError(_)));
    }
}
