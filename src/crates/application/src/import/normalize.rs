use super::RawRow;
use domain::partner::{BusinessStatus, CapacityType, CooperationStatus, PartnerPatch};
use std::collections::BTreeMap;

/// 缺失名称时的占位文本
pub const FALLBACK_NAME: &str = "Unknown Partner";
/// 缺失城市时的占位文本
pub const FALLBACK_CITY: &str = "Location not specified";

/// 规整后的导入行
///
/// name/city/is_active 永不为空：缺失时替换为默认值，并把字段名
/// 记入 defaulted_fields 供导入汇总展示。其余可选字段保持 None，
/// 由上游决定 coalesce 行为。
#[derive(Debug, Clone)]
pub struct CleanedPartner {
    pub partner_code: Option<String>,
    pub name: String,
    pub city: String,
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
    pub is_active: bool,
    /// 未识别的列，键转为小写后原样透传
    pub extra: BTreeMap<String, String>,
    /// 被默认值填充过的字段名
    pub defaulted_fields: Vec<&'static str>,
}

impl CleanedPartner {
    /// 转成领域补丁。name/city/is_active 总是 Some：缺失时的占位值
    /// 会覆盖已有记录，汇总里的 needs_review 已对此标记。
    pub fn to_patch(&self) -> PartnerPatch {
        PartnerPatch {
            name: Some(self.name.clone()),
            city: Some(self.city.clone()),
            region: self.region.clone(),
            business_status: self.business_status,
            cooperation_status: self.cooperation_status,
            capacity_type: self.capacity_type,
            car_target: self.car_target,
            bike_target: self.bike_target,
            total_target: self.total_target,
            email: self.email.clone(),
            secondary_email: self.secondary_email.clone(),
            phone: self.phone.clone(),
            manager_ids: self.manager_ids.clone(),
            is_active: Some(self.is_active),
        }
    }
}

/// 列名归一化："Car target"、"car_target"、"CAR-TARGET" 视为同一列
fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
}

/// 归一化列名 → 规范字段名
fn canonical_field(normalized: &str) -> Option<&'static str> {
    match normalized {
        "partner_id" | "partner_code" => Some("partner_code"),
        "name" | "partner_name" => Some("name"),
        "city" | "location" => Some("city"),
        "region" | "zone" => Some("region"),
        "business_status" | "shop_status" => Some("business_status"),
        "cooperation_status" | "coop_status" => Some("cooperation_status"),
        "capacity_type" => Some("capacity_type"),
        "car_target" => Some("car_target"),
        "bike_target" => Some("bike_target"),
        "total_target" => Some("total_target"),
        "email" | "email_id" => Some("email"),
        "secondary_email" | "alternate_email" => Some("secondary_email"),
        "phone" | "phone_number" | "mobile" => Some("phone"),
        "manager_ids" | "manager_id" | "managers" => Some("manager_ids"),
        "is_active" | "active" => Some("is_active"),
        _ => None,
    }
}

/// 文本清洗：去首尾空白，空串视为缺失
fn clean_string(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 目标值清洗：空串是缺失而不是 0，非数字同样视为缺失
fn parse_target(raw: &str) -> Option<i32> {
    clean_string(raw)?.parse::<i32>().ok()
}

/// 状态类文本转布尔
fn parse_bool_like(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "active" | "true" | "yes" | "1" => Some(true),
        "inactive" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// 列归一化入口
///
/// 对任意列名/取值映射产出规范的导入行。未知列不报错，转小写透传。
/// 必填字段缺失时填入默认值而不是拒绝整行——导入健壮性优先于
/// 严格性，被填充的字段名会记入 defaulted_fields。
pub fn clean_partner_row(row: &RawRow) -> CleanedPartner {
    let mut partner_code = None;
    let mut name: Option<String> = None;
    let mut city: Option<String> = None;
    let mut region = None;
    let mut business_status = None;
    let mut cooperation_status = None;
    let mut capacity_type = None;
    let mut car_target = None;
    let mut bike_target = None;
    let mut total_target = None;
    let mut email = None;
    let mut secondary_email = None;
    let mut phone = None;
    let mut manager_ids = None;
    let mut is_active: Option<bool> = None;
    let mut extra = BTreeMap::new();

    for (header, value) in row {
        let normalized = normalize_header(header);
        match canonical_field(&normalized) {
            Some("partner_code") => partner_code = clean_string(value),
            Some("name") => name = clean_string(value),
            Some("city") => city = clean_string(value),
            Some("region") => region = clean_string(value),
            Some("business_status") => {
                business_status = clean_string(value).and_then(|v| BusinessStatus::parse(&v))
            }
            Some("cooperation_status") => {
                cooperation_status =
                    clean_string(value).and_then(|v| CooperationStatus::parse(&v))
            }
            Some("capacity_type") => {
                capacity_type = clean_string(value).and_then(|v| CapacityType::parse(&v))
            }
            Some("car_target") => car_target = parse_target(value),
            Some("bike_target") => bike_target = parse_target(value),
            Some("total_target") => total_target = parse_target(value),
            Some("email") => email = clean_string(value),
            Some("secondary_email") => secondary_email = clean_string(value),
            Some("phone") => phone = clean_string(value),
            Some("manager_ids") => manager_ids = clean_string(value),
            Some("is_active") => is_active = parse_bool_like(value),
            _ => {
                // 未知列：列名转小写，取值不做任何加工
                extra.insert(header.to_lowercase(), value.clone());
            }
        }
    }

    let mut defaulted_fields = Vec::new();
    let name = name.unwrap_or_else(|| {
        defaulted_fields.push("name");
        FALLBACK_NAME.to_string()
    });
    let city = city.unwrap_or_else(|| {
        defaulted_fields.push("city");
        FALLBACK_CITY.to_string()
    });
    let is_active = is_active.unwrap_or_else(|| {
        defaulted_fields.push("is_active");
        true
    });

    CleanedPartner {
        partner_code,
        name,
        city,
        region,
        business_status,
        cooperation_status,
        capacity_type,
        car_target,
        bike_target,
        total_target,
        email,
        secondary_email,
        phone,
        manager_ids,
        is_active,
        extra,
        defaulted_fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_target_string_coercion() {
        let cleaned = clean_partner_row(&row(&[("Car target", "75")]));
        assert_eq!(cleaned.car_target, Some(75));
    }

    #[test]
    fn test_empty_target_is_none_not_zero() {
        let cleaned = clean_partner_row(&row(&[("car_target", "")]));
        assert_eq!(cleaned.car_target, None);

        let cleaned = clean_partner_row(&row(&[("bike_target", "not-a-number")]));
        assert_eq!(cleaned.bike_target, None);
    }

    #[test]
    fn test_required_fields_never_missing() {
        // 任意输入下 name/city 都有值
        let cleaned = clean_partner_row(&row(&[]));
        assert_eq!(cleaned.name, FALLBACK_NAME);
        assert_eq!(cleaned.city, FALLBACK_CITY);
        assert!(cleaned.is_active);
        assert_eq!(
            cleaned.defaulted_fields,
            vec!["name", "city", "is_active"]
        );
    }

    #[test]
    fn test_header_aliases() {
        let cleaned = clean_partner_row(&row(&[
            ("Partner ID", " P-042 "),
            ("PARTNER-NAME", "快马装配"),
            ("Location", "Pune"),
            ("COOPERATION STATUS", "suspended"),
        ]));
        assert_eq!(cleaned.partner_code.as_deref(), Some("P-042"));
        assert_eq!(cleaned.name, "快马装配");
        assert_eq!(cleaned.city, "Pune");
        assert_eq!(
            cleaned.cooperation_status,
            Some(CooperationStatus::Suspended)
        );
        // is_active 列没出现，按默认 true 填充并记录
        assert_eq!(cleaned.defaulted_fields, vec!["is_active"]);
    }

    #[test]
    fn test_unknown_columns_pass_through_lowercased() {
        let cleaned = clean_partner_row(&row(&[("Fleet Color", "Blue ")]));
        assert_eq!(cleaned.extra.get("fleet color").map(String::as_str), Some("Blue "));
    }

    #[test]
    fn test_is_active_parsing() {
        let cleaned = clean_partner_row(&row(&[("Active", "Inactive")]));
        assert!(!cleaned.is_active);
        let cleaned = clean_partner_row(&row(&[("is_active", "yes")]));
        assert!(cleaned.is_active);
        // 无法识别的取值按缺失处理，回落为 true
        let cleaned = clean_partner_row(&row(&[("is_active", "maybe")]));
        assert!(cleaned.is_active);
        assert_eq!(cleaned.defaulted_fields, vec!["is_active"]);
    }
}
