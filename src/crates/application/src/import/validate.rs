use super::normalize::CleanedPartner;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9][0-9 \-]{6,14}$").unwrap();
}

/// 导入行校验
///
/// 纯函数：返回按规则顺序排列的可读错误信息，不抛错、无副作用。
/// 返回空列表表示"可导入"；调用方不拦截，只把信息记入导入汇总。
pub fn validate(cleaned: &CleanedPartner) -> Vec<String> {
    let mut errors = Vec::new();

    if cleaned.partner_code.is_none() {
        errors.push("partner_id is required".to_string());
    }
    if cleaned.region.is_none() {
        errors.push("region is required".to_string());
    }
    if cleaned.cooperation_status.is_none() {
        errors.push("cooperation_status is required".to_string());
    }
    if let Some(email) = &cleaned.email {
        if !EMAIL_RE.is_match(email) {
            errors.push(format!("invalid email: {}", email));
        }
    }
    if let Some(email) = &cleaned.secondary_email {
        if !EMAIL_RE.is_match(email) {
            errors.push(format!("invalid secondary email: {}", email));
        }
    }
    if let Some(phone) = &cleaned.phone {
        if !PHONE_RE.is_match(phone) {
            errors.push(format!("invalid phone: {}", phone));
        }
    }
    // 目标值大小关系只是业务口径，提示但从不阻断
    if let (Some(car), Some(total)) = (cleaned.car_target, cleaned.total_target) {
        if car > total {
            errors.push(format!("car_target {} exceeds total_target {}", car, total));
        }
    }
    if let (Some(bike), Some(total)) = (cleaned.bike_target, cleaned.total_target) {
        if bike > total {
            errors.push(format!("bike_target {} exceeds total_target {}", bike, total));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::normalize::clean_partner_row;
    use crate::import::RawRow;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn complete_row() -> RawRow {
        row(&[
            ("partner_id", "P-001"),
            ("name", "Speedy Wheels"),
            ("city", "Jaipur"),
            ("region", "North"),
            ("cooperation_status", "Active"),
            ("email", "ops@speedy.example"),
            ("phone", "+91 98765 4321"),
        ])
    }

    #[test]
    fn test_complete_row_has_no_errors() {
        let cleaned = clean_partner_row(&complete_row());
        assert!(validate(&cleaned).is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let cleaned = clean_partner_row(&row(&[("name", "No Key Partner")]));
        let errors = validate(&cleaned);
        assert_eq!(
            errors,
            vec![
                "partner_id is required",
                "region is required",
                "cooperation_status is required",
            ]
        );
    }

    #[test]
    fn test_bad_email_and_phone() {
        let mut pairs = complete_row();
        for (k, v) in pairs.iter_mut() {
            if k == "email" {
                *v = "not-an-email".to_string();
            }
            if k == "phone" {
                *v = "call me".to_string();
            }
        }
        let cleaned = clean_partner_row(&pairs);
        let errors = validate(&cleaned);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("invalid email"));
        assert!(errors[1].contains("invalid phone"));
    }

    #[test]
    fn test_target_overflow_is_reported() {
        let mut pairs = complete_row();
        pairs.push(("car_target".to_string(), "120".to_string()));
        pairs.push(("total_target".to_string(), "100".to_string()));
        let cleaned = clean_partner_row(&pairs);
        let errors = validate(&cleaned);
        assert_eq!(errors, vec!["car_target 120 exceeds total_target 100"]);
    }
}
