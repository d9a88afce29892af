//! 业务编号生成

use rand::Rng;

use super::time::compact_date;

/// 8-char id for embedded sub-documents (cart lines, variants)
pub fn short_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// `ORD-YYYYMMDD-XXXX` (4 random uppercase hex digits)
pub fn order_number(now_millis: i64) -> String {
    let suffix: u16 = rand::thread_rng().r#gen();
    format!("ORD-{}-{:04X}", compact_date(now_millis), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_format() {
        // 2025-03-01T10:00:00Z
        let n = order_number(1_740_823_200_000);
        assert!(n.starts_with("ORD-20250301-"), "{n}");
        let suffix = &n["ORD-20250301-".len()..];
        assert_eq!(suffix.len(), 4);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn test_short_id() {
        let a = short_id();
        assert_eq!(a.len(), 8);
        assert_ne!(a, short_id());
    }
}
