pub mod mask;
pub mod password;

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    // 随机选择字母和数字
    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    // 生成指定长度的随机字符串
    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// 生成推荐码（8 位大写）
pub fn generate_referral_code() -> String {
    generate_random_code(8).to_uppercase()
}

/// Ledger / provider reference, e.g. `TX-9f2c1b3a8d4e`.
pub fn generate_reference(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

/// 数字商品授权码（16 位大写）
pub fn generate_license_key() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    id[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_code_length() {
        for len in [1, 6, 8, 32] {
            assert_eq!(generate_random_code(len).len(), len);
        }
    }

    #[test]
    fn test_referral_code_is_uppercase() {
        let code = generate_referral_code();
        assert_eq!(code.len(), 8);
        assert_eq!(code, code.to_uppercase());
    }

    #[test]
    fn test_reference_carries_prefix() {
        let reference = generate_reference("TX");
        assert!(reference.starts_with("TX-"));
        assert!(reference.len() > 10);
    }

    #[test]
    fn test_license_key_format() {
        let key = generate_license_key();
        assert_eq!(key.len(), 16);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_references_are_unique() {
        let a = generate_reference("TX");
        let b = generate_reference("TX");
        assert_ne!(a, b);
    }
}
