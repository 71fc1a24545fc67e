//! Display masking for transaction listings.

/// Mask an email address for display in transaction tables.
///
/// `abcdef@gmail.com` -> `abc***@gm...m.com`-style output; inputs without
/// an `@` are returned untouched.
pub fn mask_email(email: &str) -> String {
    let Some((local, domain)) = email.split_once('@') else {
        return email.to_string();
    };

    let masked_local = if local.len() > 3 {
        format!("{}***", &local[..3])
    } else {
        format!("{}***", local)
    };

    let masked_domain = match domain.rsplit_once('.') {
        Some((main, tld)) => {
            let masked_main = if main.len() > 3 {
                format!("{}...{}", &main[..2], &main[main.len() - 1..])
            } else {
                main.to_string()
            };
            format!("{}.{}", masked_main, tld)
        }
        None => {
            if domain.len() > 4 {
                format!("{}...{}", &domain[..2], &domain[domain.len() - 2..])
            } else {
                domain.to_string()
            }
        }
    };

    format!("{}@{}", masked_local, masked_domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_regular_email() {
        let masked = mask_email("abcdef@gmail.com");
        assert!(masked.starts_with("abc***@"));
        assert!(masked.ends_with(".com"));
        assert!(!masked.contains("abcdef"));
    }

    #[test]
    fn test_mask_short_local_part() {
        let masked = mask_email("ab@x.io");
        assert!(masked.starts_with("ab***@"));
    }

    #[test]
    fn test_non_email_passthrough() {
        assert_eq!(mask_email("not-an-email"), "not-an-email");
        assert_eq!(mask_email(""), "");
    }
}
