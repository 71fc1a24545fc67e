use actix_web::http::StatusCode;
use std::fmt;

#[derive(Debug, Clone)]
pub enum VinajiError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Validation(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    InsufficientBalance(String),
    Serialization(String),
    Provider(String),
    ProviderAuth(String),
    SignatureInvalid(String),
    PasswordHash(String),
    Config(String),
}

impl VinajiError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            VinajiError::DatabaseConfig(_) => "E001",
            VinajiError::DatabaseConnection(_) => "E002",
            VinajiError::DatabaseOperation(_) => "E003",
            VinajiError::Validation(_) => "E004",
            VinajiError::NotFound(_) => "E005",
            VinajiError::Unauthorized(_) => "E006",
            VinajiError::Forbidden(_) => "E007",
            VinajiError::Conflict(_) => "E008",
            VinajiError::InsufficientBalance(_) => "E009",
            VinajiError::Serialization(_) => "E010",
            VinajiError::Provider(_) => "E011",
            VinajiError::ProviderAuth(_) => "E012",
            VinajiError::SignatureInvalid(_) => "E013",
            VinajiError::PasswordHash(_) => "E014",
            VinajiError::Config(_) => "E015",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            VinajiError::DatabaseConfig(_) => "Database Configuration Error",
            VinajiError::DatabaseConnection(_) => "Database Connection Error",
            VinajiError::DatabaseOperation(_) => "Database Operation Error",
            VinajiError::Validation(_) => "Validation Error",
            VinajiError::NotFound(_) => "Resource Not Found",
            VinajiError::Unauthorized(_) => "Unauthorized",
            VinajiError::Forbidden(_) => "Forbidden",
            VinajiError::Conflict(_) => "Conflict",
            VinajiError::InsufficientBalance(_) => "Insufficient Balance",
            VinajiError::Serialization(_) => "Serialization Error",
            VinajiError::Provider(_) => "Payment Provider Error",
            VinajiError::ProviderAuth(_) => "Payment Provider Authentication Error",
            VinajiError::SignatureInvalid(_) => "Invalid Signature",
            VinajiError::PasswordHash(_) => "Password Hash Error",
            VinajiError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            VinajiError::DatabaseConfig(msg)
            | VinajiError::DatabaseConnection(msg)
            | VinajiError::DatabaseOperation(msg)
            | VinajiError::Validation(msg)
            | VinajiError::NotFound(msg)
            | VinajiError::Unauthorized(msg)
            | VinajiError::Forbidden(msg)
            | VinajiError::Conflict(msg)
            | VinajiError::InsufficientBalance(msg)
            | VinajiError::Serialization(msg)
            | VinajiError::Provider(msg)
            | VinajiError::ProviderAuth(msg)
            | VinajiError::SignatureInvalid(msg)
            | VinajiError::PasswordHash(msg)
            | VinajiError::Config(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            VinajiError::Validation(_) => StatusCode::BAD_REQUEST,
            VinajiError::NotFound(_) => StatusCode::NOT_FOUND,
            VinajiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            VinajiError::SignatureInvalid(_) => StatusCode::UNAUTHORIZED,
            VinajiError::Forbidden(_) => StatusCode::FORBIDDEN,
            VinajiError::Conflict(_) => StatusCode::CONFLICT,
            VinajiError::InsufficientBalance(_) => StatusCode::UNPROCESSABLE_ENTITY,
            VinajiError::Provider(_) | VinajiError::ProviderAuth(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for VinajiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 默认使用简洁格式
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for VinajiError {}

// 便捷的构造函数
impl VinajiError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        VinajiError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        VinajiError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        VinajiError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        VinajiError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        VinajiError::NotFound(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        VinajiError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        VinajiError::Forbidden(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        VinajiError::Conflict(msg.into())
    }

    pub fn insufficient_balance<T: Into<String>>(msg: T) -> Self {
        VinajiError::InsufficientBalance(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        VinajiError::Serialization(msg.into())
    }

    pub fn provider<T: Into<String>>(msg: T) -> Self {
        VinajiError::Provider(msg.into())
    }

    pub fn provider_auth<T: Into<String>>(msg: T) -> Self {
        VinajiError::ProviderAuth(msg.into())
    }

    pub fn signature_invalid<T: Into<String>>(msg: T) -> Self {
        VinajiError::SignatureInvalid(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        VinajiError::PasswordHash(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        VinajiError::Config(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for VinajiError {
    fn from(err: sea_orm::DbErr) -> Self {
        VinajiError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for VinajiError {
    fn from(err: std::io::Error) -> Self {
        VinajiError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for VinajiError {
    fn from(err: serde_json::Error) -> Self {
        VinajiError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for VinajiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            VinajiError::Provider(format!("request timeout: {}", err))
        } else {
            VinajiError::Provider(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, VinajiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(VinajiError::validation("x").code(), "E004");
        assert_eq!(VinajiError::insufficient_balance("x").code(), "E009");
        assert_eq!(VinajiError::signature_invalid("x").code(), "E013");
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            VinajiError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            VinajiError::insufficient_balance("x").http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            VinajiError::provider("x").http_status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = VinajiError::validation("amount must be positive");
        assert_eq!(
            err.to_string(),
            "Validation Error: amount must be positive"
        );
    }
}
