//! HTTP handler 模块
//!
//! 按业务面拆分：认证、档案、钱包、KYC、各类市场、推广、订阅、
//! 通知、webhook、健康检查，以及 staff 专属的 admin 子模块。

pub mod admin;
pub mod affiliates;
pub mod auth;
pub mod blog;
pub mod courses;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod jobs;
pub mod kyc;
pub mod mentorship;
pub mod notifications;
pub mod products;
pub mod profile;
pub mod subscriptions;
pub mod types;
pub mod wallet;
pub mod webhook;

// 重新导出公共类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{
    api_result, error_from_vinaji, error_response, paginated_response, success_response,
};

// 重新导出错误码
pub use error_code::ErrorCode;

// 健康检查的启动时间标记
pub use health::AppStartTime;
