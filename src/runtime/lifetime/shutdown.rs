use tracing::info;

/// 服务停止后的收尾
///
/// sea-orm 连接池随 drop 释放；这里只负责日志落盘前的提示。
pub fn shutdown_cleanup() {
    info!("Server stopped, cleaning up");
}
