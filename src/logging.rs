//! 日誌初始化（應用程式與範例使用，函式庫本身不安裝 subscriber）

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日誌系統
///
/// 以 `RUST_LOG` 設定過濾器，未設定時為 `info`，
/// 例如 `RUST_LOG=eps_calc=debug` 可看到每個計算步驟。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// 測試用：詳細日誌，可重複呼叫
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
