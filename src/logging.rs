//! ログ出力の初期化
//!
//! 標準出力は一覧表に使うため、ログは標準エラーへ出す。

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// `RUST_LOG` が無ければ `plant_admin=info`（`-v` で debug）
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "plant_admin=debug,plant_admin_common=debug"
    } else {
        "plant_admin=info"
    };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
