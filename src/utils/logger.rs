use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 初始化日志输出
///
/// `RUST_LOG` 优先；否则默认 info，verbose 时本 crate 输出 debug。
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "senti_export=debug,info"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false),
        )
        .try_init();
}
