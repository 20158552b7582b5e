use anyhow::{bail, Result};
use senti_export::utils::logger;
use senti_export::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 读取 .env（可选）
    let _ = dotenvy::dotenv();

    // 先初始化日志，配置解析的告警才能输出
    logger::init(Config::verbose_from_env());

    // 加载配置
    let config = Config::from_env();

    // 初始化并运行应用
    let result = App::initialize(config).await?.run().await?;

    if result.run_failed() {
        bail!("运行失败: 未能登录或建立浏览器会话");
    }

    Ok(())
}
