use senti_export::config::Config;
use senti_export::models::load_queue_file;
use senti_export::utils::logger;
use senti_export::{BatchOrchestrator, ChromeLauncher, Credentials, SessionController};
use std::path::Path;

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_export_queue_against_live_site() {
    // 初始化日志
    logger::init(true);

    // 加载配置，凭据来自 SENTI_EMAIL / SENTI_PASSWORD
    let config = Config::from_env();
    let credentials = Credentials::from_env().expect("缺少登录凭据");

    let queue = load_queue_file(Path::new(&config.queue_file))
        .await
        .expect("加载队列失败");

    std::fs::create_dir_all(&config.download_dir).expect("创建下载目录失败");
    let launcher = ChromeLauncher::new(config.browser.clone(), config.timings.wait_timeout);
    let orchestrator = BatchOrchestrator::new(launcher, &config);

    let result = orchestrator
        .run(&queue, &credentials)
        .await
        .expect("批量导出失败");

    assert!(!result.run_failed(), "登录应该成功");
    println!("成功 {}/{}", result.success_count(), queue.len());
}

#[tokio::test]
#[ignore]
async fn test_browser_session_and_login() {
    // 初始化日志
    logger::init(true);

    let config = Config::from_env();
    let credentials = Credentials::from_env().expect("缺少登录凭据");
    let dir = tempfile::tempdir().expect("创建临时目录失败");

    let controller = SessionController::new(
        ChromeLauncher::new(config.browser.clone(), config.timings.wait_timeout),
        config.site.clone(),
        config.timings.clone(),
    );

    let session = controller.open(dir.path()).await.expect("启动浏览器失败");
    let logged_in = controller.login(&session, &credentials).await;
    session.release().await.expect("关闭浏览器失败");

    assert!(logged_in, "应该能够成功登录");
}
