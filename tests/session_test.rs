//! 会话控制测试：打开、登录、释放

mod support;

use senti_export::config::SiteConfig;
use senti_export::infrastructure::{ClickMode, Locator};
use senti_export::{selectors, Credentials, SessionController};

use support::{fast_timings, key, Action, FakeLauncher, FakeSite};

fn controller(site: &FakeSite) -> SessionController<FakeLauncher> {
    SessionController::new(FakeLauncher::new(site), SiteConfig::default(), fast_timings())
}

fn credentials() -> Credentials {
    Credentials::new("analyst@example.com", "s3cret")
}

#[tokio::test]
async fn test_login_fills_form_and_reaches_dashboard() {
    let site = FakeSite::working();
    let controller = controller(&site);
    let dir = tempfile::tempdir().unwrap();

    let session = controller.open(dir.path()).await.unwrap();
    assert_eq!(session.download_dir(), dir.path());
    assert!(controller.login(&session, &credentials()).await);

    let actions = site.actions();
    assert_eq!(actions[0], Action::Goto(SiteConfig::default().entry_url));
    assert!(actions.contains(&Action::Fill(
        key(Locator::css(selectors::EMAIL_INPUT)),
        "analyst@example.com".to_string()
    )));
    assert!(actions.contains(&Action::Fill(
        key(Locator::css(selectors::PASSWORD_INPUT)),
        "s3cret".to_string()
    )));
    assert_eq!(
        actions.last(),
        Some(&Action::Click(key(Locator::css(selectors::LOGIN_SUBMIT)), ClickMode::Script))
    );

    session.release().await.unwrap();
    assert_eq!(site.closes(), 1);
}

#[tokio::test]
async fn test_login_uses_labeled_input_when_email_type_missing() {
    let site = FakeSite::working();
    site.remove(selectors::EMAIL_INPUT);
    let controller = controller(&site);
    let dir = tempfile::tempdir().unwrap();

    let session = controller.open(dir.path()).await.unwrap();
    assert!(controller.login(&session, &credentials()).await);

    assert!(site.actions().contains(&Action::Fill(
        key(Locator::css(selectors::LABELED_INPUT)),
        "analyst@example.com".to_string()
    )));
}

#[tokio::test]
async fn test_login_fails_when_no_email_field_matches() {
    let site = FakeSite::working();
    site.remove(selectors::EMAIL_INPUT).remove(selectors::LABELED_INPUT);
    let controller = controller(&site);
    let dir = tempfile::tempdir().unwrap();

    let session = controller.open(dir.path()).await.unwrap();
    assert!(!controller.login(&session, &credentials()).await);
    assert!(!site
        .actions()
        .iter()
        .any(|a| matches!(a, Action::Click(sel, _) if sel == selectors::LOGIN_SUBMIT)));
}

#[tokio::test]
async fn test_login_fails_when_form_never_renders() {
    let site = FakeSite::working();
    site.remove(selectors::ANY_INPUT);
    let controller = controller(&site);
    let dir = tempfile::tempdir().unwrap();

    let session = controller.open(dir.path()).await.unwrap();
    assert!(!controller.login(&session, &credentials()).await);
}

#[tokio::test]
async fn test_login_fails_when_dashboard_never_appears() {
    let site = FakeSite::rejecting_login();
    let controller = controller(&site);
    let dir = tempfile::tempdir().unwrap();

    let session = controller.open(dir.path()).await.unwrap();
    assert!(!controller.login(&session, &credentials()).await);

    // 提交过一次，没有重试
    let submits = site
        .actions()
        .iter()
        .filter(|a| matches!(a, Action::Click(sel, _) if sel == selectors::LOGIN_SUBMIT))
        .count();
    assert_eq!(submits, 1);
}

#[tokio::test]
async fn test_consent_banner_is_accepted_before_login() {
    let site = FakeSite::working();
    site.add(selectors::CONSENT_OK);
    let controller = controller(&site);
    let dir = tempfile::tempdir().unwrap();

    let session = controller.open(dir.path()).await.unwrap();
    assert!(controller.login(&session, &credentials()).await);

    let actions = site.actions();
    let consent_at = actions
        .iter()
        .position(|a| *a == Action::Click(selectors::CONSENT_OK.to_string(), ClickMode::Native))
        .expect("consent clicked");
    let fill_at = actions
        .iter()
        .position(|a| matches!(a, Action::Fill(..)))
        .expect("form filled");
    assert!(consent_at < fill_at);
}

#[tokio::test]
async fn test_missing_consent_banner_is_skipped() {
    let site = FakeSite::working();
    let controller = controller(&site);
    let dir = tempfile::tempdir().unwrap();

    let session = controller.open(dir.path()).await.unwrap();
    assert!(controller.login(&session, &credentials()).await);
    assert!(!site
        .actions()
        .iter()
        .any(|a| matches!(a, Action::Click(sel, _) if sel == selectors::CONSENT_OK)));
}

#[tokio::test]
async fn test_open_propagates_launch_failure() {
    let site = FakeSite::working();
    let controller =
        SessionController::new(FakeLauncher::failing(&site), SiteConfig::default(), fast_timings());
    let dir = tempfile::tempdir().unwrap();

    assert!(controller.open(dir.path()).await.is_err());
    assert_eq!(site.launches(), 0);
}
