mod common;

use common::{mount_at, FakeGateway, StubApi};
use tfactory_core::view::app::MAGIC_LINK_NOTICE;
use tfactory_core::{GatewayError, PagePanel};

#[tokio::test]
async fn auth_actions_are_disabled_without_gateway() {
    let (mut app, _) = mount_at("/settings", StubApi::ok(), None).await;
    app.set_email("a@example.com");
    app.set_password("hunter2");

    assert!(!app.can_send_magic_link());
    assert!(!app.can_sign_in_with_password());
    assert!(!app.can_sign_out());
    assert!(!app.send_magic_link().await);
    assert!(!app.sign_in_with_password().await);
    assert!(app.session().is_none());

    match app.page().panel {
        Some(PagePanel::Settings(settings)) => {
            assert!(!settings.gateway_ready);
            assert!(!settings.can_send_magic_link);
        }
        other => panic!("expected settings panel, got {other:?}"),
    }
}

#[tokio::test]
async fn magic_link_sets_notice_and_clears_busy() {
    let gateway = FakeGateway::new();
    let (mut app, _) = mount_at("/settings", StubApi::ok(), Some(gateway.clone())).await;
    gateway.watch(app.auth().busy.clone());

    assert!(!app.can_send_magic_link());
    app.set_email("a@example.com");
    assert!(app.send_magic_link().await);

    assert_eq!(app.auth().notice.as_deref(), Some(MAGIC_LINK_NOTICE));
    assert!(app.auth().error.is_none());
    assert!(!app.auth().is_busy());
    assert_eq!(gateway.busy_samples(), [true]);
}

#[tokio::test]
async fn auth_error_is_separate_from_notes_error() {
    let gateway = FakeGateway::new();
    let (mut app, _) = mount_at("/settings", StubApi::ok(), Some(gateway.clone())).await;
    app.set_email("a@example.com");
    app.set_password("wrong");

    gateway.fail_next(GatewayError::Rejected {
        status: 400,
        message: "Invalid login credentials".to_string(),
    });
    assert!(!app.sign_in_with_password().await);

    assert_eq!(app.auth().error.as_deref(), Some("Invalid login credentials"));
    assert!(app.notes().error.is_none());
    assert!(app.session().is_none());
    assert!(!app.auth().is_busy());
}

#[tokio::test]
async fn password_sign_in_then_sign_out_updates_session() {
    let gateway = FakeGateway::new();
    let (mut app, _) = mount_at("/settings", StubApi::ok(), Some(gateway.clone())).await;
    assert!(!app.can_sign_out());

    app.set_email("pw@example.com");
    app.set_password("correct horse");
    assert!(app.sign_in_with_password().await);
    assert_eq!(app.session().map(|s| s.user_id()), Some("user-pw"));
    assert_eq!(
        app.session().and_then(|s| s.email()),
        Some("pw@example.com")
    );
    assert!(app.notes_backend().is_remote());
    assert!(app.page().to_string().contains("pw@example.com"));

    assert!(app.sign_out().await);
    assert!(app.session().is_none());
    assert!(!app.notes_backend().is_remote());
}

#[tokio::test]
async fn restored_session_is_picked_up_at_mount() {
    let gateway = FakeGateway::signed_in("user-a", "a@example.com");
    let (app, _) = mount_at("/settings", StubApi::ok(), Some(gateway)).await;

    assert!(app.has_gateway());
    assert_eq!(app.session().map(|s| s.user_id()), Some("user-a"));
    assert!(app.can_sign_out());
    assert!(app.page().signed_in);
}
