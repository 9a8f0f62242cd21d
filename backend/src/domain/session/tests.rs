//! Tests for session resolution and portal gating.

use super::*;
use crate::domain::ports::{DataServiceError, MockSessionLookup};
use crate::domain::{AppRole, ErrorCode};
use rstest::{fixture, rstest};

const USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn ops_user() -> SessionUser {
    SessionUser::new(
        UserId::new(USER_ID).expect("fixture id"),
        "ops@fastlease.ae",
        None,
        vec![AppRole::OpManager],
        vec![],
    )
}

fn gate_returning(result: Result<Option<SessionUser>, DataServiceError>) -> SessionGate {
    let mut lookup = MockSessionLookup::new();
    lookup
        .expect_session_user()
        .times(1)
        .return_once(move |_| result);
    SessionGate::new(Arc::new(lookup))
}

fn gate_without_lookup() -> SessionGate {
    let mut lookup = MockSessionLookup::new();
    lookup.expect_session_user().never();
    SessionGate::new(Arc::new(lookup))
}

#[rstest]
#[tokio::test]
async fn missing_cookie_redirects_to_portal_login() {
    let result = gate_without_lookup()
        .require_portal_session(None, Portal::Ops, Some("/ops/dashboard"))
        .await
        .expect("no lookup failure");
    assert_eq!(
        result,
        SessionResult::Unauthenticated {
            login_path: "/login/ops?next=%2Fops%2Fdashboard".to_owned()
        }
    );
}

#[rstest]
#[tokio::test]
async fn return_path_defaults_to_portal_home() {
    let result = gate_without_lookup()
        .require_portal_session(None, Portal::Risk, None)
        .await
        .expect("no lookup failure");
    assert_eq!(
        result,
        SessionResult::Unauthenticated {
            login_path: "/login/risk?next=%2Frisk%2Fdashboard".to_owned()
        }
    );
}

#[rstest]
#[tokio::test]
async fn malformed_cookie_counts_as_absent() {
    let result = gate_without_lookup()
        .require_session(Some("not-a-uuid"), "/apply")
        .await
        .expect("no lookup failure");
    assert_eq!(
        result,
        SessionResult::Unauthenticated {
            login_path: "/login?next=%2Fapply".to_owned()
        }
    );
}

#[rstest]
#[tokio::test]
async fn unknown_user_is_unauthenticated() {
    let result = gate_returning(Ok(None))
        .require_session(Some(USER_ID), "/apply?step=2")
        .await
        .expect("no lookup failure");
    assert_eq!(
        result,
        SessionResult::Unauthenticated {
            login_path: "/login?next=%2Fapply%3Fstep%3D2".to_owned()
        }
    );
}

#[rstest]
#[tokio::test]
async fn admitted_user_is_authenticated(ops_user: SessionUser) {
    let result = gate_returning(Ok(Some(ops_user.clone())))
        .require_portal_session(Some(USER_ID), Portal::Ops, Some("/ops/dashboard"))
        .await
        .expect("no lookup failure");
    assert_eq!(result.user(), Some(&ops_user));
}

#[rstest]
#[tokio::test]
async fn user_outside_portal_is_sent_to_that_portal_login(ops_user: SessionUser) {
    let result = gate_returning(Ok(Some(ops_user)))
        .require_portal_session(Some(USER_ID), Portal::Investor, Some("/investor/dashboard"))
        .await
        .expect("no lookup failure");
    assert_eq!(
        result,
        SessionResult::Unauthenticated {
            login_path: "/login/investor?next=%2Finvestor%2Fdashboard".to_owned()
        }
    );
}

#[rstest]
#[tokio::test]
async fn lookup_failure_is_service_unavailable() {
    let error = gate_returning(Err(DataServiceError::unavailable("connection refused")))
        .require_portal_session(Some(USER_ID), Portal::Ops, None)
        .await
        .expect_err("lookup failure surfaces");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case("/login/ops", Some(""), "/login/ops")]
#[case("/login", Some("/client/documents"), "/login?next=%2Fclient%2Fdocuments")]
fn login_redirect_encodes_next(#[case] base: &str, #[case] next: Option<&str>, #[case] expected: &str) {
    assert_eq!(login_redirect(base, next), expected);
}
