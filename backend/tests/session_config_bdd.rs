//! Behaviour tests for release-mode session configuration.
//!
//! Each scenario builds a mocked environment, loads the session settings and
//! checks the outcome.

use std::cell::RefCell;
use std::collections::HashMap;

use actix_web::cookie::SameSite;
use mockable::MockEnv;
use portal_backend::inbound::http::session_config::{
    ALLOW_EPHEMERAL_ENV, BuildMode, COOKIE_SECURE_ENV, KEY_FILE_ENV, SAMESITE_ENV,
    SessionConfigError, SessionSettings, TTL_ENV, session_settings_from_env,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::NamedTempFile;

type Outcome = Result<SessionSettings, SessionConfigError>;

#[derive(Default)]
struct SessionWorld {
    env: RefCell<HashMap<&'static str, String>>,
    key_file: RefCell<Option<NamedTempFile>>,
    outcome: RefCell<Option<Outcome>>,
}

impl SessionWorld {
    fn settings(&self) -> std::cell::Ref<'_, SessionSettings> {
        std::cell::Ref::map(self.outcome.borrow(), |outcome| {
            match outcome.as_ref().expect("configuration was loaded") {
                Ok(settings) => settings,
                Err(error) => panic!("expected settings, got {error}"),
            }
        })
    }

    fn error(&self) -> std::cell::Ref<'_, SessionConfigError> {
        std::cell::Ref::map(self.outcome.borrow(), |outcome| {
            match outcome.as_ref().expect("configuration was loaded") {
                Ok(_) => panic!("expected the configuration to fail"),
                Err(error) => error,
            }
        })
    }
}

fn variable(name: &str) -> &'static str {
    [COOKIE_SECURE_ENV, SAMESITE_ENV, ALLOW_EPHEMERAL_ENV, TTL_ENV]
        .into_iter()
        .find(|known| *known == name)
        .unwrap_or_else(|| panic!("unexpected variable {name}"))
}

#[fixture]
fn world() -> SessionWorld {
    SessionWorld::default()
}

#[given("a release build")]
fn a_release_build(world: &SessionWorld) {
    assert!(world.outcome.borrow().is_none());
}

#[given("the environment sets {name} to {value}")]
fn the_environment_sets(world: &SessionWorld, name: String, value: String) {
    world.env.borrow_mut().insert(variable(&name), value);
}

#[given("a key file of {len} bytes")]
fn a_key_file_of(world: &SessionWorld, len: usize) {
    let file = NamedTempFile::new().expect("temporary key file");
    std::fs::write(file.path(), vec![b'k'; len]).expect("key bytes written");
    let path = file.path().to_string_lossy().into_owned();
    world.env.borrow_mut().insert(KEY_FILE_ENV, path);
    world.key_file.replace(Some(file));
}

#[when("the session configuration is loaded")]
fn the_session_configuration_is_loaded(world: &SessionWorld) {
    let vars = world.env.borrow().clone();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |name| vars.get(name).cloned());
    world
        .outcome
        .replace(Some(session_settings_from_env(&env, BuildMode::Release)));
}

#[then("the configuration load succeeds")]
fn the_configuration_load_succeeds(world: &SessionWorld) {
    assert!(world.settings().cookie_secure);
}

#[then("the SameSite policy is Strict")]
fn the_same_site_policy_is_strict(world: &SessionWorld) {
    assert_eq!(world.settings().same_site, SameSite::Strict);
}

#[then("the session lifetime is {minutes} minutes")]
fn the_session_lifetime_is(world: &SessionWorld, minutes: i64) {
    assert_eq!(world.settings().ttl.whole_minutes(), minutes);
}

#[then("the configuration load fails due to missing SESSION_COOKIE_SECURE")]
fn fails_without_cookie_secure(world: &SessionWorld) {
    assert!(matches!(
        *world.error(),
        SessionConfigError::MissingEnv {
            name: COOKIE_SECURE_ENV
        }
    ));
}

#[then("the configuration load fails because ephemeral keys are not allowed")]
fn fails_on_ephemeral_keys(world: &SessionWorld) {
    assert!(matches!(*world.error(), SessionConfigError::EphemeralNotAllowed));
}

#[then("the configuration load fails because SameSite=None requires secure cookies")]
fn fails_on_insecure_same_site_none(world: &SessionWorld) {
    assert!(matches!(*world.error(), SessionConfigError::InsecureSameSiteNone));
}

#[then("the configuration load fails because the key is too short")]
fn fails_on_short_keys(world: &SessionWorld) {
    assert!(matches!(
        *world.error(),
        SessionConfigError::KeyTooShort { min_len: 64, .. }
    ));
}

#[scenario(path = "tests/features/session_config.feature")]
fn session_configuration(world: SessionWorld) {
    drop(world);
}
