//! Behaviour tests for startup configuration resolution.
//!
//! Each scenario builds a private environment, loads [`Settings`] through
//! OrthoConfig, and resolves it into runtime parameters.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::OsString;
use std::io::Write;
use std::time::Duration;

use crud_backend::settings::{RuntimeSettings, Settings, SettingsError};
use env_lock::lock_env;
use ortho_config::OrthoConfig;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::{NamedTempFile, TempDir};

const VARS: [&str; 8] = [
    "CRUD_BIND_ADDR",
    "CRUD_PAGE_CEILING",
    "CRUD_PAGE_DEFAULT_LIMIT",
    "CRUD_SESSION_KEY_FILE",
    "CRUD_COOKIE_SECURE",
    "CRUD_ALLOW_EPHEMERAL",
    "CRUD_MODERATION_URL",
    "CRUD_MODERATION_TIMEOUT_MS",
];

struct SettingsWorld {
    vars: RefCell<HashMap<String, String>>,
    key_file: RefCell<Option<NamedTempFile>>,
    scratch: TempDir,
    outcome: RefCell<Option<Result<RuntimeSettings, SettingsError>>>,
}

impl SettingsWorld {
    fn new() -> Self {
        Self {
            vars: RefCell::new(HashMap::new()),
            key_file: RefCell::new(None),
            scratch: TempDir::new().expect("scratch directory"),
            outcome: RefCell::new(None),
        }
    }

    fn set_var(&self, name: &str, value: &str) {
        self.vars
            .borrow_mut()
            .insert(name.to_owned(), value.to_owned());
    }

    fn resolve(&self) {
        let vars = self.vars.borrow().clone();
        let result = {
            let _guard = lock_env(VARS.map(|name| (name, vars.get(name).cloned())));
            Settings::load_from_iter([OsString::from("crud-backend")])
                .expect("configuration should load")
                .resolve()
        };
        *self.outcome.borrow_mut() = Some(result);
    }

    fn with_settings(&self, check: impl FnOnce(&RuntimeSettings)) {
        let outcome = self.outcome.borrow();
        match outcome.as_ref().expect("settings must be resolved") {
            Ok(settings) => check(settings),
            Err(error) => panic!("expected settings to resolve, got: {error}"),
        }
    }

    fn with_error(&self, check: impl FnOnce(&SettingsError)) {
        let outcome = self.outcome.borrow();
        match outcome.as_ref().expect("settings must be resolved") {
            Ok(_) => panic!("expected startup to fail"),
            Err(error) => check(error),
        }
    }
}

#[fixture]
fn world() -> SettingsWorld {
    SettingsWorld::new()
}

#[given("a session key file with {len} bytes")]
fn a_session_key_file(world: &SettingsWorld, len: usize) {
    let mut file = NamedTempFile::new().expect("key file");
    file.write_all(&vec![b'k'; len]).expect("write key");
    let path = file.path().to_str().expect("utf-8 temp path").to_owned();
    world.set_var("CRUD_SESSION_KEY_FILE", &path);
    *world.key_file.borrow_mut() = Some(file);
}

#[given("a missing session key file")]
fn a_missing_session_key_file(world: &SettingsWorld) {
    let path = world.scratch.path().join("absent-key");
    let path = path.to_str().expect("utf-8 temp path").to_owned();
    world.set_var("CRUD_SESSION_KEY_FILE", &path);
}

#[given("{name} is set to {value}")]
fn variable_is_set(world: &SettingsWorld, name: String, value: String) {
    world.set_var(&name, value.trim_matches('"'));
}

#[when("the runtime settings are resolved")]
fn the_runtime_settings_are_resolved(world: &SettingsWorld) {
    world.resolve();
}

#[then("the settings resolve")]
fn the_settings_resolve(world: &SettingsWorld) {
    world.with_settings(|_| {});
}

#[then("the page ceiling is {ceiling} with default limit {limit}")]
fn the_page_bounds_are(world: &SettingsWorld, ceiling: u32, limit: u32) {
    world.with_settings(|settings| {
        assert_eq!(settings.guard.ceiling(), ceiling);
        assert_eq!(settings.guard.default_limit(), limit);
    });
}

#[then("no moderation endpoint is configured")]
fn no_moderation_endpoint(world: &SettingsWorld) {
    world.with_settings(|settings| assert!(settings.moderation.is_none()));
}

#[then("moderation calls go to {path} with a {millis} ms timeout")]
fn moderation_calls_go_to(world: &SettingsWorld, path: String, millis: u64) {
    world.with_settings(|settings| {
        let target = settings.moderation.as_ref().expect("moderation target");
        assert_eq!(target.url.path(), path.trim_matches('"'));
        assert_eq!(target.timeout, Duration::from_millis(millis));
    });
}

#[then("startup fails because the session key is too short")]
fn fails_short_key(world: &SettingsWorld) {
    world.with_error(|error| assert!(matches!(error, SettingsError::KeyTooShort { .. })));
}

#[then("startup fails because the session key cannot be read")]
fn fails_unreadable_key(world: &SettingsWorld) {
    world.with_error(|error| assert!(matches!(error, SettingsError::KeyRead { .. })));
}

#[then("startup fails because the pagination bounds are inconsistent")]
fn fails_pagination(world: &SettingsWorld) {
    world.with_error(|error| assert!(matches!(error, SettingsError::Pagination(_))));
}

#[then("startup fails because the moderation timeout is zero")]
fn fails_zero_timeout(world: &SettingsWorld) {
    world.with_error(|error| assert!(matches!(error, SettingsError::ZeroTimeout)));
}

#[scenario(
    path = "tests/features/settings.feature",
    name = "Defaults resolve with a valid key file"
)]
fn defaults_resolve(world: SettingsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/settings.feature",
    name = "A short key file fails startup"
)]
fn short_key_file(world: SettingsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/settings.feature",
    name = "A missing key file needs the ephemeral opt-in"
)]
fn missing_key_with_opt_in(world: SettingsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/settings.feature",
    name = "A missing key file fails startup by default"
)]
fn missing_key_by_default(world: SettingsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/settings.feature",
    name = "A default limit above the ceiling fails startup"
)]
fn default_limit_above_ceiling(world: SettingsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/settings.feature",
    name = "A configured moderation endpoint is parsed"
)]
fn moderation_endpoint_parsed(world: SettingsWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/settings.feature",
    name = "A zero moderation timeout fails startup"
)]
fn zero_moderation_timeout(world: SettingsWorld) {
    drop(world);
}
