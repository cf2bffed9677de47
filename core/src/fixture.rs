//! Fixture-backed response bodies.
//!
//! # Design
//! A fixture is a file under a `ResourceContext` root, addressed by a
//! logical name. Names without an extension get `.json` appended. The
//! context is passed explicitly per fixture, or falls back to a
//! process-wide default that tests set once at setup and clear at
//! teardown. With neither available, construction fails immediately with
//! `FixtureError::NoResourceContext`; there is no empty-body fallback.
//!
//! Bytes are read once per construction, so building the same fixture
//! twice yields the same body as long as the file is unchanged.

use std::path::{Component, Path, PathBuf};

use parking_lot::RwLock;
use tracing::debug;

use crate::error::FixtureError;
use crate::response::{PretendResponse, APPLICATION_JSON, OCTET_STREAM, TEXT_PLAIN};

/// Environment variable read by `ResourceContext::from_env`.
pub const FIXTURES_DIR_ENV: &str = "PRETENDER_FIXTURES_DIR";

const DEFAULT_EXTENSION: &str = "json";

static DEFAULT_CONTEXT: RwLock<Option<ResourceContext>> = parking_lot::const_rwlock(None);

/// Locates fixture files relative to a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceContext {
    root: PathBuf,
}

impl ResourceContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_env() -> Result<Self, FixtureError> {
        std::env::var_os(FIXTURES_DIR_ENV)
            .map(Self::new)
            .ok_or(FixtureError::MissingEnv {
                var: FIXTURES_DIR_ENV,
            })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Install `context` as the process-wide default.
    pub fn set_default(context: ResourceContext) {
        *DEFAULT_CONTEXT.write() = Some(context);
    }

    /// Clear the process-wide default.
    pub fn unset_default() {
        *DEFAULT_CONTEXT.write() = None;
    }

    pub fn current_default() -> Option<ResourceContext> {
        DEFAULT_CONTEXT.read().clone()
    }

    /// Install `context` as the default until the guard drops, then restore
    /// whatever was there before.
    pub fn scoped_default(context: ResourceContext) -> DefaultContextGuard {
        let previous = DEFAULT_CONTEXT.write().replace(context);
        DefaultContextGuard { previous }
    }

    /// Full path for a logical fixture name.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, FixtureError> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        let names_a_file = matches!(
            relative.components().next_back(),
            Some(Component::Normal(_))
        );
        if escapes || !names_a_file {
            return Err(FixtureError::InvalidName {
                name: name.to_string(),
            });
        }

        let mut path = self.root.join(relative);
        if path.extension().is_none() {
            path.set_extension(DEFAULT_EXTENSION);
        }
        Ok(path)
    }

    /// Read the raw bytes of a fixture.
    pub fn load(&self, name: &str) -> Result<Vec<u8>, FixtureError> {
        let path = self.resolve(name)?;
        read_fixture(name, &path)
    }
}

fn read_fixture(name: &str, path: &Path) -> Result<Vec<u8>, FixtureError> {
    let bytes = std::fs::read(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(fixture = name, path = %path.display(), len = bytes.len(), "loaded fixture");
    Ok(bytes)
}

/// Restores the previous default context on drop.
#[must_use = "the default context is restored as soon as the guard drops"]
#[derive(Debug)]
pub struct DefaultContextGuard {
    previous: Option<ResourceContext>,
}

impl Drop for DefaultContextGuard {
    fn drop(&mut self) {
        *DEFAULT_CONTEXT.write() = self.previous.take();
    }
}

/// Builder for a response whose body comes from a fixture file.
///
/// ```no_run
/// # use pretender_core::{FixtureResponse, ResourceContext};
/// let fixtures = ResourceContext::new("tests/fixtures");
/// let response = FixtureResponse::new("jsonresponse")
///     .in_context(&fixtures)
///     .with_status(201)
///     .build()?;
/// # Ok::<(), pretender_core::FixtureError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FixtureResponse {
    name: String,
    status: u16,
    context: Option<ResourceContext>,
}

impl FixtureResponse {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: 200,
            context: None,
        }
    }

    /// Shorthand for `FixtureResponse::new(name).build()` against the default context.
    pub fn load(name: impl Into<String>) -> Result<PretendResponse, FixtureError> {
        Self::new(name).build()
    }

    pub fn in_context(mut self, context: &ResourceContext) -> Self {
        self.context = Some(context.clone());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> Result<PretendResponse, FixtureError> {
        let context = match self.context {
            Some(context) => context,
            None => ResourceContext::current_default().ok_or_else(|| {
                FixtureError::NoResourceContext {
                    name: self.name.clone(),
                }
            })?,
        };

        let path = context.resolve(&self.name)?;
        let body = read_fixture(&self.name, &path)?;
        Ok(PretendResponse::new(body, content_type_for(&path)).with_status(self.status))
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => APPLICATION_JSON,
        Some("txt") => TEXT_PLAIN,
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("xml") => "application/xml",
        Some("csv") => "text/csv; charset=utf-8",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::fs;

    // Tests touching the process-wide default run one at a time.
    static DEFAULT_LOCK: Mutex<()> = parking_lot::const_mutex(());
    static ENV_LOCK: Mutex<()> = parking_lot::const_mutex(());

    fn fixtures() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("jsonresponse.json"), r#"{"hello":"world"}"#).unwrap();
        fs::write(dir.path().join("stringresponse.txt"), "Hello, fixture").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/list.json"), "[]").unwrap();
        dir
    }

    #[test]
    fn missing_extension_defaults_to_json() {
        let ctx = ResourceContext::new("/fixtures");
        assert_eq!(
            ctx.resolve("jsonresponse").unwrap(),
            PathBuf::from("/fixtures/jsonresponse.json")
        );
        assert_eq!(
            ctx.resolve("stringresponse.txt").unwrap(),
            PathBuf::from("/fixtures/stringresponse.txt")
        );
    }

    #[test]
    fn names_cannot_escape_the_root() {
        let ctx = ResourceContext::new("/fixtures");
        assert!(matches!(ctx.resolve("../secret"), Err(FixtureError::InvalidName { .. })));
        assert!(matches!(ctx.resolve("/etc/passwd"), Err(FixtureError::InvalidName { .. })));
        assert!(matches!(ctx.resolve(""), Err(FixtureError::InvalidName { .. })));
        assert!(matches!(ctx.resolve("."), Err(FixtureError::InvalidName { .. })));
        assert!(ctx.resolve("./jsonresponse").is_ok());
    }

    #[test]
    fn load_reads_raw_bytes() {
        let dir = fixtures();
        let ctx = ResourceContext::new(dir.path());
        assert_eq!(ctx.load("stringresponse.txt").unwrap(), b"Hello, fixture");
        assert_eq!(ctx.load("nested/list").unwrap(), b"[]");
        assert!(matches!(ctx.load("absent"), Err(FixtureError::Io { .. })));
    }

    #[test]
    fn context_from_environment() {
        let _lock = ENV_LOCK.lock();
        std::env::set_var(FIXTURES_DIR_ENV, "/from/env");
        let ctx = ResourceContext::from_env().unwrap();
        assert_eq!(ctx.root(), Path::new("/from/env"));

        std::env::remove_var(FIXTURES_DIR_ENV);
        let err = ResourceContext::from_env().unwrap_err();
        assert!(matches!(err, FixtureError::MissingEnv { var } if var == FIXTURES_DIR_ENV));
    }

    #[test]
    fn explicit_context_loads_json_fixture() {
        let dir = fixtures();
        let ctx = ResourceContext::new(dir.path());
        let resp = FixtureResponse::new("jsonresponse").in_context(&ctx).build().unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.content_type, APPLICATION_JSON);
        let body: serde_json::Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(body["hello"], "world");
    }

    #[test]
    fn explicit_extension_is_used_unchanged() {
        let dir = fixtures();
        let ctx = ResourceContext::new(dir.path());
        let resp = FixtureResponse::new("stringresponse.txt")
            .in_context(&ctx)
            .with_status(202)
            .build()
            .unwrap();
        assert_eq!(resp.status, 202);
        assert_eq!(resp.content_type, TEXT_PLAIN);
        assert_eq!(resp.body, b"Hello, fixture");
    }

    #[test]
    fn nested_names_resolve() {
        let dir = fixtures();
        let ctx = ResourceContext::new(dir.path());
        let resp = FixtureResponse::new("nested/list").in_context(&ctx).build().unwrap();
        assert_eq!(resp.body, b"[]");
    }

    #[test]
    fn repeated_loads_are_identical() {
        let dir = fixtures();
        let ctx = ResourceContext::new(dir.path());
        let first = FixtureResponse::new("jsonresponse").in_context(&ctx).build().unwrap();
        let second = FixtureResponse::new("jsonresponse").in_context(&ctx).build().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = fixtures();
        let ctx = ResourceContext::new(dir.path());
        let err = FixtureResponse::new("absent").in_context(&ctx).build().unwrap_err();
        match err {
            FixtureError::Io { path, .. } => assert!(path.ends_with("absent.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn falls_back_to_default_context() {
        let _lock = DEFAULT_LOCK.lock();
        let dir = fixtures();
        let _guard = ResourceContext::scoped_default(ResourceContext::new(dir.path()));

        let resp = FixtureResponse::load("jsonresponse").unwrap();
        assert!(!resp.body.is_empty());
    }

    #[test]
    fn fails_fast_without_any_context() {
        let _lock = DEFAULT_LOCK.lock();
        ResourceContext::unset_default();

        let err = FixtureResponse::load("jsonresponse").unwrap_err();
        assert!(matches!(err, FixtureError::NoResourceContext { ref name } if name == "jsonresponse"));
    }

    #[test]
    fn explicit_context_beats_default() {
        let _lock = DEFAULT_LOCK.lock();
        let dir = fixtures();
        let _guard = ResourceContext::scoped_default(ResourceContext::new("/nonexistent"));

        let ctx = ResourceContext::new(dir.path());
        assert!(FixtureResponse::new("jsonresponse").in_context(&ctx).build().is_ok());
    }

    #[test]
    fn scoped_default_restores_previous() {
        let _lock = DEFAULT_LOCK.lock();
        ResourceContext::set_default(ResourceContext::new("/outer"));
        {
            let _guard = ResourceContext::scoped_default(ResourceContext::new("/inner"));
            assert_eq!(
                ResourceContext::current_default().unwrap().root(),
                Path::new("/inner")
            );
        }
        assert_eq!(
            ResourceContext::current_default().unwrap().root(),
            Path::new("/outer")
        );
        ResourceContext::unset_default();
        assert!(ResourceContext::current_default().is_none());
    }
}
