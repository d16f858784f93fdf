//! Feature directory discovery.
//!
//! An application opts into BDD coverage by carrying a `features` directory
//! next to its module root. Some layouts keep the module's code under a
//! `models` subdirectory; the locator normalises that leaf back to the
//! application root before probing. Absence of a `features` directory is a
//! normal outcome, not an error.

use camino::{Utf8Path, Utf8PathBuf};

/// Normalise an application directory, mapping a `models` leaf to its parent.
///
/// # Examples
///
/// ```
/// use bdd_suite::locate::app_root;
/// use camino::Utf8Path;
///
/// assert_eq!(app_root(Utf8Path::new("apps/blog/models")), "apps/blog");
/// assert_eq!(app_root(Utf8Path::new("apps/blog")), "apps/blog");
/// ```
#[must_use]
pub fn app_root(dir: &Utf8Path) -> &Utf8Path {
    if dir.file_name() == Some("models") {
        dir.parent().unwrap_or(dir)
    } else {
        dir
    }
}

/// Return the application's `features` directory when it exists.
///
/// The directory is probed once per call; callers should not cache the
/// result beyond the current suite build.
#[must_use]
pub fn features_dir(app_dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let candidate = app_root(app_dir).join("features");
    candidate.is_dir().then_some(candidate)
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests assert on success paths")]
mod tests {
    use super::{app_root, features_dir};
    use camino::{Utf8Path, Utf8PathBuf};
    use rstest::rstest;

    #[rstest]
    #[case("apps/blog", "apps/blog")]
    #[case("apps/blog/models", "apps/blog")]
    #[case("models", "models")]
    fn normalises_models_leaf(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(app_root(Utf8Path::new(input)), expected);
    }

    #[test]
    fn finds_features_next_to_app() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).expect("utf8 tempdir");
        let app = root.join("blog");
        std::fs::create_dir_all(app.join("features")).expect("create features");

        assert_eq!(features_dir(&app), Some(app.join("features")));
    }

    #[test]
    fn finds_features_from_models_leaf() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).expect("utf8 tempdir");
        let app = root.join("shop");
        std::fs::create_dir_all(app.join("models")).expect("create models");
        std::fs::create_dir_all(app.join("features")).expect("create features");

        assert_eq!(features_dir(&app.join("models")), Some(app.join("features")));
    }

    #[test]
    fn absent_features_is_none() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).expect("utf8 tempdir");
        let app = root.join("plain");
        std::fs::create_dir_all(&app).expect("create app");

        assert_eq!(features_dir(&app), None);
    }
}
