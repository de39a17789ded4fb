use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// The caller's parsed `Cargo.toml`, used to find the path under which
/// an engine crate is reachable from generated code.
///
/// # Example
///
/// ```rust
/// # use fg_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("fg_reflect"));
/// ```
///
/// # Resolution rules
///
/// For each of `dependencies` and then `dev-dependencies`:
///
/// 1. If the requested crate is listed directly, return `::crate_name`.
/// 2. If the name starts with `fg_` and one of the facade crates is listed,
///    return `::facade::short_name`. Facades are tried in the order
///    `forge`, `fg_core`, `fg` (e.g. `fg_reflect` -> `::fg_core::reflect`).
///
/// If nothing matches, fall back to `::crate_name`.
///
/// A crate that expands its own derive in doctests should declare
/// `extern crate self as crate_name;` so that the fallback path resolves.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const ENGINE_PREFIX: &str = "fg_";

/// Crates re-exporting every `fg_*` crate under its short name.
const FACADES: [&str; 3] = ["forge", "fg_core", "fg"];

const DEPENDENCY_TABLES: [&str; 2] = ["dependencies", "dev-dependencies"];

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        let Some(dir) = env::var_os("CARGO_MANIFEST_DIR") else {
            panic!("CARGO_MANIFEST_DIR should be auto-defined by cargo.");
        };
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(
            path.exists(),
            "Cargo manifest does not exist at path {}",
            path.display(),
        );
        path
    }

    #[inline(never)]
    fn modified_time(path: &Path) -> SystemTime {
        std::fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .unwrap_or_else(|err| panic!("Unable to stat {}: {err}", path.display()))
    }

    #[inline(never)]
    fn read(path: &Path) -> Document<Box<str>> {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|err| panic!("Unable to read cargo manifest {}: {err}", path.display()))
            .into_boxed_str();
        Document::parse(text)
            .unwrap_or_else(|err| panic!("Failed to parse cargo manifest {}: {err}", path.display()))
    }

    fn path_of(segments: &[&str]) -> syn::Path {
        let text = segments.iter().fold(String::new(), |mut acc, seg| {
            acc.push_str("::");
            acc.push_str(seg);
            acc
        });
        syn::parse_str(&text).unwrap_or_else(|err| panic!("`{text}` is not a valid path: {err}"))
    }

    fn resolve_in(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::path_of(&[name]));
        }
        let module = name.strip_prefix(ENGINE_PREFIX)?;
        FACADES
            .iter()
            .find(|facade| deps.contains_key(facade))
            .map(|facade| Self::path_of(&[*facade, module]))
    }

    /// Returns the [`syn::Path`] of the package `name` as seen from the
    /// caller, following the rules in the type-level documentation.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        DEPENDENCY_TABLES
            .iter()
            .filter_map(|table| match self.manifest.get(table) {
                Some(Item::Table(deps)) => Some(deps),
                _ => None,
            })
            .find_map(|deps| Self::resolve_in(deps, name))
            .unwrap_or_else(|| Self::path_of(&[name]))
    }

    /// Runs `func` against the caller's manifest.
    ///
    /// Manifests are cached per path and re-read only when the file's
    /// modification time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time = Self::modified_time(&path);

        {
            let cache = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = cache.get(&path)
                && manifest.modified_time == modified_time
            {
                return func(manifest);
            }
        }

        let manifest = Manifest {
            manifest: Self::read(&path),
            modified_time,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::Manifest;
    use toml_edit::Document;

    fn path_string(path: &syn::Path) -> String {
        path.segments
            .iter()
            .map(|seg| seg.ident.to_string())
            .collect::<Vec<_>>()
            .join("::")
    }

    fn manifest(text: &str) -> Manifest {
        Manifest {
            manifest: Document::parse(text.to_owned().into_boxed_str()).unwrap(),
            modified_time: std::time::SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn direct_dependency() {
        let m = manifest("[dependencies]\nfg_reflect = \"0.1\"\n");
        assert_eq!(path_string(&m.get_crate_path("fg_reflect")), "fg_reflect");
    }

    #[test]
    fn facade_dependency() {
        let m = manifest("[dependencies]\nfg_core = \"0.1\"\n");
        assert_eq!(path_string(&m.get_crate_path("fg_reflect")), "fg_core::reflect");

        let m = manifest("[dev-dependencies]\nforge = \"0.1\"\n");
        assert_eq!(path_string(&m.get_crate_path("fg_reflect")), "forge::reflect");
    }

    #[test]
    fn fallback() {
        let m = manifest("[package]\nname = \"demo\"\n");
        assert_eq!(path_string(&m.get_crate_path("fg_reflect")), "fg_reflect");
    }
}
