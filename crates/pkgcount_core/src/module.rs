use log::{debug, trace};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

const GO_MOD: &str = "go.mod";

/// Finds the module name of the project containing `dir`.
///
/// Searches `dir` and its ancestors for the nearest `go.mod` and reads its
/// `module` directive.
pub fn find_module_name(dir: &Path) -> Result<String> {
    debug!("Searching for go.mod from: {}", dir.display());
    let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    let mut current_dir: PathBuf = if start.is_file() {
        start.parent().map(Path::to_path_buf).unwrap_or_else(|| start.clone())
    } else {
        start.clone()
    };

    loop {
        let go_mod = current_dir.join(GO_MOD);
        trace!("Checking for go.mod at: {:?}", go_mod);
        if go_mod.is_file() {
            debug!("Found go.mod at: {:?}", go_mod);
            let content = fs::read_to_string(&go_mod)
                .map_err(|source| Error::FileRead { path: go_mod.clone(), source })?;
            return parse_module_directive(&content).ok_or(Error::MissingModuleDirective(go_mod));
        }

        // Try to move up to parent directory
        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => {
                debug!("Could not find go.mod in any parent folder");
                return Err(Error::ModuleNotFound(start));
            }
        }
    }
}

/// Extracts the module path from `go.mod` content.
pub fn parse_module_directive(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let line = match line.find("//") {
            Some(idx) => &line[..idx],
            None => line,
        }
        .trim();
        let rest = line.strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let name = rest.trim().trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    #[test]
    fn test_parse_plain_directive() {
        let content = "module github.com/acme/widget\n\ngo 1.22\n";
        assert_eq!(parse_module_directive(content).as_deref(), Some("github.com/acme/widget"));
    }

    #[test]
    fn test_parse_quoted_directive_with_comment() {
        let content = "// Deprecated: use v2\nmodule \"example.com/old\" // legacy\n";
        assert_eq!(parse_module_directive(content).as_deref(), Some("example.com/old"));
    }

    #[test]
    fn test_parse_ignores_lookalikes() {
        assert_eq!(parse_module_directive("modules foo\n"), None);
        assert_eq!(parse_module_directive("// module commented.out/x\n"), None);
        assert_eq!(parse_module_directive("go 1.22\n"), None);
        assert_eq!(parse_module_directive("module\n"), None);
    }

    #[test]
    fn test_find_module_name_in_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "go.mod", "module github.com/acme/widget\n");

        assert_eq!(find_module_name(root).unwrap(), "github.com/acme/widget");
    }

    #[test]
    fn test_find_module_name_from_subdir_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "go.mod", "module github.com/acme/widget\n");
        let file = create_test_file(root, "internal/store/store.go", "package store");

        let subdir = root.join("internal").join("store");
        assert_eq!(find_module_name(&subdir).unwrap(), "github.com/acme/widget");
        assert_eq!(find_module_name(&file).unwrap(), "github.com/acme/widget");
    }

    #[test]
    fn test_nearest_go_mod_wins() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "go.mod", "module example.com/outer\n");
        create_test_file(root, "tools/go.mod", "module example.com/outer/tools\n");

        assert_eq!(find_module_name(&root.join("tools")).unwrap(), "example.com/outer/tools");
    }

    #[test]
    fn test_go_mod_without_directive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "go.mod", "go 1.22\n");

        assert!(matches!(find_module_name(root), Err(Error::MissingModuleDirective(_))));
    }
}
