//! Constants shared by the walker and the scanner.

/// Extension of the source files whose imports are counted
pub const SOURCE_EXTENSION: &str = "go";

/// Directory names that are never descended into
pub const SKIP_DIRS: &[&str] = &[
    "vendor",       // vendored dependencies
    ".git",         // version control
    ".idea",        // JetBrains metadata
    ".vscode",      // editor settings
    "node_modules", // JS tooling that sometimes lives next to Go code
];

/// Prefix of a single-line import declaration, after trimming
pub(crate) const IMPORT_ONE: &str = "import ";

/// Prefix of the line opening an import block, after trimming
pub(crate) const IMPORT_BLOCK_OPEN: &str = "import (";

/// Prefix of the line closing an import block, after trimming
pub(crate) const IMPORT_BLOCK_CLOSE: &str = ")";
