use log::{debug, trace};
use regex::Regex;
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::{
    constants::{IMPORT_BLOCK_CLOSE, IMPORT_BLOCK_OPEN, IMPORT_ONE},
    error::{Error, Result},
};

/// `import "fmt"`, `import f "fmt"`, `import _ "embed"`
const SINGLE_PATTERN: &str = r#"^import\s+(?:[\w.]+\s+)?"([^"]+)"\s*(?://.*)?$"#;

/// `"fmt"`, `f "fmt"`, `_ "embed"`, `. "strings"` inside an import block
const BLOCK_PATTERN: &str = r#"^(?:[\w.]+\s+)?"([^"]+)"\s*(?://.*)?$"#;

enum ScanState {
    Seeking,
    Block,
}

/// Lexical extractor for Go import declarations.
///
/// Reads forward only until the import section ends: the first single-line
/// import, or the closing line of the first import block. The patterns are
/// compiled once and shared read-only between workers.
#[derive(Debug, Clone)]
pub struct ImportScanner {
    single: Regex,
    block: Regex,
}

impl ImportScanner {
    pub fn new() -> Result<Self> {
        Ok(ImportScanner { single: Regex::new(SINGLE_PATTERN)?, block: Regex::new(BLOCK_PATTERN)? })
    }

    /// Returns the import paths declared in `file`, in file order.
    pub fn extract_imports(&self, file: &Path) -> Result<Vec<String>> {
        trace!("Scanning imports in: {}", file.display());
        let read_err = |source| Error::FileRead { path: file.to_path_buf(), source };

        let f = File::open(file).map_err(read_err)?;
        let imports = self.scan(BufReader::new(f)).map_err(read_err)?;

        debug!("Found {} imports in {}", imports.len(), file.display());
        Ok(imports)
    }

    pub fn scan<R: BufRead>(&self, mut reader: R) -> io::Result<Vec<String>> {
        let mut imports = Vec::new();
        let mut state = ScanState::Seeking;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let text = String::from_utf8_lossy(&buf);
            let line = text.trim();

            match state {
                ScanState::Seeking => {
                    if let Some(rest) = line.strip_prefix(IMPORT_BLOCK_OPEN) {
                        // `import ("fmt"; "os")` opens and closes on one line
                        let rest = rest.find("//").map_or(rest, |idx| &rest[..idx]);
                        let (specs, closed) = match rest.find(IMPORT_BLOCK_CLOSE) {
                            Some(end) => (&rest[..end], true),
                            None => (rest, false),
                        };
                        imports.extend(
                            specs.split(';').filter_map(|spec| capture(&self.block, spec.trim())),
                        );
                        if closed {
                            trace!("Import block closed on its opening line");
                            break;
                        }
                        trace!("Entering import block");
                        state = ScanState::Block;
                    } else if line.starts_with(IMPORT_ONE)
                        && let Some(path) = capture(&self.single, line)
                    {
                        trace!("Found single import: '{}'", path);
                        imports.push(path);
                        break;
                    }
                }
                ScanState::Block => {
                    if line.starts_with(IMPORT_BLOCK_CLOSE) {
                        trace!("Leaving import block");
                        break;
                    }
                    if let Some(path) = capture(&self.block, line) {
                        imports.push(path);
                    }
                }
            }
        }

        Ok(imports)
    }
}

fn capture(re: &Regex, line: &str) -> Option<String> {
    re.captures(line).and_then(|c| c.get(1)).map(|m| m.as_str().to_string())
}
