//! Per-file context handed to checks.

use std::path::{Component, Path, PathBuf};

/// What a check knows about the file it is looking at.
///
/// The manager never looks inside; it is built by the driver and passed
/// straight through to [`Check::check`](crate::Check::check).
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path as discovered by the driver.
    pub path: &'a Path,
    /// File contents.
    pub content: &'a str,
    /// Whether the path looks like test code.
    pub is_test: bool,
    /// Path relative to the analysis root, used in reported locations.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a context for `path` below `root`.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            is_test: is_test_path(path),
            relative_path,
        }
    }

    /// Byte offset of a 1-indexed line and column.
    ///
    /// Columns are counted in characters, as `proc_macro2` reports them.
    /// Positions past the end clamp to the end of the content.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        line_column_offset(self.content, line, column)
    }

    /// Byte range covered by a `proc_macro2` span in this file.
    #[must_use]
    pub fn byte_range(&self, span: proc_macro2::Span) -> (usize, usize) {
        let start = span.start();
        let end = span.end();
        let from = self.offset_for(start.line, start.column + 1);
        let to = self.offset_for(end.line, end.column + 1);
        (from, to.saturating_sub(from))
    }
}

/// Byte offset of a 1-indexed line and character column in `content`,
/// clamped to the end.
pub(crate) fn line_column_offset(content: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }

    let mut offset = 0;
    for (i, text) in content.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let column_bytes: usize = text
                .chars()
                .take(column.saturating_sub(1))
                .map(char::len_utf8)
                .sum();
            return offset + column_bytes;
        }
        offset += text.len();
    }

    offset
}

fn is_test_path(path: &Path) -> bool {
    let in_test_dir = path.components().any(|c| match c {
        Component::Normal(s) => matches!(s.to_str(), Some("tests" | "test" | "benches")),
        _ => false,
    });
    if in_test_dir {
        return true;
    }

    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| {
            name == "tests.rs"
                || name.starts_with("test_")
                || name.ends_with("_test.rs")
                || name.ends_with("_tests.rs")
        })
}
