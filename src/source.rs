//! Ordered assembly of script source text from snippets and files.

use std::fs;
use std::path::Path;

use crate::error::OsaError;

/// Accumulates script source segments in push order.
///
/// No parsing happens here; segments are joined verbatim with newlines
/// and handed to the engine as one body.
#[derive(Debug, Clone, Default)]
pub struct ScriptSource {
    segments: Vec<String>,
}

impl ScriptSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source snippet.
    pub fn push_str(&mut self, snippet: impl Into<String>) {
        self.segments.push(snippet.into());
    }

    /// Appends the contents of a source file.
    pub fn push_file(&mut self, path: impl AsRef<Path>) -> Result<(), OsaError> {
        let contents = fs::read_to_string(path)?;
        self.segments.push(contents);
        Ok(())
    }

    /// Joins the segments with newlines into one script body.
    pub fn assemble(&self) -> String {
        self.segments.join("\n")
    }

    /// Returns the number of pushed segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("osar-source-{}.applescript", Uuid::new_v4()))
    }

    #[test]
    fn assembles_snippets_in_push_order() {
        let mut source = ScriptSource::new();
        source.push_str("on greet(name)");
        source.push_str("  return \"hello \" & name");
        source.push_str("end greet");
        assert_eq!(
            source.assemble(),
            "on greet(name)\n  return \"hello \" & name\nend greet"
        );
    }

    #[test]
    fn empty_source_assembles_to_nothing() {
        let source = ScriptSource::new();
        assert!(source.is_empty());
        assert_eq!(source.assemble(), "");
    }

    #[test]
    fn mixes_files_and_snippets() {
        let path = temp_path();
        fs::write(&path, "on helper()\nend helper").unwrap();

        let mut source = ScriptSource::new();
        source.push_file(&path).unwrap();
        source.push_str("helper()");
        assert_eq!(source.assemble(), "on helper()\nend helper\nhelper()");
        assert_eq!(source.len(), 2);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut source = ScriptSource::new();
        let err = source.push_file(temp_path()).unwrap_err();
        assert!(matches!(err, OsaError::Io(_)));
        assert!(source.is_empty());
    }
}
