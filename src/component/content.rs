//! Markdown content for STATIC components.

use std::fs;
use std::path::{Path, PathBuf};

use pulldown_cmark::{html, Options, Parser};

/// Errors from building or resolving [`Content`].
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content file {0} must have the 'md' extension")]
    Extension(PathBuf),
    #[error("failed to read content file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Markdown text, or a path to a `.md` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Markdown(String),
    File(PathBuf),
}

impl Default for Content {
    fn default() -> Self {
        Content::Markdown(String::new())
    }
}

impl Content {
    /// Inline markdown text.
    pub fn markdown(text: impl Into<String>) -> Self {
        Content::Markdown(text.into())
    }

    /// A markdown file. The path must end in `.md`.
    pub fn file(path: impl Into<PathBuf>) -> Result<Self, ContentError> {
        let path = path.into();
        if !has_md_extension(&path) {
            return Err(ContentError::Extension(path));
        }
        Ok(Content::File(path))
    }

    /// Whether there is nothing to render. Files always count as content.
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Markdown(text) => text.trim().is_empty(),
            Content::File(_) => false,
        }
    }

    /// Read the markdown source.
    pub fn source(&self) -> Result<String, ContentError> {
        match self {
            Content::Markdown(text) => Ok(text.clone()),
            Content::File(path) => {
                if !has_md_extension(path) {
                    return Err(ContentError::Extension(path.clone()));
                }
                fs::read_to_string(path).map_err(|source| ContentError::Read {
                    path: path.clone(),
                    source,
                })
            }
        }
    }

    /// Convert the content to HTML.
    pub fn to_html(&self) -> Result<String, ContentError> {
        let source = self.source()?;
        Ok(markdown_to_html(&source))
    }
}

fn has_md_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

/// Render CommonMark (plus tables, footnotes, strikethrough and task lists)
/// to HTML.
pub fn markdown_to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn markdown_renders_to_html() {
        let html = Content::markdown("# Title\n\nSome *text*.").to_html().unwrap();
        assert_eq!(html, "<h1>Title</h1>\n<p>Some <em>text</em>.</p>\n");
    }

    #[test]
    fn file_requires_md_extension() {
        assert!(matches!(
            Content::file("notes.txt"),
            Err(ContentError::Extension(_))
        ));
        assert!(Content::file("notes.md").is_ok());
        assert!(Content::file("notes").is_err());
    }

    #[test]
    fn file_content_is_read() {
        let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
        write!(file, "- one\n- two\n").unwrap();
        let content = Content::file(file.path()).unwrap();
        assert_eq!(
            content.to_html().unwrap(),
            "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n"
        );
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let content = Content::file(dir.path().join("gone.md")).unwrap();
        assert!(matches!(content.to_html(), Err(ContentError::Read { .. })));
    }

    #[test]
    fn emptiness() {
        assert!(Content::default().is_empty());
        assert!(Content::markdown("  \n").is_empty());
        assert!(!Content::markdown("x").is_empty());
    }
}
