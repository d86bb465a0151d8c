/// Options controlling how a presentation is loaded.
///
/// # Examples
///
/// ```rust
/// use slidedeck::ooxml::pptx::LoadOptions;
///
/// // Close the caller's source when the document closes (the default)
/// let options = LoadOptions::default();
/// assert!(options.close_source);
///
/// // Keep the source open and reject comments by unknown authors
/// let options = LoadOptions::new()
///     .with_close_source(false)
///     .with_strict_comment_authors(true);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Whether closing the document also closes the input source
    pub close_source: bool,
    /// Whether a comment whose author id is missing from the author table
    /// fails the load instead of being logged
    pub strict_comment_authors: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            close_source: true,
            strict_comment_authors: false,
        }
    }
}

impl LoadOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether closing the document closes the input source.
    #[inline]
    pub fn with_close_source(mut self, close: bool) -> Self {
        self.close_source = close;
        self
    }

    #[inline]
    pub fn with_strict_comment_authors(mut self, strict: bool) -> Self {
        self.strict_comment_authors = strict;
        self
    }
}
