/// Entry points for loading a presentation, and closing it again.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::OpcPackage;
use crate::ooxml::pptx::options::LoadOptions;
use crate::ooxml::pptx::presentation::{SlideShow, release_source};
use crate::ooxml::source::{InputSource, Ownership, SourceGuard};
use std::fs::File;
use std::path::Path;

impl SlideShow<'static> {
    /// Open a presentation file.
    ///
    /// The file handle is opened here, so it is always closed with the
    /// presentation regardless of [`LoadOptions::close_source`].
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use slidedeck::ooxml::pptx::SlideShow;
    ///
    /// let show = SlideShow::open("presentation.pptx")?;
    /// println!("{} slides", show.slide_count());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, LoadOptions::default())
    }

    pub fn open_with_options<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        SlideShow::from_reader_with_options(file, options.with_close_source(true))
    }

    /// Load a presentation from bytes already in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(OpcPackage::from_bytes(data)?)
    }

    /// Build a presentation from an already-open package.
    ///
    /// There is no caller source to manage; closing only marks the
    /// presentation closed. A failed build releases the package.
    pub fn from_package(package: OpcPackage) -> Result<Self> {
        Self::from_package_with_options(package, LoadOptions::default())
    }

    pub fn from_package_with_options(package: OpcPackage, options: LoadOptions) -> Result<Self> {
        SlideShow::build(package, None, &options)
    }
}

impl<'s> SlideShow<'s> {
    /// Load a presentation from a caller-supplied source with default
    /// options: closing the presentation closes the source.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use slidedeck::ooxml::pptx::{LoadOptions, SlideShow};
    /// use std::fs::File;
    ///
    /// let mut file = File::open("presentation.pptx")?;
    /// let mut show = SlideShow::from_reader_with_options(
    ///     &mut file,
    ///     LoadOptions::new().with_close_source(false),
    /// )?;
    /// show.close()?;
    /// // `file` is still ours to use
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_reader<S: InputSource + 's>(source: S) -> Result<Self> {
        Self::from_reader_with_options(source, LoadOptions::default())
    }

    /// Load a presentation from a caller-supplied source.
    ///
    /// The source is read to the end here and not touched again until the
    /// presentation closes, when [`LoadOptions::close_source`] decides
    /// whether it is closed. If loading fails the same policy is applied
    /// before the error is returned.
    pub fn from_reader_with_options<S: InputSource + 's>(
        source: S,
        options: LoadOptions,
    ) -> Result<Self> {
        let mut guard = SourceGuard::new(source, Ownership::from_close_flag(options.close_source));

        let package = match read_package(&mut guard) {
            Ok(package) => package,
            Err(e) => {
                release_source(guard);
                return Err(e);
            },
        };

        SlideShow::build(package, Some(guard), &options)
    }

    /// Close the presentation, applying the source's close policy.
    ///
    /// Closing again is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        tracing::debug!("closing presentation");

        match self.source.as_mut() {
            Some(guard) => guard.close().map_err(OoxmlError::Io),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Ownership of the input source, `None` when loaded without one.
    #[inline]
    pub fn source_ownership(&self) -> Option<Ownership> {
        self.source.as_ref().map(SourceGuard::ownership)
    }
}

fn read_package(guard: &mut SourceGuard<'_>) -> Result<OpcPackage> {
    let data = guard.read_all()?;
    Ok(OpcPackage::from_bytes(data)?)
}
