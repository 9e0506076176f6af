//! # texcaller
//!
//! A convenient interface to the TeX command line tools that handles all
//! kinds of errors without much fuss.
//!
//! The library converts a TeX or LaTeX source document into a DVI or PDF
//! document by repeatedly invoking the external typesetting engine inside
//! an isolated temporary workspace until the engine's auxiliary output
//! stabilizes. The workspace is torn down unconditionally, and the outcome
//! always carries a human-readable diagnostic narrative including the
//! engine's own log.
//!
//! ```no_run
//! use texcaller::{convert, ConversionRequest, ResultFormat, SourceFormat};
//!
//! let source = "\\documentclass{article}\\begin{document}Hello\\end{document}";
//! let request = ConversionRequest::new(
//!     source.as_bytes(),
//!     SourceFormat::Latex,
//!     ResultFormat::Pdf,
//!     5,
//! );
//! let outcome = convert(&request);
//! if let Some(pdf) = outcome.result() {
//!     std::fs::write("hello.pdf", pdf).unwrap();
//! }
//! ```

mod convert;
mod error;
mod escape;
mod format;
mod fsio;
mod runner;
mod workspace;

pub use convert::{convert, ConversionOutcome, ConversionRequest};
pub use error::{ConvertError, ConvertResult};
pub use escape::escape_latex;
pub use format::{engine_command, ResultFormat, SourceFormat, UnknownFormat};
