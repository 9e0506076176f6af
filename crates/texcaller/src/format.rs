//! Source/result format pairs and their engine commands.
//!
//! The resolver is a pure table: exactly one external command per supported
//! pair, no side effects. Unsupported pairs are rejected before any
//! filesystem or process resource is touched.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::ConvertError;

/// Markup dialect of the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Tex,
    Latex,
    Xetex,
    Xelatex,
    Luatex,
    Lualatex,
}

/// Document format to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultFormat {
    Dvi,
    Pdf,
}

/// Raised when a format name is not one of the documented spellings.
#[derive(Debug, Clone, Error)]
#[error("unrecognized {kind} format \"{value}\"")]
pub struct UnknownFormat {
    kind: &'static str,
    value: String,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceFormat::Tex => "TeX",
            SourceFormat::Latex => "LaTeX",
            SourceFormat::Xetex => "XeTeX",
            SourceFormat::Xelatex => "XeLaTeX",
            SourceFormat::Luatex => "LuaTeX",
            SourceFormat::Lualatex => "LuaLaTeX",
        })
    }
}

impl fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResultFormat::Dvi => "DVI",
            ResultFormat::Pdf => "PDF",
        })
    }
}

impl FromStr for SourceFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tex" => Ok(SourceFormat::Tex),
            "latex" => Ok(SourceFormat::Latex),
            "xetex" => Ok(SourceFormat::Xetex),
            "xelatex" => Ok(SourceFormat::Xelatex),
            "luatex" => Ok(SourceFormat::Luatex),
            "lualatex" => Ok(SourceFormat::Lualatex),
            _ => Err(UnknownFormat {
                kind: "source",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for ResultFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dvi" => Ok(ResultFormat::Dvi),
            "pdf" => Ok(ResultFormat::Pdf),
            _ => Err(UnknownFormat {
                kind: "result",
                value: s.to_string(),
            }),
        }
    }
}

impl ResultFormat {
    /// Name of the result document inside the workspace.
    pub(crate) fn file_name(self) -> &'static str {
        match self {
            ResultFormat::Dvi => "texput.dvi",
            ResultFormat::Pdf => "texput.pdf",
        }
    }
}

/// Resolve the external engine command for a format pair.
pub fn engine_command(
    source_format: SourceFormat,
    result_format: ResultFormat,
) -> Result<&'static str, ConvertError> {
    use ResultFormat::*;
    use SourceFormat::*;

    match (result_format, source_format) {
        (Dvi, Tex) => Ok("tex"),
        (Dvi, Latex) => Ok("latex"),
        (Pdf, Tex) => Ok("pdftex"),
        (Pdf, Latex) => Ok("pdflatex"),
        (Pdf, Xetex) => Ok("xetex"),
        (Pdf, Xelatex) => Ok("xelatex"),
        (Pdf, Luatex) => Ok("luatex"),
        (Pdf, Lualatex) => Ok("lualatex"),
        _ => Err(ConvertError::UnsupportedFormatPair {
            source_format,
            result_format,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_supported_pair_resolves_to_its_command() {
        let table = [
            (SourceFormat::Tex, ResultFormat::Dvi, "tex"),
            (SourceFormat::Latex, ResultFormat::Dvi, "latex"),
            (SourceFormat::Tex, ResultFormat::Pdf, "pdftex"),
            (SourceFormat::Latex, ResultFormat::Pdf, "pdflatex"),
            (SourceFormat::Xetex, ResultFormat::Pdf, "xetex"),
            (SourceFormat::Xelatex, ResultFormat::Pdf, "xelatex"),
            (SourceFormat::Luatex, ResultFormat::Pdf, "luatex"),
            (SourceFormat::Lualatex, ResultFormat::Pdf, "lualatex"),
        ];
        for (source, result, command) in table {
            assert_eq!(engine_command(source, result).unwrap(), command);
        }
    }

    #[test]
    fn dvi_output_is_rejected_for_modern_engines() {
        for source in [
            SourceFormat::Xetex,
            SourceFormat::Xelatex,
            SourceFormat::Luatex,
            SourceFormat::Lualatex,
        ] {
            let err = engine_command(source, ResultFormat::Dvi).unwrap_err();
            assert!(matches!(
                err,
                ConvertError::UnsupportedFormatPair { .. }
            ));
            assert_eq!(
                err.to_string(),
                format!("Unable to convert from \"{source}\" to \"DVI\".")
            );
        }
    }

    #[test]
    fn format_names_parse_case_insensitively() {
        assert_eq!("LaTeX".parse::<SourceFormat>().unwrap(), SourceFormat::Latex);
        assert_eq!("xelatex".parse::<SourceFormat>().unwrap(), SourceFormat::Xelatex);
        assert_eq!("PDF".parse::<ResultFormat>().unwrap(), ResultFormat::Pdf);
        assert_eq!("dvi".parse::<ResultFormat>().unwrap(), ResultFormat::Dvi);
        assert!("html".parse::<ResultFormat>().is_err());
        assert!("markdown".parse::<SourceFormat>().is_err());
    }

    #[test]
    fn display_uses_documented_spelling() {
        assert_eq!(SourceFormat::Lualatex.to_string(), "LuaLaTeX");
        assert_eq!(SourceFormat::Xetex.to_string(), "XeTeX");
        assert_eq!(ResultFormat::Dvi.to_string(), "DVI");
    }
}
