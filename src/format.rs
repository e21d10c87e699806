use std::fmt;

use clap::ValueEnum;

use crate::errors::FormatError;

const UTF8_BOM: char = '\u{feff}';

/// Password manager CSV export layouts we know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ExportFormat {
    #[value(name = "lastpass")]
    LastPass,
    #[value(name = "keepass1")]
    KeePass1,
    #[value(name = "keepassx")]
    KeePassX,
    #[value(name = "1password")]
    OnePassword,
}

impl ExportFormat {
    /// Index of the field holding the site URL or hostname.
    pub fn url_column(self) -> usize {
        match self {
            ExportFormat::LastPass => 0,
            ExportFormat::KeePass1 => 3,
            ExportFormat::KeePassX => 4,
            ExportFormat::OnePassword => 8,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::LastPass => "LastPass",
            ExportFormat::KeePass1 => "KeePass 1.x",
            ExportFormat::KeePassX => "KeePassX",
            ExportFormat::OnePassword => "1Password",
        };
        f.write_str(name)
    }
}

/// A header matches when the format's URL column holds `header`.
#[derive(Debug, Clone, Copy)]
struct Signature {
    format: ExportFormat,
    header: &'static str,
}

impl Signature {
    fn matches<S: AsRef<str>>(&self, fields: &[S]) -> bool {
        let column = self.format.url_column();
        fields
            .get(column)
            .map(|field| {
                let field = field.as_ref();
                let field = if column == 0 {
                    field.trim_start_matches(UTF8_BOM)
                } else {
                    field
                };
                field == self.header
            })
            .unwrap_or(false)
    }
}

// Checked in order, first match wins.
const SIGNATURES: &[Signature] = &[
    Signature {
        format: ExportFormat::LastPass,
        header: "url",
    },
    Signature {
        format: ExportFormat::KeePass1,
        header: "Web Site",
    },
    Signature {
        format: ExportFormat::KeePassX,
        header: "URL",
    },
    Signature {
        format: ExportFormat::OnePassword,
        header: "urls",
    },
];

/// Result of classifying a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub format: ExportFormat,
    pub column: usize,
}

impl From<ExportFormat> for Detection {
    fn from(format: ExportFormat) -> Self {
        Detection {
            format,
            column: format.url_column(),
        }
    }
}

/// Classify a header row. `None` means the file had no rows at all.
pub fn detect_format<S: AsRef<str>>(header: Option<&[S]>) -> Result<Detection, FormatError> {
    let fields = header.ok_or(FormatError::EmptyFile)?;
    SIGNATURES
        .iter()
        .find(|signature| signature.matches(fields))
        .map(|signature| Detection::from(signature.format))
        .ok_or(FormatError::UnsupportedFormat)
}
