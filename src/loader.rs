use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str;
use std::time::Instant;

use csv::{ByteRecord, ReaderBuilder};
use tracing::{debug, info};

use crate::domain::{Domain, DomainExtractor, DomainSet, SuffixRules};
use crate::errors::{Corpus, LoadError, LoadErrorKind};
use crate::format::{detect_format, Detection, ExportFormat};

/// A domain set together with how much of its input was usable.
#[derive(Debug, Clone, Default)]
pub struct LoadedCorpus {
    pub domains: DomainSet,
    /// Rows or lines read, not counting the CSV header.
    pub records: usize,
    /// Rows or lines that contributed no domain.
    pub skipped: usize,
}

/// Detected or forced layout of a password export.
#[derive(Debug, Clone)]
pub struct PasswordExport {
    pub detection: Detection,
    pub corpus: LoadedCorpus,
}

pub fn load_password_export<S: SuffixRules>(
    path: &Path,
    extractor: &DomainExtractor<S>,
    forced: Option<ExportFormat>,
) -> Result<PasswordExport, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::new(Corpus::PasswordExport, path, e))?;
    info!(
        action = "open",
        component = "password_export",
        file_path = ?path,
        "Loading password export"
    );
    load_password_export_from_reader(file, extractor, forced)
        .map_err(|kind| LoadError::new(Corpus::PasswordExport, path, kind))
}

/// Read a password manager CSV export into the set of registrable domains it references.
///
/// The header decides which column holds the URL unless `forced` names the format.
/// Rows that fail to parse, are too short, or hold no registrable domain are skipped.
/// Only the URL field has to be valid UTF-8; bytes elsewhere in a row are not decoded.
pub fn load_password_export_from_reader<R: Read, S: SuffixRules>(
    reader: R,
    extractor: &DomainExtractor<S>,
    forced: Option<ExportFormat>,
) -> Result<PasswordExport, LoadErrorKind> {
    let start_time = Instant::now();

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut records = csv_reader.byte_records();

    let header: Option<ByteRecord> = records.next().transpose()?;
    let detection = match forced {
        Some(format) if header.is_some() => Detection::from(format),
        _ => {
            let fields: Option<Vec<Cow<'_, str>>> = header
                .as_ref()
                .map(|h| h.iter().map(String::from_utf8_lossy).collect());
            detect_format(fields.as_deref())?
        }
    };
    info!(
        action = "detect",
        component = "password_export",
        format = %detection.format,
        column = detection.column,
        forced = forced.is_some(),
        "Export format resolved"
    );

    let mut corpus = LoadedCorpus::default();
    for (index, result) in records.enumerate() {
        corpus.records += 1;
        // Line numbers are 1-based and the header is line 1.
        let row = index + 2;

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!(
                    action = "skip",
                    component = "password_export",
                    row,
                    error = %e,
                    "Unreadable CSV row"
                );
                corpus.skipped += 1;
                continue;
            }
        };
        let Some(raw) = record.get(detection.column) else {
            debug!(
                action = "skip",
                component = "password_export",
                row,
                field_count = record.len(),
                "Row too short for URL column"
            );
            corpus.skipped += 1;
            continue;
        };
        let field = match str::from_utf8(raw) {
            Ok(field) => field,
            Err(e) => {
                debug!(
                    action = "skip",
                    component = "password_export",
                    row,
                    error = %e,
                    "URL field is not UTF-8"
                );
                corpus.skipped += 1;
                continue;
            }
        };
        match extractor.extract(field) {
            Ok(domain) => {
                corpus.domains.insert(domain);
            }
            Err(e) => {
                debug!(
                    action = "skip",
                    component = "password_export",
                    row,
                    error = %e,
                    "No registrable domain"
                );
                corpus.skipped += 1;
            }
        }
    }

    info!(
        action = "complete",
        component = "password_export",
        records = corpus.records,
        unique_domains = corpus.domains.len(),
        skipped = corpus.skipped,
        duration_ms = start_time.elapsed().as_millis(),
        "Password export loaded"
    );
    Ok(PasswordExport { detection, corpus })
}

pub fn load_leak_list(path: &Path) -> Result<LoadedCorpus, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::new(Corpus::LeakList, path, e))?;
    info!(action = "open", component = "leak_list", file_path = ?path, "Loading leak list");
    load_leak_list_from_reader(file)
        .map_err(|kind| LoadError::new(Corpus::LeakList, path, kind))
}

/// Read a newline separated list of already canonical domains.
///
/// Lines are taken verbatim apart from a trailing `\r`. Empty lines and lines
/// that are not UTF-8 are counted as skipped; only a read error is fatal.
pub fn load_leak_list_from_reader<R: Read>(reader: R) -> Result<LoadedCorpus, LoadErrorKind> {
    let start_time = Instant::now();
    let mut corpus = LoadedCorpus::default();

    for (index, line) in BufReader::new(reader).split(b'\n').enumerate() {
        let line = line?;
        corpus.records += 1;
        let bytes = line.strip_suffix(b"\r").unwrap_or(&line[..]);
        if bytes.is_empty() {
            corpus.skipped += 1;
            continue;
        }
        match str::from_utf8(bytes) {
            Ok(domain) => {
                corpus.domains.insert(Domain::from(domain));
            }
            Err(e) => {
                debug!(
                    action = "skip",
                    component = "leak_list",
                    line = index + 1,
                    error = %e,
                    "Line is not UTF-8"
                );
                corpus.skipped += 1;
            }
        }
    }

    info!(
        action = "complete",
        component = "leak_list",
        records = corpus.records,
        unique_domains = corpus.domains.len(),
        skipped = corpus.skipped,
        duration_ms = start_time.elapsed().as_millis(),
        "Leak list loaded"
    );
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FormatError;

    fn load(csv: &str) -> Result<PasswordExport, LoadErrorKind> {
        load_password_export_from_reader(csv.as_bytes(), &DomainExtractor::new(), None)
    }

    #[test]
    fn test_lastpass_export() {
        let csv = "url,username,password,extra,name,grouping,fav\n\
                   http://sub.example.com/login,u,p,,,,\n";
        let export = load(csv).unwrap();
        assert_eq!(export.detection.format, ExportFormat::LastPass);
        assert_eq!(export.detection.column, 0);
        assert_eq!(export.corpus.domains.len(), 1);
        assert!(export.corpus.domains.contains("example.com"));
        assert_eq!(export.corpus.records, 1);
        assert_eq!(export.corpus.skipped, 0);
    }

    #[test]
    fn test_keepass1_export() {
        let csv = "\"Account\",\"Login Name\",\"Password\",\"Web Site\",\"Comments\"\n\
                   \"Bank\",\"me\",\"secret\",\"bank.co.uk\",\" \"\n";
        let export = load(csv).unwrap();
        assert_eq!(export.detection.format, ExportFormat::KeePass1);
        assert!(export.corpus.domains.contains("bank.co.uk"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let csv = "url,username\n\
                   https://www.example.com,a\n\
                   https://mail.example.com,b\n\
                   example.com,c\n";
        let export = load(csv).unwrap();
        assert_eq!(export.corpus.records, 3);
        assert_eq!(export.corpus.domains.len(), 1);
    }

    #[test]
    fn test_bad_rows_are_skipped() {
        let csv = "url,username\n\
                   \"   \",blank\n\
                   http://,nohost\n\
                   co.uk,suffix\n\
                   http://10.0.0.1/,ip\n\
                   https://github.com/login,ok\n";
        let export = load(csv).unwrap();
        assert_eq!(export.corpus.records, 5);
        assert_eq!(export.corpus.skipped, 4);
        assert_eq!(export.corpus.domains.len(), 1);
        assert!(export.corpus.domains.contains("github.com"));
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let csv = "Group,Title,Username,Password,URL,Notes\n\
                   g,t\n\
                   g,t,u,p,https://example.org/,n\n";
        let export = load(csv).unwrap();
        assert_eq!(export.detection.format, ExportFormat::KeePassX);
        assert_eq!(export.corpus.skipped, 1);
        assert!(export.corpus.domains.contains("example.org"));
    }

    #[test]
    fn test_loose_quotes_tolerated() {
        let csv = "url,extra\n\
                   https://example.net,he said \"hi\" there\n";
        let export = load(csv).unwrap();
        assert!(export.corpus.domains.contains("example.net"));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            load(""),
            Err(LoadErrorKind::Format(FormatError::EmptyFile))
        ));
    }

    #[test]
    fn test_unknown_header() {
        assert!(matches!(
            load("title,login,secret\nfoo,bar,baz\n"),
            Err(LoadErrorKind::Format(FormatError::UnsupportedFormat))
        ));
    }

    #[test]
    fn test_forced_format_skips_detection() {
        let csv = "site,user\nhttps://shop.example.com,me\n";
        let export = load_password_export_from_reader(
            csv.as_bytes(),
            &DomainExtractor::new(),
            Some(ExportFormat::LastPass),
        )
        .unwrap();
        assert_eq!(export.detection.column, 0);
        assert!(export.corpus.domains.contains("example.com"));
    }

    #[test]
    fn test_non_utf8_outside_url_column_keeps_row() {
        let bytes: &[u8] = b"url,notes\nhttps://a.example.com,\xff\nhttps://b.example.org,x\n";
        let export =
            load_password_export_from_reader(bytes, &DomainExtractor::new(), None).unwrap();
        assert_eq!(export.corpus.records, 2);
        assert_eq!(export.corpus.skipped, 0);
        assert!(export.corpus.domains.contains("example.com"));
        assert!(export.corpus.domains.contains("example.org"));
    }

    #[test]
    fn test_non_utf8_url_field_is_skipped() {
        let bytes: &[u8] = b"url,notes\nhttps://caf\xe9.example.com,x\nhttps://ok.example.org,y\n";
        let export =
            load_password_export_from_reader(bytes, &DomainExtractor::new(), None).unwrap();
        assert_eq!(export.corpus.skipped, 1);
        assert_eq!(export.corpus.domains.len(), 1);
        assert!(export.corpus.domains.contains("example.org"));
    }

    #[test]
    fn test_forced_format_still_rejects_empty_input() {
        let result = load_password_export_from_reader(
            "".as_bytes(),
            &DomainExtractor::new(),
            Some(ExportFormat::KeePassX),
        );
        assert!(matches!(
            result,
            Err(LoadErrorKind::Format(FormatError::EmptyFile))
        ));
    }

    #[test]
    fn test_leak_list_deduplicates() {
        let input = "example.com\nexample.com\nother.org";
        let corpus = load_leak_list_from_reader(input.as_bytes()).unwrap();
        assert_eq!(corpus.domains.len(), 2);
        assert_eq!(corpus.records, 3);
    }

    #[test]
    fn test_leak_list_blank_lines_and_crlf() {
        let corpus = load_leak_list_from_reader("a.com\r\n\r\nb.com\r\n".as_bytes()).unwrap();
        assert_eq!(corpus.domains.len(), 2);
        assert!(corpus.domains.contains("a.com"));
        assert_eq!(corpus.skipped, 1);
    }

    #[test]
    fn test_leak_list_lines_are_verbatim() {
        let input = " padded.com \nplain.com\n";
        let corpus = load_leak_list_from_reader(input.as_bytes()).unwrap();
        assert!(corpus.domains.contains(" padded.com "));
        assert!(!corpus.domains.contains("padded.com"));
    }

    #[test]
    fn test_leak_list_non_utf8_line_is_skipped() {
        let bytes: &[u8] = b"example.com\ncaf\xe9.fr\nother.org\n";
        let corpus = load_leak_list_from_reader(bytes).unwrap();
        assert_eq!(corpus.records, 3);
        assert_eq!(corpus.skipped, 1);
        assert_eq!(corpus.domains.len(), 2);
        assert!(corpus.domains.contains("example.com"));
        assert!(corpus.domains.contains("other.org"));
    }

    #[test]
    fn test_leak_list_read_error_is_fatal() {
        struct FailingReader;

        impl Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))
            }
        }

        assert!(matches!(
            load_leak_list_from_reader(FailingReader),
            Err(LoadErrorKind::Io(_))
        ));
    }
}
