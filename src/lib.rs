pub mod args;
pub mod check;
pub mod compare;
pub mod domain;
pub mod errors;
pub mod format;
pub mod loader;
pub mod utils;

pub use args::Args;
pub use check::run_check;
pub use compare::{intersect, Comparison, Report};
pub use domain::{Domain, DomainExtractor, DomainSet, PublicSuffixList, SuffixRules};
pub use errors::{Corpus, ExtractError, FormatError, LoadError, LoadErrorKind};
pub use format::{detect_format, Detection, ExportFormat};
pub use loader::{load_leak_list, load_password_export, LoadedCorpus, PasswordExport};
