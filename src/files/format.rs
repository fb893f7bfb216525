use std::fmt;

/// The canonical set of supported upload formats. Both validation
/// boundaries (the access controller and the decoder registry) branch on
/// this enum, so they can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    Csv,
    Json,
    Xlsx,
    Parquet,
}

impl FileFormat {
    pub const ALL: [FileFormat; 4] = [
        FileFormat::Csv,
        FileFormat::Json,
        FileFormat::Xlsx,
        FileFormat::Parquet,
    ];

    /// Resolve a format from a filename's extension (text after the last
    /// dot, case-insensitive). `None` for a missing or unsupported
    /// extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (stem, ext) = filename.rsplit_once('.')?;
        if stem.is_empty() {
            // Dotfiles like ".csv" have no stem and no real extension.
            return None;
        }
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "json" => Some(FileFormat::Json),
            "xlsx" => Some(FileFormat::Xlsx),
            "parquet" => Some(FileFormat::Parquet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Parquet => "parquet",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_all_supported_extensions() {
        assert_eq!(FileFormat::from_filename("a.csv"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_filename("a.json"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_filename("a.xlsx"), Some(FileFormat::Xlsx));
        assert_eq!(
            FileFormat::from_filename("report.parquet"),
            Some(FileFormat::Parquet)
        );
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert_eq!(FileFormat::from_filename("A.CSV"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_filename("b.Json"), Some(FileFormat::Json));
    }

    #[test]
    fn only_the_last_extension_counts() {
        assert_eq!(
            FileFormat::from_filename("archive.csv.exe"),
            None,
            "disguised extension must not pass"
        );
        assert_eq!(
            FileFormat::from_filename("data.backup.csv"),
            Some(FileFormat::Csv)
        );
    }

    #[test]
    fn rejects_unsupported_and_missing_extensions() {
        assert_eq!(FileFormat::from_filename("x.exe"), None);
        assert_eq!(FileFormat::from_filename("noextension"), None);
        assert_eq!(FileFormat::from_filename(".csv"), None);
        assert_eq!(FileFormat::from_filename(""), None);
    }
}
