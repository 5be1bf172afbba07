//! CSV recipient source
//!
//! Extracts recipient addresses from a headered CSV file. The first
//! matching column among the accepted header variants is used; rows
//! without a non-empty value in that column are skipped.

use std::path::Path;

use crate::error::{DispatcherError, DispatcherResult};

/// Accepted header spellings for the address column, in priority order
const EMAIL_COLUMNS: &[&str] = &["email", "Email", "EMAIL", "email_address", "Email Address"];

/// Read all recipient addresses from a CSV file
///
/// Returns an empty vector when no address column exists; the caller
/// decides whether that is an error.
pub fn load_recipients(path: &Path) -> DispatcherResult<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| DispatcherError::CsvRead {
        path: path.display().to_string(),
        source,
    })?;

    let headers = reader
        .headers()
        .map_err(|source| DispatcherError::CsvRead {
            path: path.display().to_string(),
            source,
        })?
        .clone();

    let email_index = EMAIL_COLUMNS
        .iter()
        .find_map(|column| headers.iter().position(|header| header == *column));

    let Some(email_index) = email_index else {
        return Ok(Vec::new());
    };

    let mut recipients = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| DispatcherError::CsvRead {
            path: path.display().to_string(),
            source,
        })?;

        if let Some(value) = record.get(email_index) {
            let value = value.trim();
            if !value.is_empty() {
                recipients.push(value.to_string());
            }
        }
    }

    Ok(recipients)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_standard_email_column() {
        let file = csv_file("name,email\nAlice,alice@example.com\nBob,bob@example.com\n");
        let recipients = load_recipients(file.path()).unwrap();
        assert_eq!(recipients, vec!["alice@example.com", "bob@example.com"]);
    }

    #[test]
    fn test_header_variants() {
        for header in ["Email", "EMAIL", "email_address", "Email Address"] {
            let file = csv_file(&format!("{header}\ncarol@example.com\n"));
            let recipients = load_recipients(file.path()).unwrap();
            assert_eq!(recipients, vec!["carol@example.com"], "header {header}");
        }
    }

    #[test]
    fn test_empty_values_skipped_and_whitespace_trimmed() {
        let file = csv_file("email\n alice@example.com \n\" \"\nbob@example.com\n");
        let recipients = load_recipients(file.path()).unwrap();
        assert_eq!(recipients, vec!["alice@example.com", "bob@example.com"]);
    }

    #[test]
    fn test_no_email_column_yields_empty_list() {
        let file = csv_file("name,phone\nAlice,555-0100\n");
        let recipients = load_recipients(file.path()).unwrap();
        assert!(recipients.is_empty());
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let result = load_recipients(Path::new("/nonexistent/recipients.csv"));
        assert!(matches!(result, Err(DispatcherError::CsvRead { .. })));
    }
}
