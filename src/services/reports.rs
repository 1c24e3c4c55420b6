//! Analytics report service
//!
//! Builds the CSV borrowing reports. The CSV is spooled through a named
//! temporary file that is removed when the handle drops, on success and
//! failure alike.

use std::fs;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tempfile::NamedTempFile;

use crate::{
    error::{AppError, AppResult},
    models::borrowing::BorrowingDetails,
    repository::Repository,
};

/// A generated report ready to be sent as a file download
pub struct CsvExport {
    pub filename: &'static str,
    pub content: Vec<u8>,
}

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrowings checked out within [startDate, endDate], as CSV
    pub async fn borrowing_report(
        &self,
        start_date: Option<String>,
        end_date: Option<String>,
    ) -> AppResult<CsvExport> {
        let (start, end) = match (start_date, end_date) {
            (Some(start), Some(end)) => (parse_date(&start)?, parse_date(&end)?),
            _ => {
                return Err(AppError::Validation(
                    "startDate and endDate are required.".to_string(),
                ))
            }
        };

        let borrowings = self
            .repository
            .borrowings
            .find_in_period(start, end, false)
            .await?;

        if borrowings.is_empty() {
            return Err(AppError::NotFound(
                "No borrowings found for the specified date range.".to_string(),
            ));
        }

        Ok(CsvExport {
            filename: "borrowings-report.csv",
            content: write_csv(&borrowings, true)?,
        })
    }

    /// All borrowings checked out during the previous calendar month, as CSV
    pub async fn borrowings_last_month(&self) -> AppResult<CsvExport> {
        let (start, end) = previous_month_range(Utc::now().date_naive());

        let borrowings = self
            .repository
            .borrowings
            .find_in_period(start, end, false)
            .await?;

        if borrowings.is_empty() {
            return Err(AppError::NotFound(
                "No borrowings found for the last month.".to_string(),
            ));
        }

        Ok(CsvExport {
            filename: "all-borrowings-last-month.csv",
            content: write_csv(&borrowings, true)?,
        })
    }

    /// Unreturned borrowings of the previous calendar month that were due by
    /// the end of that month, as CSV without the Returned Date column
    pub async fn overdue_last_month(&self) -> AppResult<CsvExport> {
        let (start, end) = previous_month_range(Utc::now().date_naive());

        let borrowings = self
            .repository
            .borrowings
            .find_in_period(start, end, true)
            .await?;

        if borrowings.is_empty() {
            return Err(AppError::NotFound(
                "No overdue borrowings found for the last month.".to_string(),
            ));
        }

        Ok(CsvExport {
            filename: "overdue-borrowings-report.csv",
            content: write_csv(&borrowings, false)?,
        })
    }
}

fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format, expected YYYY-MM-DD.".to_string()))
}

/// First through last calendar day of the month preceding `today`
fn previous_month_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first_of_current = NaiveDate::from_ymd_opt(today.year(), today.month(), 1).unwrap();
    let end = first_of_current.pred_opt().unwrap();
    let start = NaiveDate::from_ymd_opt(end.year(), end.month(), 1).unwrap();
    (start, end)
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Serialize borrowings to CSV through a scoped temporary file
fn write_csv(borrowings: &[BorrowingDetails], with_returned_date: bool) -> AppResult<Vec<u8>> {
    let file = NamedTempFile::new()
        .map_err(|e| AppError::Internal(format!("Failed to create export file: {}", e)))?;

    let mut writer = csv::Writer::from_writer(&file);

    let mut header = vec![
        "Book Title",
        "Borrower Name",
        "Borrower Email",
        "Checkout Date",
        "Due Date",
    ];
    if with_returned_date {
        header.push("Returned Date");
    }
    writer
        .write_record(&header)
        .map_err(|e| AppError::Internal(format!("Failed to write CSV: {}", e)))?;

    for borrowing in borrowings {
        let (name, email) = borrowing
            .borrower
            .as_ref()
            .map(|b| (b.name.clone(), b.email.clone()))
            .unwrap_or_default();

        let mut record = vec![
            borrowing.book.title.clone(),
            name,
            email,
            format_date(borrowing.checkout_date),
            format_date(borrowing.due_date),
        ];
        if with_returned_date {
            record.push(
                borrowing
                    .returned_date
                    .map(format_date)
                    .unwrap_or_else(|| "Not Returned".to_string()),
            );
        }
        writer
            .write_record(&record)
            .map_err(|e| AppError::Internal(format!("Failed to write CSV: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::Internal(format!("Failed to write CSV: {}", e)))?;
    drop(writer);

    let content = fs::read(file.path())
        .map_err(|e| AppError::Internal(format!("Failed to read export file: {}", e)))?;

    // `file` drops here, removing the temporary artifact
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{book::Book, borrower::Borrower};
    use chrono::TimeZone;

    fn details(returned: bool) -> BorrowingDetails {
        BorrowingDetails {
            id: 1,
            checkout_date: Utc.with_ymd_and_hms(2026, 7, 3, 10, 30, 0).unwrap(),
            due_date: Utc.with_ymd_and_hms(2026, 7, 17, 10, 30, 0).unwrap(),
            returned_date: returned.then(|| Utc.with_ymd_and_hms(2026, 7, 10, 9, 0, 0).unwrap()),
            book: Book {
                id: 7,
                title: "Dune".into(),
                author: "Frank Herbert".into(),
                isbn: "978-0441172719".into(),
                available_quantity: 2,
                shelf_location: "B4".into(),
            },
            borrower: Some(Borrower {
                id: 3,
                name: "Ada Lovelace".into(),
                email: "ada@example.org".into(),
                registered_date: Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap(),
            }),
        }
    }

    #[test]
    fn previous_month_of_mid_march() {
        let (start, end) = previous_month_range(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    }

    #[test]
    fn previous_month_of_january_crosses_the_year() {
        let (start, end) = previous_month_range(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn previous_month_handles_leap_february() {
        let (start, end) = previous_month_range(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn csv_includes_not_returned_sentinel() {
        let content = write_csv(&[details(false)], true).unwrap();
        let text = String::from_utf8(content).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Book Title,Borrower Name,Borrower Email,Checkout Date,Due Date,Returned Date"
        );
        assert_eq!(
            lines.next().unwrap(),
            "Dune,Ada Lovelace,ada@example.org,2026-07-03,2026-07-17,Not Returned"
        );
    }

    #[test]
    fn csv_formats_returned_date_as_day_precision() {
        let content = write_csv(&[details(true)], true).unwrap();
        let text = String::from_utf8(content).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with("2026-07-10"));
    }

    #[test]
    fn overdue_csv_has_no_returned_date_column() {
        let content = write_csv(&[details(false)], false).unwrap();
        let text = String::from_utf8(content).unwrap();
        assert_eq!(
            text.lines().next().unwrap(),
            "Book Title,Borrower Name,Borrower Email,Checkout Date,Due Date"
        );
        assert!(!text.contains("Not Returned"));
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_date("03/07/2026").is_err());
        assert!(parse_date("2026-07-03").is_ok());
    }
}
