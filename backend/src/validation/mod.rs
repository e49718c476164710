//! Insert-time checks for candidate records.
//!
//! Every column is `NOT NULL`; an empty CSV cell is the CSV spelling of a
//! null, so blank strings are rejected here instead of by the database.
//! Scores are expected in 0..=10 but are deliberately not range-checked.

use crate::models::{CandidateRaw, CandidateTransformed};

fn require_text(field: &str, value: &str, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push(format!("{} is empty", field));
    }
}

fn check_shared(
    first_name: &str,
    last_name: &str,
    email: &str,
    country: &str,
    yoe: i32,
    seniority: &str,
    technology: &str,
) -> Vec<String> {
    let mut errors = Vec::new();
    require_text("First_Name", first_name, &mut errors);
    require_text("Last_Name", last_name, &mut errors);
    require_text("Email", email, &mut errors);
    require_text("Country", country, &mut errors);
    require_text("Seniority", seniority, &mut errors);
    require_text("Technology", technology, &mut errors);
    if yoe < 0 {
        errors.push(format!("YOE must be non-negative, got {}", yoe));
    }
    errors
}

/// Validate a raw record.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with one message per failed check
pub fn validate_raw(record: &CandidateRaw) -> Result<(), Vec<String>> {
    let errors = check_shared(
        &record.first_name,
        &record.last_name,
        &record.email,
        &record.country,
        record.yoe,
        &record.seniority,
        &record.technology,
    );
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a transformed record. Adds the `ID` and `Hired` checks.
pub fn validate_transformed(record: &CandidateTransformed) -> Result<(), Vec<String>> {
    let mut errors = check_shared(
        &record.first_name,
        &record.last_name,
        &record.email,
        &record.country,
        record.yoe,
        &record.seniority,
        &record.technology,
    );
    if record.id < 1 {
        errors.push(format!("ID must be positive, got {}", record.id));
    }
    if record.hired != 0 && record.hired != 1 {
        errors.push(format!("Hired must be 0 or 1, got {}", record.hired));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a batch and collect row-tagged messages (rows are 1-based).
///
/// At most `limit` failing rows are reported.
pub fn validate_batch<T, F>(records: &[T], check: F, limit: usize) -> Result<(), Vec<String>>
where
    F: Fn(&T) -> Result<(), Vec<String>>,
{
    let failures: Vec<String> = records
        .iter()
        .enumerate()
        .filter_map(|(i, r)| check(r).err().map(|errs| format!("row {}: {}", i + 1, errs.join(", "))))
        .take(limit)
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}
