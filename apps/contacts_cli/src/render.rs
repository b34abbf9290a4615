use std::fmt::Write as _;

use shared::{domain::Contact, error::FieldErrors};

const HEADERS: [&str; 4] = ["ID", "Name", "Email", "Phone"];

pub fn format_table(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return "No contacts.\n".to_string();
    }

    let rows = contacts
        .iter()
        .map(|c| [c.id.as_str(), c.name.as_str(), c.email.as_str(), c.phone.as_str()])
        .collect::<Vec<_>>();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADERS, &widths);
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    write_row(&mut out, &rule.iter().map(String::as_str).collect::<Vec<_>>(), &widths);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[&str], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

pub fn format_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}\n"))
        .collect()
}
