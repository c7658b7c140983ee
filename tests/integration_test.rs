use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

use anyhow::{Result, anyhow};
use tempfile::NamedTempFile;

fn run_reconciler(import_path: &Path) -> Result<Output> {
    let binary_path = env!("CARGO_BIN_EXE_vendor-price-reconciler");

    let output = Command::new(binary_path)
        .arg(import_path)
        .arg(Path::new("samples").join("products.csv"))
        .arg(Path::new("samples").join("vendors.csv"))
        .output()?;

    Ok(output)
}

/// Stdout is three blank-line-separated sections: the preview rows, the
/// commit summary, and the exported store contents.
fn split_sections(stdout: &str) -> Result<(Vec<String>, Vec<String>, Vec<String>)> {
    let sections: Vec<&str> = stdout.trim_end().split("\n\n").collect();

    if sections.len() != 3 {
        return Err(anyhow!("Expected 3 report sections, got {}", sections.len()));
    }

    let lines = |section: &str| section.lines().map(str::to_string).collect::<Vec<_>>();

    Ok((lines(sections[0]), lines(sections[1]), lines(sections[2])))
}

#[test]
fn test_cli_previews_and_commits_sample() -> Result<()> {
    let output = run_reconciler(&Path::new("samples").join("import.csv"))?;

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let (preview, summary, exported) = split_sections(&stdout)?;

    assert_eq!(
        preview.first().map(String::as_str),
        Some("row_number,product_default_code,vendor_name,price,valid_from,valid_to,product_id,vendor_id,action,status,message")
    );
    assert_eq!(preview.len(), 6);

    let mut rows = HashMap::new();

    for line in &preview[1..] {
        let fields: Vec<&str> = line.split(',').collect();
        assert_eq!(fields.len(), 11);
        rows.insert(fields[0].to_string(), (fields[8].to_string(), fields[9].to_string(), fields[10].to_string()));
    }

    let row = |number: &str| rows.get(number).ok_or_else(|| anyhow!("Row {number} missing from preview"));

    assert_eq!(row("2")?, &("create".to_string(), "ok".to_string(), String::new()));
    assert_eq!(row("3")?, &("create".to_string(), "ok".to_string(), String::new()));
    assert_eq!(row("4")?.2, "Vendor not found or not a supplier");
    assert_eq!(row("5")?.2, "Product not found");
    assert_eq!(row("6")?.2, "Invalid price");

    assert_eq!(summary, vec!["Created: 2", "Updated: 0", "Errors: 3"]);

    assert_eq!(
        exported.first().map(String::as_str),
        Some("product_default_code,vendor_name,price,valid_from,valid_to,notes")
    );
    assert_eq!(exported.len(), 3);
    assert!(exported.iter().any(|line| line.starts_with("SKU123,Acme Supplies,19.99,2024-01-01,2024-06-30")));
    assert!(exported.iter().any(|line| line.starts_with("SKU456,Globex Industrial,7.25,2024-02-15,")));

    Ok(())
}

#[test]
fn test_cli_rejects_missing_required_columns() -> Result<()> {
    let output = run_reconciler(&Path::new("samples").join("missing_vendor.csv"))?;

    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;

    assert!(stderr.contains("Missing required columns: vendor_name"));

    let stdout = String::from_utf8(output.stdout)?;

    assert!(stdout.is_empty());

    Ok(())
}

#[test]
fn test_cli_counts_error_rows_from_generated_file() -> Result<()> {
    let mut file = NamedTempFile::new()?;

    writeln!(file, "product_default_code,vendor_name,price,valid_from,valid_to")?;
    writeln!(file, "SKU123,Acme Supplies,19.99,2024-01-01,2023-12-31")?;
    writeln!(file, "SKU456,Globex Industrial,7.25,2024-02-15,")?;

    let output = run_reconciler(file.path())?;

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let (preview, summary, _) = split_sections(&stdout)?;

    assert!(preview[1].ends_with("valid_to is before valid_from"));
    assert_eq!(summary, vec!["Created: 1", "Updated: 0", "Errors: 1"]);

    Ok(())
}
