//! Output rendering for check results.

use std::fmt::{self, Write};

use colored::Colorize;
use dns_propagation_core::{DomainCheckResult, PropagationSummary, RecordValue};
use serde::Serialize;

const MISSING: &str = "*MISSING*";
const FAILED: &str = "*FAILED*";
const EXPECTED_TXT: &str = "v=spf1 mx a -all";

/// JSON document printed per domain with `--format json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport<'a> {
    #[serde(flatten)]
    pub result: &'a DomainCheckResult,
    pub summary: PropagationSummary,
}

impl<'a> JsonReport<'a> {
    pub fn new(result: &'a DomainCheckResult) -> Self {
        Self {
            result,
            summary: result.propagation.summary(),
        }
    }
}

/// Display text of a value: comma-joined values, or `*MISSING*`.
fn display(value: &RecordValue) -> String {
    match value {
        RecordValue::Resolved(values) => values.join(", "),
        RecordValue::Missing => MISSING.to_string(),
    }
}

/// Tag `text` as good (green, `ok`) or bad (red, `bad`).
fn tagged(text: &str, good: bool) -> String {
    if good {
        format!("{} [ok]", text.green().bold())
    } else {
        format!("{} [bad]", text.red().bold())
    }
}

/// Tag a record value against an expected rendering. `Missing` is always bad.
fn checked(value: &RecordValue, expected: Option<&str>) -> String {
    let text = display(value);
    let good = !value.is_missing() && expected.is_some_and(|e| e == text);
    tagged(&text, good)
}

/// Human-readable report for one domain.
pub fn render_text(result: &DomainCheckResult) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_text(&mut out, result);
    out
}

fn write_text(out: &mut impl Write, result: &DomainCheckResult) -> fmt::Result {
    let domain = result.domain.as_str();
    let records = &result.records;
    let canonical = records.canonical_address();
    let address = display(&records.address);

    writeln!(out, "{}", format!("== {domain} ==").bold())?;
    writeln!(out, "Domain Resolution: {domain} -> {address}")?;
    writeln!(
        out,
        "PTR Resolution: {address} -> {}",
        checked(&records.ptr, Some(domain))
    )?;
    writeln!(out, "DNS Servers: {}", display(&records.nameservers))?;

    writeln!(out)?;
    writeln!(out, "DNS Resolution (Primary A Record):")?;
    for entry in &result.propagation {
        let answers = if entry.failed {
            tagged(FAILED, false)
        } else {
            entry
                .value
                .values()
                .iter()
                .map(|v| tagged(v, canonical == Some(v.as_str())))
                .collect::<Vec<_>>()
                .join("   ")
        };
        writeln!(out, "  {answers}   {}", entry.region)?;
    }

    let summary = result.propagation.summary();
    writeln!(
        out,
        "  {}/{} matched, {} mismatched, {} failed ({:.1}%)",
        summary.matched,
        summary.total,
        summary.mismatched,
        summary.failed,
        summary.consistency_percentage
    )?;

    let expected_mx = format!("10 mail.{domain}");
    writeln!(out)?;
    writeln!(out, "Standard DNS Records:")?;
    writeln!(out, "  Primary A: {}", checked(&records.primary_a, canonical))?;
    writeln!(out, "  www. A: {}", checked(&records.www_a, canonical))?;
    writeln!(out, "  mail. A: {}", checked(&records.mail_a, canonical))?;
    writeln!(
        out,
        "  MX: {}",
        checked(&records.primary_mx, Some(expected_mx.as_str()))
    )?;
    writeln!(
        out,
        "  TXT: {}",
        checked(&records.primary_txt, Some(EXPECTED_TXT))
    )
}

/// Pretty JSON for one domain.
pub fn render_json(result: &DomainCheckResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport::new(result))
}
