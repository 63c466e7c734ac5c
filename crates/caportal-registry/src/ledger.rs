//! Parser for the CA's append-only index file
//!
//! Each line is tab-separated and tagged: `V` for a certificate that is
//! still valid, `R` for one that has been revoked. The subject DN in the
//! final field is consumed only for its embedded `CN=` component; every
//! other DN attribute is ignored.

use std::collections::HashSet;

use tracing::warn;

/// How the parser treats a line matching neither tagged format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedLinePolicy {
    /// Log the offending line and keep parsing the rest of the file.
    #[default]
    Skip,
    /// Stop at the first offending line, keeping everything parsed so far.
    /// Matches the historical behavior of the service this replaces.
    Truncate,
}

/// One index line, in the grammar's own terms.
///
/// Revocation state is carried structurally: a `Revoked` entry always has a
/// revocation timestamp, a `Valid` entry never does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEntry {
    Valid {
        created: String,
        serial: String,
        name: String,
    },
    Revoked {
        created: String,
        revoked: String,
        reason: Option<String>,
        serial: String,
        name: String,
    },
}

impl LedgerEntry {
    pub fn serial(&self) -> &str {
        match self {
            LedgerEntry::Valid { serial, .. } => serial,
            LedgerEntry::Revoked { serial, .. } => serial,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            LedgerEntry::Valid { name, .. } => name,
            LedgerEntry::Revoked { name, .. } => name,
        }
    }
}

/// Outcome of one parse pass, entries in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Parsed entries, in the order their lines appear in the file.
    pub entries: Vec<LedgerEntry>,
    /// 1-based line numbers that matched neither format.
    pub malformed_lines: Vec<usize>,
    /// Serials appearing on more than one line. The entries themselves are
    /// all kept; deduplication would hide the corruption.
    pub duplicate_serials: Vec<String>,
}

/// Parses the raw contents of the index file.
///
/// Pure function of the input bytes: parsing the same contents twice yields
/// the same report.
pub fn parse_ledger(contents: &str, policy: MalformedLinePolicy) -> ParseReport {
    let mut report = ParseReport::default();
    let mut seen: HashSet<String> = HashSet::new();

    for (idx, line) in contents.lines().enumerate() {
        let line_no = idx + 1;
        match parse_line(line) {
            Some(entry) => {
                let serial = entry.serial().to_string();
                if !seen.insert(serial.clone()) && !report.duplicate_serials.contains(&serial) {
                    warn!(line = line_no, serial = %serial, "duplicate serial in index file");
                    report.duplicate_serials.push(serial);
                }
                report.entries.push(entry);
            }
            None => {
                report.malformed_lines.push(line_no);
                match policy {
                    MalformedLinePolicy::Skip => {
                        warn!(line = line_no, content = line, "skipping malformed index line");
                    }
                    MalformedLinePolicy::Truncate => {
                        warn!(line = line_no, "malformed index line, truncating remainder");
                        break;
                    }
                }
            }
        }
    }

    report
}

fn parse_line(line: &str) -> Option<LedgerEntry> {
    let fields: Vec<&str> = line.split('\t').collect();
    match *fields.first()? {
        "V" if fields.len() >= 4 => {
            let created = non_empty(fields[1])?;
            let serial = non_empty(fields[2])?;
            let name = common_name(fields.last().copied()?)?;
            Some(LedgerEntry::Valid {
                created: created.to_string(),
                serial: serial.to_string(),
                name,
            })
        }
        "R" if fields.len() >= 5 => {
            let created = non_empty(fields[1])?;
            // The revocation field may carry a reason after the first comma.
            let (revoked, reason) = match fields[2].split_once(',') {
                Some((at, reason)) => (at, Some(reason.to_string())),
                None => (fields[2], None),
            };
            let revoked = non_empty(revoked)?;
            let serial = non_empty(fields[3])?;
            let name = common_name(fields.last().copied()?)?;
            Some(LedgerEntry::Revoked {
                created: created.to_string(),
                revoked: revoked.to_string(),
                reason,
                serial: serial.to_string(),
                name,
            })
        }
        _ => None,
    }
}

fn non_empty(field: &str) -> Option<&str> {
    if field.is_empty() {
        None
    } else {
        Some(field)
    }
}

/// Extracts the CN component from a subject DN such as `unknown /CN=alice`
/// or `/C=US/O=Example/CN=alice`.
fn common_name(subject: &str) -> Option<String> {
    let start = subject.find("CN=")? + 3;
    let rest = &subject[start..];
    let end = rest.find('/').unwrap_or(rest.len());
    let name = rest[..end].trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_line() {
        let report = parse_ledger(
            "V\t250101000000Z\t01\tunknown /CN=alice\n",
            MalformedLinePolicy::Skip,
        );
        assert_eq!(
            report.entries,
            vec![LedgerEntry::Valid {
                created: "250101000000Z".to_string(),
                serial: "01".to_string(),
                name: "alice".to_string(),
            }]
        );
        assert!(report.malformed_lines.is_empty());
        assert!(report.duplicate_serials.is_empty());
    }

    #[test]
    fn parses_revoked_line_with_reason() {
        let report = parse_ledger(
            "R\t250101000000Z\t250201000000Z,superseded\t02\tunknown /CN=bob\n",
            MalformedLinePolicy::Skip,
        );
        assert_eq!(
            report.entries,
            vec![LedgerEntry::Revoked {
                created: "250101000000Z".to_string(),
                revoked: "250201000000Z".to_string(),
                reason: Some("superseded".to_string()),
                serial: "02".to_string(),
                name: "bob".to_string(),
            }]
        );
    }

    #[test]
    fn revoked_line_without_comma_has_no_reason() {
        let report = parse_ledger(
            "R\t250101000000Z\t250201000000Z\t02\tunknown /CN=bob\n",
            MalformedLinePolicy::Skip,
        );
        match &report.entries[0] {
            LedgerEntry::Revoked {
                revoked, reason, ..
            } => {
                assert_eq!(revoked, "250201000000Z");
                assert_eq!(*reason, None);
            }
            other => panic!("expected revoked entry, got {other:?}"),
        }
    }

    #[test]
    fn reason_splits_on_first_comma_only() {
        let report = parse_ledger(
            "R\t250101000000Z\t250201000000Z,key compromise, really\t02\tunknown /CN=bob\n",
            MalformedLinePolicy::Skip,
        );
        match &report.entries[0] {
            LedgerEntry::Revoked { reason, .. } => {
                assert_eq!(reason.as_deref(), Some("key compromise, really"));
            }
            other => panic!("expected revoked entry, got {other:?}"),
        }
    }

    #[test]
    fn preserves_file_order() {
        let contents = "V\t250101000000Z\t01\tunknown /CN=alice\n\
                        R\t250102000000Z\t250201000000Z\t02\tunknown /CN=bob\n\
                        V\t250103000000Z\t03\tunknown /CN=carol\n";
        let report = parse_ledger(contents, MalformedLinePolicy::Skip);
        let names: Vec<&str> = report.entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn truncate_policy_stops_at_first_malformed_line() {
        // The historical contract: a corrupt line drops everything after it.
        let contents = "V\t250101000000Z\t01\tunknown /CN=alice\n\
                        V\t250102000000Z\t02\tunknown /CN=bob\n\
                        garbage\tunparseable\n\
                        V\t250103000000Z\t03\tunknown /CN=carol\n";
        let report = parse_ledger(contents, MalformedLinePolicy::Truncate);
        let names: Vec<&str> = report.entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
        assert_eq!(report.malformed_lines, vec![3]);
    }

    #[test]
    fn skip_policy_keeps_lines_after_malformed_one() {
        let contents = "V\t250101000000Z\t01\tunknown /CN=alice\n\
                        garbage\tunparseable\n\
                        V\t250103000000Z\t03\tunknown /CN=carol\n";
        let report = parse_ledger(contents, MalformedLinePolicy::Skip);
        let names: Vec<&str> = report.entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["alice", "carol"]);
        assert_eq!(report.malformed_lines, vec![2]);
    }

    #[test]
    fn duplicate_serials_are_flagged_but_both_kept() {
        let contents = "V\t250101000000Z\t01\tunknown /CN=alice\n\
                        V\t250102000000Z\t01\tunknown /CN=alice\n";
        let report = parse_ledger(contents, MalformedLinePolicy::Skip);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.duplicate_serials, vec!["01".to_string()]);
    }

    #[test]
    fn extracts_cn_from_multi_component_dn() {
        let report = parse_ledger(
            "V\t250101000000Z\t0A\tunknown\t/C=US/O=Example/CN=web01/emailAddress=ops@example.com\n",
            MalformedLinePolicy::Skip,
        );
        assert_eq!(report.entries[0].name(), "web01");
    }

    #[test]
    fn line_with_unknown_tag_is_malformed() {
        let report = parse_ledger(
            "E\t250101000000Z\t01\tunknown /CN=alice\n",
            MalformedLinePolicy::Skip,
        );
        assert!(report.entries.is_empty());
        assert_eq!(report.malformed_lines, vec![1]);
    }

    #[test]
    fn missing_cn_token_is_malformed() {
        let report = parse_ledger(
            "V\t250101000000Z\t01\tunknown /O=Example\n",
            MalformedLinePolicy::Skip,
        );
        assert!(report.entries.is_empty());
        assert_eq!(report.malformed_lines, vec![1]);
    }

    #[test]
    fn parsing_is_idempotent() {
        let contents = "V\t250101000000Z\t01\tunknown /CN=alice\n\
                        bad line\n\
                        R\t250102000000Z\t250201000000Z,superseded\t02\tunknown /CN=bob\n";
        let first = parse_ledger(contents, MalformedLinePolicy::Skip);
        let second = parse_ledger(contents, MalformedLinePolicy::Skip);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_parses_to_empty_report() {
        let report = parse_ledger("", MalformedLinePolicy::Skip);
        assert!(report.entries.is_empty());
        assert!(report.malformed_lines.is_empty());
    }
}
