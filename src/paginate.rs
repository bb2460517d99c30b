// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Drive a RecordSource to exhaustion for one filter, yielding the complete record set
// role: core/paginator
// inputs: RecordSource, filter string, page size, field projection
// outputs: The full ordered record set for the filter
// invariants:
// - Pages are requested strictly in order; the short-page signal is the primary terminator
// - No partial results: any page failure fails the whole scan
// - Returned set is duplicate-free by record id
// errors: SourceUnavailable bubbles from the source; inconsistent pages are Protocol
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::model::Record;
use crate::source::RecordSource;

/// Fetch every record matching `filter`, walking pages of `page_size`.
///
/// Terminates on a short page (primary, robust against `total_known` drifting
/// while the source mutates) or once the cumulative count reaches the most
/// recently reported total. An empty first page is an empty match, not an
/// error.
pub fn fetch_all(
  source: &dyn RecordSource,
  filter: &str,
  page_size: usize,
  fields: &[&str],
) -> Result<Vec<Record>> {
  if page_size == 0 {
    return Err(Error::InvalidWindow("page size must be at least 1".into()));
  }

  let mut all: Vec<Record> = Vec::new();
  let mut seen: HashSet<String> = HashSet::new();
  let mut offset = 0usize;

  loop {
    let page = source.search(filter, offset, page_size, fields)?;

    if page.returned_count > page_size {
      return Err(Error::Protocol(format!(
        "page at offset {offset} returned {} records for a limit of {page_size}",
        page.returned_count
      )));
    }

    for record in page.records {
      if !seen.insert(record.id.clone()) {
        return Err(Error::Protocol(format!(
          "duplicate record id {:?} across pages",
          record.id
        )));
      }
      all.push(record);
    }

    // Short page means the source is out of records, whatever total it claims.
    if page.returned_count < page_size {
      break;
    }

    if all.len() >= page.total_known {
      break;
    }

    offset += page_size;
  }

  Ok(all)
}
