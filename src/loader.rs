use crate::error::{Error, Result};

/// One line of an agent's request file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    pub family_name: String,
    pub requested_hour: i64,
    pub party_size: i64,
}

/// Reads a request file: one `family,hour,party_size` record per line.
///
/// Malformed records (wrong field count, unparsable numbers, empty family
/// name) are reported and skipped; only an unreadable file is fatal. The
/// reader is flexible so a short or long row reaches the skip path instead
/// of aborting the whole file.
pub fn load_requests(path: &str) -> Result<Vec<RequestRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::RequestFile { path: path.to_string(), detail: e.to_string() })?;

    let mut requests = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping unreadable record on line {} of '{}': {}", line + 1, path, e);
                continue;
            }
        };
        match parse_record(&record) {
            Some(request) => requests.push(request),
            None => log::warn!("Skipping malformed record on line {} of '{}'", line + 1, path),
        }
    }
    Ok(requests)
}

fn parse_record(record: &csv::StringRecord) -> Option<RequestRecord> {
    if record.len() != 3 {
        return None;
    }
    let family_name = record.get(0)?.to_string();
    let requested_hour = record.get(1)?.parse().ok()?;
    let party_size = record.get(2)?.parse().ok()?;
    if family_name.is_empty() {
        return None;
    }
    Some(RequestRecord { family_name, requested_hour, party_size })
}
