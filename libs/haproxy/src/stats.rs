//! Parsing of the HAProxy CSV stats feed.
//!
//! The feed starts with a `# `-prefixed header line naming the columns,
//! followed by one comma-separated row per frontend, backend or server.
//! Column positions are not fixed across HAProxy versions, so parsing is
//! header-driven: the required columns are located by name first.

use thiserror::Error;

/// Columns the parser needs to find in the feed header.
const REQUIRED_COLUMNS: [&str; 7] = [
    "pxname",
    "svname",
    "status",
    "check_status",
    "iid",
    "type",
    "bck",
];

/// Row type discriminator for server rows (frontend = 0, backend = 1).
const TYPE_SERVER: &str = "2";

/// One server's state as reported by a single node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRecord {
    /// Server name, unique within a node's backend.
    pub name: String,

    /// Raw status string (`UP`, `UP 1/2`, `DRAIN`, `MAINT`, `DOWN`, ...).
    ///
    /// Kept verbatim: the upstream vocabulary is open-ended and all control
    /// decisions compare this string, never a classification of it.
    pub status: String,

    /// Health-check annotation, empty when the feed has none.
    pub check_status: String,

    /// Backend instance id the node assigned to this backend.
    pub instance_id: String,
}

/// Errors produced while parsing a stats feed.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The feed had no header line.
    #[error("stats feed is empty")]
    EmptyFeed,

    /// The header is missing a column the parser relies on.
    #[error("stats feed header is missing the '{0}' column")]
    MissingColumn(&'static str),

    /// A data row has fewer fields than the header announced.
    #[error("stats feed row {line} is truncated")]
    TruncatedRow { line: usize },

    /// Server rows of one backend disagree about the backend instance id.
    ///
    /// The instance id scopes state-change requests; picking one of several
    /// would risk targeting the wrong backend, so this is fatal.
    #[error("backend '{backend}' reports conflicting instance ids ('{first}' vs '{other}')")]
    InconsistentInstanceId {
        backend: String,
        first: String,
        other: String,
    },
}

/// Parse one node's stats feed into server records for `backend`.
///
/// Keeps only rows that are real servers (type 2), belong to the requested
/// backend and are not backup servers. The result is sorted by server name.
pub fn parse_backend_stats(feed: &str, backend: &str) -> Result<Vec<ServerRecord>, StatsError> {
    let mut lines = feed.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break line,
            None => return Err(StatsError::EmptyFeed),
        }
    };

    let columns: Vec<&str> = header
        .trim_start_matches('#')
        .trim_start()
        .split(',')
        .map(str::trim)
        .collect();

    let index_of = |name: &'static str| -> Result<usize, StatsError> {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or(StatsError::MissingColumn(name))
    };

    // Resolve all required columns up front so a malformed header fails
    // before any row is inspected.
    let mut idx = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = index_of(name)?;
    }
    let [pxname, svname, status, check_status, iid, row_type, bck] = idx;
    let width = idx.iter().max().copied().unwrap_or(0);

    let mut records = Vec::new();
    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() <= width {
            return Err(StatsError::TruncatedRow { line: line_no + 1 });
        }
        if fields[row_type] != TYPE_SERVER || fields[pxname] != backend || fields[bck] != "0" {
            continue;
        }
        records.push(ServerRecord {
            name: fields[svname].to_string(),
            status: fields[status].to_string(),
            check_status: fields[check_status].to_string(),
            instance_id: fields[iid].to_string(),
        });
    }

    if let Some(first) = records.first() {
        let first_id = first.instance_id.clone();
        if let Some(other) = records.iter().find(|r| r.instance_id != first_id) {
            return Err(StatsError::InconsistentInstanceId {
                backend: backend.to_string(),
                first: first_id,
                other: other.instance_id.clone(),
            });
        }
    }

    records.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "\
# pxname,svname,qcur,scur,status,weight,act,bck,chkfail,iid,sid,type,rate,check_status,
www,FRONTEND,0,3,OPEN,,,,0,2,0,0,12,,
pool,BACKEND,0,1,UP,200,2,0,0,3,0,1,4,,
pool,web2,0,1,UP,100,1,0,0,3,2,2,2,L7OK,
pool,web1,0,0,DRAIN,100,1,0,0,3,1,2,2,L7OK,
pool,spare,0,0,UP,100,0,1,0,3,3,2,0,L7OK,
other,web9,0,0,UP,100,1,0,0,4,1,2,1,L7OK,
";

    #[test]
    fn keeps_only_server_rows_of_the_backend() {
        let records = parse_backend_stats(FEED, "pool").unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        // FRONTEND/BACKEND rows, the backup server and the other backend
        // are all excluded.
        assert_eq!(names, ["web1", "web2"]);
    }

    #[test]
    fn records_are_sorted_and_typed() {
        let records = parse_backend_stats(FEED, "pool").unwrap();
        assert_eq!(records[0].name, "web1");
        assert_eq!(records[0].status, "DRAIN");
        assert_eq!(records[0].check_status, "L7OK");
        assert_eq!(records[0].instance_id, "3");
        assert_eq!(records[1].status, "UP");
    }

    #[test]
    fn header_positions_are_not_assumed() {
        // Same columns, different order.
        let feed = "\
# svname,pxname,iid,bck,type,status,check_status
web1,pool,7,0,2,UP,L7OK
web2,pool,7,0,2,MAINT,
";
        let records = parse_backend_stats(feed, "pool").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].instance_id, "7");
        assert_eq!(records[1].status, "MAINT");
        assert_eq!(records[1].check_status, "");
    }

    #[test]
    fn missing_column_is_a_hard_error() {
        let feed = "# pxname,svname,status,iid,type,bck\npool,web1,UP,3,2,0\n";
        let err = parse_backend_stats(feed, "pool").unwrap_err();
        assert!(matches!(err, StatsError::MissingColumn("check_status")));
    }

    #[test]
    fn truncated_row_is_a_hard_error() {
        let feed = "\
# pxname,svname,status,check_status,iid,type,bck
pool,web1,UP
";
        let err = parse_backend_stats(feed, "pool").unwrap_err();
        assert!(matches!(err, StatsError::TruncatedRow { line: 2 }));
    }

    #[test]
    fn conflicting_instance_ids_are_a_fetch_error() {
        let feed = "\
# pxname,svname,status,check_status,iid,type,bck
pool,web1,UP,L7OK,3,2,0
pool,web2,UP,L7OK,4,2,0
";
        let err = parse_backend_stats(feed, "pool").unwrap_err();
        match err {
            StatsError::InconsistentInstanceId {
                backend,
                first,
                other,
            } => {
                assert_eq!(backend, "pool");
                assert_eq!(first, "3");
                assert_eq!(other, "4");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_feed_is_an_error() {
        assert!(matches!(
            parse_backend_stats("", "pool").unwrap_err(),
            StatsError::EmptyFeed
        ));
    }

    #[test]
    fn unknown_backend_yields_no_records() {
        let records = parse_backend_stats(FEED, "nope").unwrap();
        assert!(records.is_empty());
    }
}
