// Packs one group's records into page-sized table blocks.
use crate::types::{DisplayRecord, PageBlock, COLUMN_HEADERS};

fn header_row() -> Vec<String> {
    COLUMN_HEADERS.iter().map(|h| h.to_string()).collect()
}

/// Split a group's ordered records into blocks of at most `capacity` data
/// rows, each opened with the column-header row.
///
/// The group's final record never opens a block of its own: if it arrives
/// when the current block is full it is appended anyway, so the last block
/// of a group may hold `capacity + 1` data rows.
pub fn paginate(records: &[DisplayRecord], capacity: usize) -> Vec<PageBlock> {
    let capacity = capacity.max(1);
    let mut blocks: Vec<PageBlock> = Vec::new();
    let mut current: Vec<Vec<String>> = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let is_last = index + 1 == records.len();
        let data_rows = current.len().saturating_sub(1);
        if !current.is_empty() && data_rows >= capacity && !is_last {
            blocks.push(PageBlock {
                rows: std::mem::take(&mut current),
            });
        }
        if current.is_empty() {
            current.push(header_row());
        }
        current.push(record.to_row());
    }

    if !current.is_empty() {
        blocks.push(PageBlock { rows: current });
    }
    blocks
}
