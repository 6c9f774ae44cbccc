use crate::db::{ClientRow, HardDiskRow};
use crate::domain::TotalStats;

pub const END_OF_LIST: &str = "End of the list";

const MISSING: &str = "N/A";

#[must_use]
pub fn client_line(row: &ClientRow) -> String {
    let field = |v: &Option<String>| v.clone().unwrap_or_else(|| MISSING.to_string());
    format!(
        "Username: {}, Client ID: {}, RAM: {}, CPU: {}, HDD Size: {}, HDD ID: {}",
        row.username,
        row.client_id,
        field(&row.ram_size),
        field(&row.cpu_count),
        field(&row.hdd_size),
        field(&row.hdd_id),
    )
}

#[must_use]
pub fn hard_disk_line(row: &HardDiskRow) -> String {
    format!("Username: {}, HDD Size: {}", row.username, row.hdd_size)
}

#[must_use]
pub fn stats_line(stats: &TotalStats) -> String {
    format!(
        "Total machines: {}, Total RAM: {}, Total CPU: {}",
        stats.machine_count, stats.total_ram, stats.total_cpu
    )
}

/// Frames rendered rows between a header and the end-of-list footer.
pub fn listing<I>(header: &str, rows: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut lines = vec![header.to_string()];
    lines.extend(rows);
    lines.push(END_OF_LIST.to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ram: Option<&str>) -> ClientRow {
        ClientRow {
            username: "test_user".to_string(),
            client_id: "test_id".to_string(),
            ram_size: ram.map(String::from),
            cpu_count: ram.map(|_| "2".to_string()),
            hdd_size: ram.map(|_| "500GB".to_string()),
            hdd_id: ram.map(|_| "hdd_001".to_string()),
        }
    }

    #[test]
    fn renders_full_client_row() {
        assert_eq!(
            client_line(&row(Some("2GB"))),
            "Username: test_user, Client ID: test_id, RAM: 2GB, CPU: 2, HDD Size: 500GB, HDD ID: hdd_001"
        );
    }

    #[test]
    fn renders_missing_machine_fields() {
        assert_eq!(
            client_line(&row(None)),
            "Username: test_user, Client ID: test_id, RAM: N/A, CPU: N/A, HDD Size: N/A, HDD ID: N/A"
        );
    }

    #[test]
    fn frames_listing() {
        let lines = listing("List of hard disks:", vec!["a".to_string()]);
        assert_eq!(lines, vec!["List of hard disks:", "a", END_OF_LIST]);
    }

    #[test]
    fn renders_stats() {
        let stats = TotalStats {
            machine_count: 2,
            total_ram: "6GB".to_string(),
            total_cpu: "6".to_string(),
        };
        assert_eq!(
            stats_line(&stats),
            "Total machines: 2, Total RAM: 6GB, Total CPU: 6"
        );
    }
}
