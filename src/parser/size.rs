use regex::Regex;
use std::sync::OnceLock;

/// A number with an optional trailing unit, e.g. `2GB`, `4`, `1.5 TiB`.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    /// Upper-cased unit, empty when the value had none.
    pub unit: String,
}

impl Quantity {
    /// Size in bytes if the unit is a known byte unit.
    #[must_use]
    pub fn as_bytes(&self) -> Option<f64> {
        byte_multiplier(&self.unit).map(|m| self.value * m)
    }
}

#[must_use]
pub fn parse_quantity(input: &str) -> Option<Quantity> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^(\d+(?:\.\d+)?)\s*([A-Za-z]*)$").expect("Invalid regex")
    });

    let caps = re.captures(input.trim())?;
    let value: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps
        .get(2)
        .map(|m| m.as_str().to_uppercase())
        .unwrap_or_default();

    Some(Quantity { value, unit })
}

fn byte_multiplier(unit: &str) -> Option<f64> {
    let m = match unit {
        "B" => 1.0,
        "KIB" => 1024.0,
        "MIB" => 1024.0 * 1024.0,
        "GIB" => 1024.0 * 1024.0 * 1024.0,
        "TIB" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        "KB" => 1000.0,
        "MB" => 1000.0 * 1000.0,
        "GB" => 1000.0 * 1000.0 * 1000.0,
        "TB" => 1000.0 * 1000.0 * 1000.0 * 1000.0,
        _ => return None,
    };
    Some(m)
}

/// Formats a plain number, dropping the fraction when it is whole.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let s = format!("{value:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[must_use]
pub fn format_size(bytes: f64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    const TB: f64 = GB * 1024.0;

    if bytes >= TB {
        format!("{:.2} TiB", bytes / TB)
    } else if bytes >= GB {
        format!("{:.2} GiB", bytes / GB)
    } else if bytes >= MB {
        format!("{:.2} MiB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.2} KiB", bytes / KB)
    } else {
        format!("{} B", format_number(bytes))
    }
}
