//! Aggregate statistics over all provisioned machines.
//!
//! RAM and CPU are stored as free text, so totals are computed from the
//! numeric prefix of each value:
//!
//! - values that do not parse as `<number>[unit]` are skipped;
//! - if every parsed value carries the same unit, the total keeps it (`6GB`);
//! - if the units differ but are all byte units, the total is rendered in
//!   binary units (`6.50 GiB`);
//! - otherwise the bare numeric sum is shown.

use crate::parser::size::{Quantity, format_number, format_size, parse_quantity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalStats {
    pub machine_count: u64,
    pub total_ram: String,
    pub total_cpu: String,
}

impl TotalStats {
    pub fn from_machines<'a, I>(machine_count: u64, machines: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let (ram, cpu): (Vec<&str>, Vec<&str>) = machines.into_iter().unzip();

        Self {
            machine_count,
            total_ram: sum_quantities(ram),
            total_cpu: sum_quantities(cpu),
        }
    }
}

/// Sums free-text quantities according to the module-level policy.
pub fn sum_quantities<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let parsed: Vec<Quantity> = values.into_iter().filter_map(parse_quantity).collect();

    let Some(first) = parsed.first() else {
        return "0".to_string();
    };

    let total: f64 = parsed.iter().map(|q| q.value).sum();

    if parsed.iter().all(|q| q.unit == first.unit) {
        return format!("{}{}", format_number(total), first.unit);
    }

    let bytes: Option<f64> = parsed.iter().map(Quantity::as_bytes).sum();
    match bytes {
        Some(bytes) => format_size(bytes),
        None => format_number(total),
    }
}
