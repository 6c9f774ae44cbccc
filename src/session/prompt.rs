//! Ordered field prompts for the provisioning and update flows.

use crate::domain::{ClientId, MachineSpec};

pub type Validator = fn(&str) -> Result<(), &'static str>;

/// One value the session asks the peer for.
#[derive(Debug, Clone, Copy)]
pub struct FieldPrompt {
    /// Human-readable field name used in error messages.
    pub name: &'static str,
    pub prompt: &'static str,
    pub validate: Validator,
}

impl FieldPrompt {
    const fn required(name: &'static str, prompt: &'static str) -> Self {
        Self {
            name,
            prompt,
            validate: non_empty,
        }
    }
}

pub fn non_empty(value: &str) -> Result<(), &'static str> {
    if value.is_empty() {
        Err("must not be empty")
    } else {
        Ok(())
    }
}

pub const USERNAME: FieldPrompt = FieldPrompt::required("Username", "Enter your username:");

pub const PROVISION_FIELDS: [FieldPrompt; 4] = [
    FieldPrompt::required("RAM size", "Enter RAM size:"),
    FieldPrompt::required("CPU count", "Enter CPU count:"),
    FieldPrompt::required("HDD size", "Enter HDD size:"),
    FieldPrompt::required("HDD ID", "Enter HDD ID:"),
];

pub const REMOVE_TARGET: FieldPrompt = FieldPrompt::required(
    "Client ID",
    "Enter client_id to remove the virtual machine:",
);

pub const UPDATE_FIELDS: [FieldPrompt; 5] = [
    FieldPrompt::required("Client ID", "Enter client_id to update client information:"),
    FieldPrompt::required("RAM size", "Enter new RAM size:"),
    FieldPrompt::required("CPU count", "Enter new CPU count:"),
    FieldPrompt::required("HDD size", "Enter new HDD size:"),
    FieldPrompt::required("HDD ID", "Enter new HDD ID:"),
];

/// Builds a spec from answers given in `PROVISION_FIELDS` order.
#[must_use]
pub fn machine_spec(answers: [String; 4]) -> MachineSpec {
    let [ram_size, cpu_count, hdd_size, hdd_id] = answers;
    MachineSpec {
        ram_size,
        cpu_count,
        hdd_size,
        hdd_id,
    }
}

/// Splits answers given in `UPDATE_FIELDS` order into target and new spec.
#[must_use]
pub fn update_request(answers: [String; 5]) -> (ClientId, MachineSpec) {
    let [client_id, ram_size, cpu_count, hdd_size, hdd_id] = answers;
    (
        ClientId::from(client_id),
        machine_spec([ram_size, cpu_count, hdd_size, hdd_id]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_rejects_blank() {
        assert!(non_empty("").is_err());
        assert!(non_empty("2GB").is_ok());
    }

    #[test]
    fn update_request_splits_target() {
        let answers = ["id1", "4GB", "4", "1TB", "hdd_002"].map(String::from);
        let (target, spec) = update_request(answers);
        assert_eq!(target.as_str(), "id1");
        assert_eq!(spec, MachineSpec::new("4GB", "4", "1TB", "hdd_002"));
    }

    #[test]
    fn prompts_end_without_trailing_space() {
        for field in PROVISION_FIELDS.iter().chain(UPDATE_FIELDS.iter()) {
            assert!(field.prompt.ends_with(':'), "{}", field.prompt);
        }
    }
}
