//! Sender block printed above every letter.

use serde::{Deserialize, Serialize};

/// Who the letter is from. `name` also signs the letter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub name: String,
    pub address_lines: Vec<String>,
    /// Already formatted, e.g. "June 19, 2023".
    pub date: String,
}

impl ApplicantProfile {
    /// Name, address lines and date, one per line, followed by a blank line.
    pub fn letterhead(&self) -> String {
        let mut block = String::new();
        for line in std::iter::once(&self.name)
            .chain(&self.address_lines)
            .chain(std::iter::once(&self.date))
        {
            block.push_str(line);
            block.push('\n');
        }
        block.push('\n');
        block
    }
}

/// Splits a `|`-separated address into trimmed, non-empty lines.
pub fn parse_address(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
