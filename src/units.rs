use std::{fmt::Display, str::FromStr};

use anyhow::Context;

/// Amount of device memory as reported by the search process
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Megabytes(u64);

impl Display for Megabytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Megabytes {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Megabytes> for u64 {
    fn from(value: Megabytes) -> Self {
        value.0
    }
}

impl FromStr for Megabytes {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .trim()
            .parse()
            .with_context(|| format!("Failed to parse memory size in MB from {s:?}"))?;
        Ok(Self(value))
    }
}
