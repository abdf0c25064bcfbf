use std::fmt::Display;

use chrono::Local;

/// Local wall clock time rendered as `YYYY-MM-DD HH:MM:SS`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new() -> Self {
        Self(format!("{}", Local::now().format("%F %T")))
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_has_date_and_time_parts() {
        let actual = Timestamp::new().to_string();
        // 2024-01-31 23:59:59
        assert_eq!(actual.len(), 19);
        assert_eq!(&actual[4..5], "-");
        assert_eq!(&actual[10..11], " ");
        assert_eq!(&actual[13..14], ":");
    }
}
