use std::fmt::Write;

use log::info;

use crate::{
    config::ConfigSearch,
    mailer::{send_email, MailTransport, SendOutcome},
    Megabytes, Timestamp,
};

pub const DEFAULT_TARGETS_FILE: &str = "address.txt";
pub const DEFAULT_OUTPUT_FILE: &str = "Success.txt";
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuInfo {
    pub name: String,
    pub memory_mb: Megabytes,
}

/// Description of the machine the search was started on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub hostname: String,
    pub os: String,

    /// As reported by the caller, may differ from `gpus.len()` if pairs were missing
    pub gpu_count: usize,
    pub gpus: Vec<GpuInfo>,
    pub targets_file: String,
    pub output_file: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            hostname: UNKNOWN.to_string(),
            os: UNKNOWN.to_string(),
            gpu_count: 0,
            gpus: Vec::new(),
            targets_file: DEFAULT_TARGETS_FILE.to_string(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

/// A key found by the search that matches a target address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInfo {
    pub address: String,
    pub private_key: String,
    pub wif: String,
    pub gpu_id: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub subject: String,
    pub body: String,
}

pub fn render_startup(info: &SystemInfo, now: &Timestamp) -> Rendered {
    let subject = "🚀 Bitrecover Started - Multi-GPU Pre-2012 Search".to_string();

    let mut body = format!(
        "Bitrecover Multi-GPU Bitcoin Key Finder Started!

⏰ Time: {now}
🖥️  Host: {}
💻 OS: {}
🎯 Target: Pre-2012 Bitcoin wallets (Random 256-bit keys)
⚡ GPUs: {} device(s) detected

GPU Details:
",
        info.hostname, info.os, info.gpu_count
    );
    for (i, gpu) in info.gpus.iter().enumerate() {
        // Writing to a String cannot fail
        let _ = writeln!(body, "  GPU {i}: {} ({} MB)", gpu.name, gpu.memory_mb);
    }
    let _ = write!(
        body,
        "
📁 Targets: {}
💾 Output: {}

Starting parallel search across all GPUs...
",
        info.targets_file, info.output_file
    );

    Rendered { subject, body }
}

pub fn render_match(info: &MatchInfo) -> Rendered {
    let prefix: String = info.address.chars().take(10).collect();
    let subject = format!("🎉 BITCOIN MATCH! - {prefix}...");

    let body = format!(
        "🚀 BITCOIN MATCH FOUND! 🚀

⏰ Time: {}
📍 Address: {}
🔑 Private Key: {}
💳 WIF: {}
🎮 GPU: {}

💰 Pre-2012 wallet found!
",
        info.timestamp, info.address, info.private_key, info.wif, info.gpu_id
    );

    Rendered { subject, body }
}

/// Renders events and hands them to the mailer using freshly loaded settings
pub struct Notifier<T: MailTransport> {
    search: ConfigSearch,
    transport: T,
}

impl<T: MailTransport> Notifier<T> {
    pub fn new(search: ConfigSearch, transport: T) -> Self {
        Self { search, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn notify_startup(&self, info: &SystemInfo) -> SendOutcome {
        info!("Sending startup email notification...");
        let config = self.search.load();
        let Rendered { subject, body } = render_startup(info, &Timestamp::new());
        send_email(&subject, &body, &config, &self.transport)
    }

    pub fn notify_match(&self, info: &MatchInfo) -> SendOutcome {
        info!("Sending match email notification...");
        let config = self.search.load();
        let Rendered { subject, body } = render_match(info);
        send_email(&subject, &body, &config, &self.transport)
    }
}
