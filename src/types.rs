use chrono::{TimeZone, Utc};
use std::fmt;

// ─── Log Identifiers ────────────────────────────────────────────────────────
pub const LID_SUPPORTED_LOG_PAGES: u8 = 0x00;
pub const LID_SMART_CLOUD_ATTRIBUTES: u8 = 0xC0;
pub const LID_LATENCY_MONITOR: u8 = 0xC3;

// ─── Page Layout ────────────────────────────────────────────────────────────
//
//  SMART / Health Extended (0xC0), 512 bytes
//  ┌──────────────────────────────────────────────┐
//  │ 0x000  counters (fixed offsets, LE)          │
//  │ 0x1EE  log page version: u16                 │
//  │ 0x1F0  log page GUID: [u8; 16]               │
//  └──────────────────────────────────────────────┘
//
//  Latency Monitor (0xC3), 512 bytes
//  ┌──────────────────────────────────────────────┐
//  │ 0x000  config + thresholds                   │
//  │ 0x020  active window grids                   │
//  │ 0x0F0  static window grids                   │
//  │ 0x1C0  debug log                             │
//  │ 0x1EE  log page version: u16 (== 1)          │
//  │ 0x1F0  log page GUID: [u8; 16]               │
//  └──────────────────────────────────────────────┘
//
//  Supported Log Pages (0x00), 1024 bytes: [u32 LE; 256]

pub const GUID_LEN: usize = 16;
pub const SMART_CLOUD_ATTR_LEN: usize = 512;
pub const LATENCY_MONITOR_LEN: usize = 0x200;
pub const SUPPORTED_LOG_PAGES_ENTRIES: usize = 256;
pub const SUPPORTED_LOG_PAGES_LEN: usize = SUPPORTED_LOG_PAGES_ENTRIES * 4;

/// All-ones timestamp: the device has no value for this slot.
pub const TIMESTAMP_NOT_AVAILABLE: u64 = u64::MAX;

pub const SMART_CLOUD_GUID: Guid = Guid([
    0xC5, 0xAF, 0x10, 0x28, 0xEA, 0xBF, 0xF2, 0xA4, 0x9C, 0x4F, 0x6F, 0x7C, 0xC9, 0x14, 0xD5,
    0xAF,
]);

pub const LATENCY_MONITOR_GUID: Guid = Guid([
    0x92, 0x7A, 0xC0, 0x8C, 0xD0, 0x84, 0x6C, 0x9C, 0x70, 0x43, 0xE6, 0xD4, 0x58, 0x5E, 0xD4,
    0x85,
]);

// ─── Guid ───────────────────────────────────────────────────────────────────

/// 16-byte page identity, stored in wire order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Guid(pub [u8; GUID_LEN]);

impl Guid {
    /// Upper 64-bit word (bytes 8..16, little-endian).
    #[inline]
    pub fn hi(&self) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.0[8..16]);
        u64::from_le_bytes(word)
    }

    /// Lower 64-bit word (bytes 0..8, little-endian).
    #[inline]
    pub fn lo(&self) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.0[0..8]);
        u64::from_le_bytes(word)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}{:016x}", self.hi(), self.lo())
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Guid({self})")
    }
}

// ─── Timestamp ──────────────────────────────────────────────────────────────

/// Milliseconds since the Unix epoch, or the all-ones "not available" marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    NotAvailable,
    Millis(u64),
}

impl From<u64> for Timestamp {
    #[inline]
    fn from(raw: u64) -> Self {
        if raw == TIMESTAMP_NOT_AVAILABLE {
            Timestamp::NotAvailable
        } else {
            Timestamp::Millis(raw)
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Timestamp::NotAvailable => f.write_str("N/A"),
            Timestamp::Millis(ms) => match i64::try_from(ms)
                .ok()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            {
                Some(dt) => write!(f, "{} GMT", dt.format("%Y-%m-%d %H:%M:%S%.3f")),
                None => write!(f, "{ms}ms"),
            },
        }
    }
}

// ─── 128-bit counters ───────────────────────────────────────────────────────

/// Decimal rendering of a (hi, lo) pair.
#[inline]
pub fn u128_to_string(hi: u64, lo: u64) -> String {
    (((hi as u128) << 64) | lo as u128).to_string()
}

// ─── Log ID descriptions ────────────────────────────────────────────────────

const LOG_DESCRIPTIONS: &[(u8, &str)] = &[
    (0x00, "Supported Log Pages"),
    (0x01, "Error Information"),
    (0x02, "SMART / Health Information"),
    (0x03, "Firmware Slot Information"),
    (0x04, "Changed Namespace List"),
    (0x05, "Commands Supported and Effects"),
    (0x06, "Device Self Test"),
    (0x07, "Telemetry Host-Initiated"),
    (0x08, "Telemetry Controller-Initiated"),
    (0x09, "Endurance Group Information"),
    (0x0A, "Predictable Latency Per NVM Set"),
    (0x0B, "Predictable Latency Event Aggregate"),
    (0x0C, "Asymmetric Namespace Access"),
    (0x0D, "Persistent Event Log"),
    (0x0E, "Predictable Latency Event Aggregate"),
    (0x0F, "Endurance Group Event Aggregate"),
    (0x10, "Media Unit Status"),
    (0x11, "Supported Capacity Configuration List"),
    (0x12, "Feature Identifiers Supported and Effects"),
    (0x13, "NVMe-MI Commands Supported and Effects"),
    (0x14, "Command and Feature lockdown"),
    (0x15, "Boot Partition"),
    (0x16, "Rotational Media Information"),
    (0x70, "Discovery"),
    (0x80, "Reservation Notification"),
    (0x81, "Sanitize Status"),
    // Vendor range is assumed to be OCP.
    (0xC0, "OCP SMART / Health Information Extended"),
    (0xC1, "OCP Error Recovery or Read Commands Latency Statistics"),
    (0xC2, "OCP Firmware Activation History or Write Commands Latency Statistics"),
    (0xC3, "OCP Latency Monitor"),
    (0xC4, "OCP Device Capabilities or Endurance Manager Statistics"),
    (0xC5, "OCP Unsupported Requirements or Temperature Statistics"),
];

/// Human name of a log identifier, `"Unknown"` when not listed.
pub fn lid_to_description(lid: u8) -> &'static str {
    LOG_DESCRIPTIONS
        .iter()
        .find(|(id, _)| *id == lid)
        .map(|(_, desc)| *desc)
        .unwrap_or("Unknown")
}

/// Every described log identifier, ascending.
pub fn described_log_ids() -> impl Iterator<Item = (u8, &'static str)> {
    LOG_DESCRIPTIONS.iter().copied()
}
