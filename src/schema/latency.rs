use super::{CellKind, FieldKind, FieldSpec, GridSpec, LogPageSchema, OPERATION_COLUMNS};
use crate::types::{LATENCY_MONITOR_GUID, LATENCY_MONITOR_LEN, LID_LATENCY_MONITOR};
use crate::version::VersionField;

// ─── Latency Monitor (C3) ───────────────────────────────────────────────────

const LATENCY_MONITOR_VERSION: u16 = 0x0001;

const BUCKET_TIMER_INCREMENT: u64 = 5; // minutes
const THRESHOLD_INCREMENT: u64 = 5; // milliseconds
const MINIMUM_WINDOW_INCREMENT: u64 = 100; // milliseconds

const BUCKETS: usize = 4;

/// Counters are stored for four operations; the fourth is reserved.
const COUNTERS: GridSpec = GridSpec {
    rows: BUCKETS,
    stride: 4,
    cell: CellKind::Uint(4),
    columns: OPERATION_COLUMNS,
};

const TIMESTAMPS: GridSpec = GridSpec {
    rows: BUCKETS,
    stride: 3,
    cell: CellKind::Timestamp,
    columns: OPERATION_COLUMNS,
};

const MEASURED: GridSpec = GridSpec {
    rows: BUCKETS,
    stride: 3,
    cell: CellKind::Uint(2),
    columns: OPERATION_COLUMNS,
};

const fn threshold(label: &'static str, key: &'static str, offset: usize) -> FieldSpec {
    FieldSpec::uint(label, key, offset, 1)
        .scaled(1, THRESHOLD_INCREMENT)
        .unit("ms")
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::uint("Feature Status", "Feature Status", 0x00, 1).hex(),
    FieldSpec::uint("Active Bucket Timer", "Active Bucket Timer", 0x02, 2)
        .scaled(0, BUCKET_TIMER_INCREMENT)
        .unit("min"),
    FieldSpec::uint("Active Bucket Timer Threshold", "Active Bucket Timer Threshold", 0x04, 2)
        .scaled(0, BUCKET_TIMER_INCREMENT)
        .unit("min"),
    threshold("Active Threshold A", "Active Threshold A", 0x06),
    threshold("Active Threshold B", "Active Threshold B", 0x07),
    threshold("Active Threshold C", "Active Threshold C", 0x08),
    threshold("Active Threshold D", "Active Threshold D", 0x09),
    FieldSpec::new(
        "Active Latency Mode",
        "Active Latency Mode",
        0x0A,
        FieldKind::FlagGrid {
            width: 2,
            rows: BUCKETS,
            columns: OPERATION_COLUMNS,
        },
    ),
    FieldSpec::uint("Active Latency Minimum Window", "Active Latency Minimum Window", 0x0C, 1)
        .scaled(0, MINIMUM_WINDOW_INCREMENT)
        .unit("ms"),
    FieldSpec::new("Active Bucket Counter", "Active Bucket Counter", 0x20, FieldKind::Grid(COUNTERS)),
    FieldSpec::new("Active Latency Time Stamp", "Active Latency Time Stamp", 0x60, FieldKind::Grid(TIMESTAMPS)),
    FieldSpec::new("Active Measured Latency", "Active Measured Latency", 0xC0, FieldKind::Grid(MEASURED))
        .unit("ms"),
    FieldSpec::uint("Active Latency Stamp Units", "Active Latency Stamp Units", 0xD8, 2),
    FieldSpec::new("Static Bucket Counter", "Static Bucket Counter", 0xF0, FieldKind::Grid(COUNTERS)),
    FieldSpec::new("Static Latency Time Stamp", "Static Latency Time Stamp", 0x130, FieldKind::Grid(TIMESTAMPS)),
    FieldSpec::new("Static Measured Latency", "Static Measured Latency", 0x190, FieldKind::Grid(MEASURED))
        .unit("ms"),
    FieldSpec::uint("Static Latency Stamp Units", "Static Latency Stamp Units", 0x1A8, 2),
    FieldSpec::uint("Debug Log Trigger Enable", "Debug Log Trigger Enable", 0x1C0, 2),
    FieldSpec::uint("Debug Log Measured Latency", "Debug Log Measured Latency", 0x1C2, 2).unit("ms"),
    FieldSpec::new("Debug Log Latency Time Stamp", "Debug Log Latency Time Stamp", 0x1C4, FieldKind::Timestamp),
    FieldSpec::uint("Debug Log Pointer", "Debug Log Pointer", 0x1CC, 2),
    FieldSpec::uint("Debug Log Counter Trigger", "Debug Log Counter Trigger", 0x1CE, 2),
    FieldSpec::uint("Debug Log Stamp Units", "Debug Log Stamp Units", 0x1D0, 1),
    FieldSpec::uint("Log Page Version", "Log Page Version", 0x1EE, 2),
    FieldSpec::new("Log Page GUID", "Log Page GUID", 0x1F0, FieldKind::Guid),
];

pub static LATENCY_MONITOR: LogPageSchema = LogPageSchema {
    log_id: LID_LATENCY_MONITOR,
    name: "latency-monitor-log",
    title: "-Latency Monitor/C3 Log Page Data-",
    label_width: 35,
    total_length: LATENCY_MONITOR_LEN,
    guid: Some(LATENCY_MONITOR_GUID),
    guid_offset: 0x1F0,
    version: Some(VersionField::u16_at(0x1EE)),
    versions: LATENCY_MONITOR_VERSION..=LATENCY_MONITOR_VERSION,
    fields: FIELDS,
};
