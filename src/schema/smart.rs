use super::{FieldKind, FieldSpec, LogPageSchema};
use crate::types::{LID_SMART_CLOUD_ATTRIBUTES, SMART_CLOUD_ATTR_LEN, SMART_CLOUD_GUID};
use crate::version::VersionField;

// ─── SMART / Health Extended (Cloud Attributes) ─────────────────────────────

const SCAO_PMUW: usize = 0; // Physical media units written
const SCAO_PMUR: usize = 16; // Physical media units read
const SCAO_BUNBR: usize = 32; // Bad user nand blocks raw
const SCAO_BUNBN: usize = 38; // Bad user nand blocks normalized
const SCAO_BSNBR: usize = 40; // Bad system nand blocks raw
const SCAO_BSNBN: usize = 46; // Bad system nand blocks normalized
const SCAO_XRC: usize = 48; // XOR recovery count
const SCAO_UREC: usize = 56; // Uncorrectable read error count
const SCAO_SEEC: usize = 64; // Soft ecc error count
const SCAO_EEDE: usize = 72; // End to end detected errors
const SCAO_EECE: usize = 76; // End to end corrected errors
const SCAO_SDPU: usize = 80; // System data percent used
const SCAO_RFSC: usize = 81; // Refresh counts
const SCAO_MXUDEC: usize = 88; // Max user data erase counts
const SCAO_MNUDEC: usize = 92; // Min user data erase counts
const SCAO_NTTE: usize = 96; // Number of thermal throttling events
const SCAO_CTS: usize = 97; // Current throttling status
const SCAO_EVF: usize = 98; // Errata version field
const SCAO_PVF: usize = 99; // Point version field
const SCAO_MIVF: usize = 101; // Minor version field
const SCAO_MAVF: usize = 103; // Major version field
const SCAO_PCEC: usize = 104; // PCIe correctable error count
const SCAO_ICS: usize = 112; // Incomplete shutdowns
const SCAO_PFB: usize = 120; // Percent free blocks
const SCAO_CPH: usize = 128; // Capacitor health
const SCAO_NEV: usize = 130; // NVMe errata version
const SCAO_UIO: usize = 136; // Unaligned I/O
const SCAO_SVN: usize = 144; // Security version number
const SCAO_NUSE: usize = 152; // Namespace utilization
const SCAO_PSC: usize = 160; // PLP start count
const SCAO_EEST: usize = 176; // Endurance estimate
const SCAO_PLRC: usize = 192; // PCIe link retraining count
const SCAO_PSCC: usize = 200; // Power state change count
const SCAO_LPV: usize = 494; // Log page version
const SCAO_LPG: usize = 496; // Log page GUID

/// Fields past version 2 of the page layout.
const EXTENDED_SINCE: u16 = 3;

const NAND_RAW_MASK: u64 = 0x0000_FFFF_FFFF_FFFF;
const REFRESH_MASK: u64 = 0x00FF_FFFF_FFFF_FFFF;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::uint128("Physical Media Units Written:", "physical media units written", SCAO_PMUW),
    FieldSpec::uint128("Physical Media Units Read:", "physical media units read", SCAO_PMUR),
    FieldSpec::masked("Bad User NAND Blocks - Raw:", "bad user nand blocks raw", SCAO_BUNBR, 8, NAND_RAW_MASK)
        .grouped("bad user nand blocks", "raw"),
    FieldSpec::uint("Bad User NAND Blocks - Normalized:", "bad user nand blocks normalized", SCAO_BUNBN, 2)
        .grouped("bad user nand blocks", "normalized"),
    FieldSpec::masked("Bad System NAND Blocks - Raw:", "bad system nand blocks raw", SCAO_BSNBR, 8, NAND_RAW_MASK)
        .grouped("bad system nand blocks", "raw"),
    FieldSpec::uint("Bad System NAND Blocks - Normalized:", "bad system nand blocks normalized", SCAO_BSNBN, 2)
        .grouped("bad system nand blocks", "normalized"),
    FieldSpec::uint("XOR Recovery Count:", "xor recovery count", SCAO_XRC, 8),
    FieldSpec::uint("Uncorrectable Read Error Count:", "uncorrectable read error count", SCAO_UREC, 8),
    FieldSpec::uint("Soft ECC Error Count:", "soft ecc error count", SCAO_SEEC, 8),
    FieldSpec::uint("End to End Detected Errors:", "end to end detected errors", SCAO_EEDE, 4),
    FieldSpec::uint("End to End Corrected Errors:", "end to end corrected errors", SCAO_EECE, 4),
    FieldSpec::uint("System Data Percent Used:", "system data percent used", SCAO_SDPU, 1),
    // 7-byte counter read as a word; the mask drops the byte owned by the next field.
    FieldSpec::masked("Refresh Counts:", "refresh counts", SCAO_RFSC, 8, REFRESH_MASK),
    FieldSpec::uint("Max User Data Erase Counts:", "max user data erase counts", SCAO_MXUDEC, 4),
    FieldSpec::uint("Min User Data Erase Counts:", "min user data erase counts", SCAO_MNUDEC, 4),
    FieldSpec::uint("Number of Thermal Throttling Events:", "number of thermal throttling events", SCAO_NTTE, 1),
    FieldSpec::uint("Current Throttling Status:", "current throttling status", SCAO_CTS, 1),
    FieldSpec::uint("Errata Version:", "errata version field", SCAO_EVF, 1).since(EXTENDED_SINCE),
    FieldSpec::uint("Point Version:", "point version", SCAO_PVF, 2).since(EXTENDED_SINCE),
    FieldSpec::uint("Minor Version:", "minor version", SCAO_MIVF, 2).since(EXTENDED_SINCE),
    FieldSpec::uint("Major Version:", "major version", SCAO_MAVF, 1).since(EXTENDED_SINCE),
    FieldSpec::uint("PCIe Correctable Error Count:", "pcie correctable error count", SCAO_PCEC, 8),
    FieldSpec::uint("Incomplete Shutdowns:", "incomplete shutdowns", SCAO_ICS, 4),
    FieldSpec::uint("Percent Free Blocks:", "percent free blocks", SCAO_PFB, 1),
    FieldSpec::uint("Capacitor Health:", "capacitor health", SCAO_CPH, 2),
    FieldSpec::uint("NVMe Errata Version:", "nvme errata version", SCAO_NEV, 1).since(EXTENDED_SINCE),
    FieldSpec::uint("Unaligned I/O:", "unaligned i/o", SCAO_UIO, 8),
    FieldSpec::uint("Security Version Number:", "security version number", SCAO_SVN, 8),
    FieldSpec::uint("Namespace Utilization:", "namespace utilization", SCAO_NUSE, 8),
    FieldSpec::uint128("PLP Start Count:", "plp start count", SCAO_PSC),
    FieldSpec::uint128("Endurance Estimate:", "endurance estimate", SCAO_EEST),
    FieldSpec::uint("PCIe Link Retraining Count:", "pcie link retraining count", SCAO_PLRC, 8).since(EXTENDED_SINCE),
    FieldSpec::uint("Power State Change Count:", "power state change count", SCAO_PSCC, 8).since(EXTENDED_SINCE),
    FieldSpec::uint("Log Page Version:", "log page version", SCAO_LPV, 2),
    FieldSpec::new("Log Page GUID:", "log page guid", SCAO_LPG, FieldKind::Guid),
];

pub static SMART_CLOUD_ATTRIBUTES: LogPageSchema = LogPageSchema {
    log_id: LID_SMART_CLOUD_ATTRIBUTES,
    name: "smart-add-log",
    title: "SMART Cloud Health Log Page Data:",
    label_width: 40,
    total_length: SMART_CLOUD_ATTR_LEN,
    guid: Some(SMART_CLOUD_GUID),
    guid_offset: SCAO_LPG,
    version: Some(VersionField::u16_at(SCAO_LPV)),
    versions: 0..=u16::MAX,
    fields: FIELDS,
};
