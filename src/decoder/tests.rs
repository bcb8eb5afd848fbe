// ═══════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════
mod decoder_tests {
    use crate::decoder::{DecodeOutcome, decode, decode_log};
    use crate::error::LogPageError;
    use crate::guid::GuidCheck;
    use crate::schema::{
        CellKind, FieldKind, FieldSpec, GridSpec, LATENCY_MONITOR, LogPageSchema, OPERATION_COLUMNS,
        SMART_CLOUD_ATTRIBUTES, SUPPORTED_LOG_PAGES, all,
    };
    use crate::types::*;
    use crate::value::DecodedValue;

    /// 512-byte SMART extended page with a valid GUID and the given version.
    fn smart_page(version: u16) -> Vec<u8> {
        let mut buf = vec![0u8; SMART_CLOUD_ATTR_LEN];
        buf[494..496].copy_from_slice(&version.to_le_bytes());
        buf[496..512].copy_from_slice(&SMART_CLOUD_GUID.0);
        buf
    }

    /// 512-byte latency monitor page with a valid GUID and the given version.
    fn latency_page(version: u16) -> Vec<u8> {
        let mut buf = vec![0u8; LATENCY_MONITOR_LEN];
        buf[0x1EE..0x1F0].copy_from_slice(&version.to_le_bytes());
        buf[0x1F0..0x200].copy_from_slice(&LATENCY_MONITOR_GUID.0);
        buf
    }

    fn put_u128(buf: &mut [u8], offset: usize, hi: u64, lo: u64) {
        buf[offset..offset + 8].copy_from_slice(&lo.to_le_bytes());
        buf[offset + 8..offset + 16].copy_from_slice(&hi.to_le_bytes());
    }

    const SMART_GATED: [&str; 7] = [
        "errata version field",
        "point version",
        "minor version",
        "major version",
        "nvme errata version",
        "pcie link retraining count",
        "power state change count",
    ];

    // ═══════════════════════════════════════════════════════════════════════
    // Truncation
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_truncated_buffer_for_every_schema() {
        for schema in all() {
            for len in [0, 1, schema.total_length / 2, schema.total_length - 1] {
                let buf = vec![0xAAu8; len];
                assert_eq!(
                    decode(schema, &buf),
                    Err(LogPageError::Truncated {
                        log_id: schema.log_id,
                        expected: schema.total_length,
                        actual: len,
                    })
                );
            }
        }
    }

    #[test]
    fn test_longer_buffer_decodes_leading_bytes() {
        let mut buf = smart_page(3);
        buf.extend_from_slice(&[0xFF; 64]);
        let decoded = decode(&SMART_CLOUD_ATTRIBUTES, &buf).unwrap();
        assert!(decoded.is_valid());
        assert_eq!(decoded.page.version, 3);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // SMART / Health Extended
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_smart_counters() {
        let mut buf = smart_page(2);
        put_u128(&mut buf, 0, 1, 2);
        put_u128(&mut buf, 16, 0, 512);
        // raw word with garbage in the two masked-off bytes
        buf[32..40].copy_from_slice(&0xBEEF_0000_0000_0007u64.to_le_bytes());
        buf[38..40].copy_from_slice(&100u16.to_le_bytes());
        buf[72..76].copy_from_slice(&9u32.to_le_bytes());
        buf[80] = 42;
        buf[81..88].copy_from_slice(&[1, 0, 0, 0, 0, 0, 0]);
        buf[88..92].copy_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
        buf[128..130].copy_from_slice(&77u16.to_le_bytes());

        let decoded = decode(&SMART_CLOUD_ATTRIBUTES, &buf).unwrap();
        assert_eq!(decoded.outcome, DecodeOutcome::Valid);
        let page = decoded.page;

        assert_eq!(page.get("physical media units written").unwrap().as_u128(), Some((1, 2)));
        assert_eq!(
            page.get("physical media units written").unwrap().scalar_text(false).as_deref(),
            Some("18446744073709551618")
        );
        assert_eq!(page.get("physical media units read").unwrap().as_u128(), Some((0, 512)));
        assert_eq!(page.get("bad user nand blocks raw").unwrap().as_u64(), Some(7));
        assert_eq!(page.get("bad user nand blocks normalized").unwrap().as_u64(), Some(100));
        assert_eq!(page.get("end to end detected errors").unwrap().as_u64(), Some(9));
        assert_eq!(page.get("system data percent used").unwrap().as_u64(), Some(42));
        // the max erase count's low byte must not leak into refresh counts
        assert_eq!(page.get("refresh counts").unwrap().as_u64(), Some(1));
        assert_eq!(page.get("max user data erase counts").unwrap().as_u64(), Some(0xFFFF_FFFF));
        assert_eq!(page.get("capacitor health").unwrap().as_u64(), Some(77));
        assert_eq!(page.get("log page version").unwrap().as_u64(), Some(2));
        assert_eq!(page.get("log page guid").unwrap().as_guid(), Some(SMART_CLOUD_GUID));
    }

    #[test]
    fn test_smart_version_two_omits_gated_fields() {
        let decoded = decode(&SMART_CLOUD_ATTRIBUTES, &smart_page(2)).unwrap();
        for key in SMART_GATED {
            assert!(!decoded.page.has_field(key), "{key} present at version 2");
        }
        assert_eq!(decoded.page.len(), SMART_CLOUD_ATTRIBUTES.fields.len() - SMART_GATED.len());
    }

    #[test]
    fn test_smart_version_three_includes_gated_fields() {
        let mut buf = smart_page(3);
        buf[98] = 4;
        buf[99..101].copy_from_slice(&5u16.to_le_bytes());
        buf[101..103].copy_from_slice(&6u16.to_le_bytes());
        buf[103] = 7;
        buf[130] = 8;
        buf[192..200].copy_from_slice(&9u64.to_le_bytes());
        buf[200..208].copy_from_slice(&10u64.to_le_bytes());

        let page = decode(&SMART_CLOUD_ATTRIBUTES, &buf).unwrap().page;
        assert_eq!(page.len(), SMART_CLOUD_ATTRIBUTES.fields.len());
        let values: Vec<_> = SMART_GATED
            .iter()
            .map(|k| page.get(k).and_then(DecodedValue::as_u64))
            .collect();
        assert_eq!(
            values,
            vec![Some(4), Some(5), Some(6), Some(7), Some(8), Some(9), Some(10)]
        );
    }

    #[test]
    fn test_smart_fields_follow_wire_order() {
        let page = decode(&SMART_CLOUD_ATTRIBUTES, &smart_page(3)).unwrap().page;
        let offsets: Vec<_> = page.fields.iter().map(|f| f.spec.offset).collect();
        let mut sorted = offsets.clone();
        sorted.sort_unstable();
        assert_eq!(offsets, sorted);
        // gated fields sit between their neighbours, not at the end
        let keys: Vec<_> = page.keys().collect();
        let errata = keys.iter().position(|k| *k == "errata version field").unwrap();
        assert_eq!(keys[errata - 1], "current throttling status");
    }

    #[test]
    fn test_smart_guid_mismatch_still_extracts() {
        let mut buf = smart_page(3);
        buf[496..512].copy_from_slice(&LATENCY_MONITOR_GUID.0);
        buf[48..56].copy_from_slice(&11u64.to_le_bytes());

        let decoded = decode(&SMART_CLOUD_ATTRIBUTES, &buf).unwrap();
        assert_eq!(
            decoded.outcome,
            DecodeOutcome::GuidMismatch {
                expected: SMART_CLOUD_GUID,
                actual: LATENCY_MONITOR_GUID,
            }
        );
        assert!(matches!(decoded.page.guid, GuidCheck::Mismatch { .. }));
        assert_eq!(decoded.page.get("xor recovery count").unwrap().as_u64(), Some(11));

        match decoded.into_result() {
            Err(LogPageError::GuidMismatch { expected, actual }) => {
                assert_eq!(expected.to_string(), "0xafd514c97c6f4f9ca4f2bfea2810afc5");
                assert_eq!(actual.to_string(), "0x85d45e58d4e643709c6c84d08cc07a92");
            }
            other => panic!("expected GUID mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_smart_zeroed_guid_is_a_mismatch() {
        let mut buf = smart_page(3);
        buf[496..512].fill(0);
        let decoded = decode(&SMART_CLOUD_ATTRIBUTES, &buf).unwrap();
        assert!(!decoded.is_valid());
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Latency Monitor
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_latency_monitor_wrong_version_rejected_regardless_of_guid() {
        for version in [0u16, 2, 0x0100] {
            let good_guid = latency_page(version);
            let mut bad_guid = latency_page(version);
            bad_guid[0x1F0..0x200].fill(0x11);
            for buf in [good_guid, bad_guid] {
                assert_eq!(
                    decode(&LATENCY_MONITOR, &buf),
                    Err(LogPageError::UnsupportedVersion { log_id: 0xC3, version })
                );
            }
        }
    }

    #[test]
    fn test_latency_monitor_scaled_fields() {
        let mut buf = latency_page(1);
        buf[0x00] = 0x1F;
        buf[0x02..0x04].copy_from_slice(&3u16.to_le_bytes());
        buf[0x04..0x06].copy_from_slice(&4u16.to_le_bytes());
        buf[0x06] = 0;
        buf[0x07] = 1;
        buf[0x08] = 9;
        buf[0x09] = 255;
        buf[0x0C] = 2;

        let page = decode(&LATENCY_MONITOR, &buf).unwrap().into_result().unwrap();
        let get = |k: &str| page.get(k).and_then(DecodedValue::as_u64);
        assert_eq!(get("Feature Status"), Some(0x1F));
        assert_eq!(get("Active Bucket Timer"), Some(15));
        assert_eq!(get("Active Bucket Timer Threshold"), Some(20));
        assert_eq!(get("Active Threshold A"), Some(5));
        assert_eq!(get("Active Threshold B"), Some(10));
        assert_eq!(get("Active Threshold C"), Some(50));
        assert_eq!(get("Active Threshold D"), Some(1280));
        assert_eq!(get("Active Latency Minimum Window"), Some(200));
    }

    #[test]
    fn test_latency_monitor_grids() {
        let mut buf = latency_page(1);
        // bucket 2, write counter; the reserved fourth column is ignored
        buf[0x20 + (2 * 4 + 1) * 4..][..4].copy_from_slice(&1234u32.to_le_bytes());
        buf[0x20 + (2 * 4 + 3) * 4..][..4].copy_from_slice(&9999u32.to_le_bytes());
        // active timestamps: bucket 0 read available, everything else N/A
        for cell in 0..12 {
            buf[0x60 + cell * 8..][..8].copy_from_slice(&u64::MAX.to_le_bytes());
        }
        buf[0x60..0x68].copy_from_slice(&1_000u64.to_le_bytes());
        // static measured latency bucket 3 trim
        buf[0x190 + (3 * 3 + 2) * 2..][..2].copy_from_slice(&17u16.to_le_bytes());
        // latency mode: bucket 1 write (bit 4) and bucket 3 trim (bit 11)
        buf[0x0A..0x0C].copy_from_slice(&((1u16 << 4) | (1u16 << 11)).to_le_bytes());

        let page = decode(&LATENCY_MONITOR, &buf).unwrap().page;

        let counters = page.get("Active Bucket Counter").unwrap().as_grid().unwrap();
        assert_eq!(counters.columns, OPERATION_COLUMNS);
        assert_eq!(counters.rows.len(), 4);
        assert!(counters.rows.iter().all(|r| r.len() == 3));
        assert_eq!(counters.cell(2, 1), Some(&DecodedValue::Uint(1234)));
        assert_eq!(counters.cell(2, 3), None);

        let stamps = page.get("Active Latency Time Stamp").unwrap().as_grid().unwrap();
        assert_eq!(stamps.cell(0, 0).unwrap().as_timestamp(), Some(Timestamp::Millis(1_000)));
        assert_eq!(stamps.cell(0, 1).unwrap().as_timestamp(), Some(Timestamp::NotAvailable));
        assert_eq!(stamps.cell(3, 2).unwrap().as_timestamp(), Some(Timestamp::NotAvailable));

        let measured = page.get("Static Measured Latency").unwrap().as_grid().unwrap();
        assert_eq!(measured.cell(3, 2), Some(&DecodedValue::Uint(17)));

        let mode = page.get("Active Latency Mode").unwrap().as_grid().unwrap();
        let set: Vec<_> = (0..4)
            .flat_map(|r| (0..3).map(move |c| (r, c)))
            .filter(|&(r, c)| mode.cell(r, c) == Some(&DecodedValue::Bits(1)))
            .collect();
        assert_eq!(set, vec![(1, 1), (3, 2)]);
    }

    #[test]
    fn test_latency_monitor_debug_log_stamp() {
        let mut buf = latency_page(1);
        buf[0x1C4..0x1CC].copy_from_slice(&u64::MAX.to_le_bytes());
        let page = decode(&LATENCY_MONITOR, &buf).unwrap().page;
        assert_eq!(
            page.get("Debug Log Latency Time Stamp").unwrap().as_timestamp(),
            Some(Timestamp::NotAvailable)
        );
    }

    #[test]
    fn test_latency_monitor_guid_mismatch() {
        let mut buf = latency_page(1);
        buf[0x1F0..0x200].copy_from_slice(&SMART_CLOUD_GUID.0);
        let decoded = decode(&LATENCY_MONITOR, &buf).unwrap();
        assert_eq!(
            decoded.outcome,
            DecodeOutcome::GuidMismatch {
                expected: LATENCY_MONITOR_GUID,
                actual: SMART_CLOUD_GUID,
            }
        );
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Supported Log Pages
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_directory_lists_nonzero_entries() {
        let mut buf = vec![0u8; SUPPORTED_LOG_PAGES_LEN];
        for lid in [0x00usize, 0x02, 0xC0, 0xC3, 0xFF] {
            buf[lid * 4..lid * 4 + 4].copy_from_slice(&1u32.to_le_bytes());
        }
        let decoded = decode(&SUPPORTED_LOG_PAGES, &buf).unwrap();
        assert!(decoded.is_valid());
        assert_eq!(decoded.page.version, 0);

        let entries = decoded.page.get("supported").unwrap().as_directory().unwrap();
        let lids: Vec<_> = entries.iter().map(|e| e.lid).collect();
        assert_eq!(lids, vec![0x00, 0x02, 0xC0, 0xC3, 0xFF]);
        let descriptions: Vec<_> = entries.iter().map(|e| e.description.as_label()).collect();
        assert_eq!(descriptions[0], Some("Supported Log Pages"));
        assert_eq!(descriptions[2], Some("OCP SMART / Health Information Extended"));
        assert_eq!(descriptions[4], Some("Unknown"));
        assert_eq!(
            entries[3].description,
            DecodedValue::Label("OCP Latency Monitor".into())
        );
    }

    #[test]
    fn test_decode_log_uses_registry() {
        assert!(decode_log(0xC0, &smart_page(3)).unwrap().is_valid());
        assert_eq!(
            decode_log(0x07, &[0u8; 512]),
            Err(LogPageError::UnknownLogId(0x07))
        );
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Malformed schemas
    // ═══════════════════════════════════════════════════════════════════════

    static BROKEN_FIELDS: &[FieldSpec] = &[
        FieldSpec::new("Tail:", "tail", 4, FieldKind::Bytes { len: 4 }),
        FieldSpec::uint("Beyond:", "beyond", 14, 4),
    ];

    static BROKEN: LogPageSchema = LogPageSchema {
        log_id: 0xEE,
        name: "broken",
        title: "Broken:",
        label_width: 10,
        total_length: 16,
        guid: None,
        guid_offset: 0,
        version: None,
        versions: 0..=0,
        fields: BROKEN_FIELDS,
    };

    #[test]
    fn test_field_past_declared_length_is_out_of_bounds() {
        assert_eq!(BROKEN.fields_out_of_range().count(), 1);
        // Even with a longer buffer, reads stop at the declared length.
        let buf = vec![0u8; 64];
        assert_eq!(
            decode(&BROKEN, &buf),
            Err(LogPageError::OutOfBounds {
                offset: 14,
                width: 4,
                len: 16
            })
        );
    }

    static BYTES_FIELDS: &[FieldSpec] = &[
        FieldSpec::new("Raw:", "raw", 0, FieldKind::Bytes { len: 3 }),
        FieldSpec::new(
            "Flags:",
            "flags",
            4,
            FieldKind::Bits {
                width: 2,
                bit_offset: 4,
                bit_count: 4,
            },
        ),
        FieldSpec::new(
            "Grid:",
            "grid",
            8,
            FieldKind::Grid(GridSpec {
                rows: 1,
                stride: 3,
                cell: CellKind::Uint(1),
                columns: OPERATION_COLUMNS,
            }),
        )
        .scaled(0, 10),
    ];

    static BYTES: LogPageSchema = LogPageSchema {
        log_id: 0xEF,
        name: "bytes",
        title: "Bytes:",
        label_width: 10,
        total_length: 12,
        guid: None,
        guid_offset: 0,
        version: None,
        versions: 0..=0,
        fields: BYTES_FIELDS,
    };

    #[test]
    fn test_bytes_bits_and_scaled_grid() {
        let buf = [0xDE, 0xAD, 0xBE, 0x00, 0xA5, 0x00, 0, 0, 1, 2, 3, 0];
        let page = decode(&BYTES, &buf).unwrap().page;
        assert_eq!(page.get("raw"), Some(&DecodedValue::Bytes(vec![0xDE, 0xAD, 0xBE])));
        assert_eq!(page.get("raw").unwrap().scalar_text(false).as_deref(), Some("deadbe"));
        assert_eq!(page.get("flags"), Some(&DecodedValue::Bits(0xA)));
        let grid = page.get("grid").unwrap().as_grid().unwrap();
        assert_eq!(grid.cell(0, 2), Some(&DecodedValue::Uint(30)));
    }
}
