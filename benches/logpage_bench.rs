use criterion::{Criterion, criterion_group, criterion_main};
use ocp_logpages::command::decode_and_render;
use ocp_logpages::decoder::decode;
use ocp_logpages::reader::ByteFieldReader;
use ocp_logpages::render::{JsonRenderer, Render, TextRenderer};
use ocp_logpages::schema::{LATENCY_MONITOR, SMART_CLOUD_ATTRIBUTES, SUPPORTED_LOG_PAGES};
use ocp_logpages::types::*;
use std::hint::black_box;

// ─── Test Data ──────────────────────────────────────────────────────────────

/// Version 3 SMART page with every counter nonzero.
fn make_smart() -> Vec<u8> {
    let mut buf: Vec<u8> = (0..SMART_CLOUD_ATTR_LEN).map(|i| (i % 251) as u8).collect();
    buf[494..496].copy_from_slice(&3u16.to_le_bytes());
    buf[496..512].copy_from_slice(&SMART_CLOUD_GUID.0);
    buf
}

/// Latency monitor page with half the timestamps unavailable.
fn make_latency() -> Vec<u8> {
    let mut buf: Vec<u8> = (0..LATENCY_MONITOR_LEN).map(|i| (i % 13) as u8).collect();
    for cell in (0..12).step_by(2) {
        buf[0x60 + cell * 8..][..8].copy_from_slice(&u64::MAX.to_le_bytes());
    }
    buf[0x1EE..0x1F0].copy_from_slice(&1u16.to_le_bytes());
    buf[0x1F0..0x200].copy_from_slice(&LATENCY_MONITOR_GUID.0);
    buf
}

/// Every log id marked supported.
fn make_directory() -> Vec<u8> {
    std::iter::repeat_n(1u32.to_le_bytes(), SUPPORTED_LOG_PAGES_ENTRIES)
        .flatten()
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// 1. Field reads
// ═══════════════════════════════════════════════════════════════════════════

fn bench_field_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_reads");
    group.sample_size(500);

    let buf = make_smart();

    group.bench_function("read_u64", |b| b.iter(|| buf.read_u64(black_box(48)).unwrap()));
    group.bench_function("read_u128", |b| b.iter(|| buf.read_u128(black_box(0)).unwrap()));
    group.bench_function("read_guid", |b| b.iter(|| buf.read_guid(black_box(496)).unwrap()));
    group.bench_function("read_bits", |b| {
        b.iter(|| buf.read_bits(black_box(10), 2, black_box(4), 1).unwrap())
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// 2. Decode
// ═══════════════════════════════════════════════════════════════════════════

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    let smart = make_smart();
    let latency = make_latency();
    let directory = make_directory();

    group.bench_function("smart-add-log", |b| {
        b.iter(|| decode(&SMART_CLOUD_ATTRIBUTES, black_box(&smart)).unwrap())
    });
    group.bench_function("latency-monitor-log", |b| {
        b.iter(|| decode(&LATENCY_MONITOR, black_box(&latency)).unwrap())
    });
    group.bench_function("log-page-directory", |b| {
        b.iter(|| decode(&SUPPORTED_LOG_PAGES, black_box(&directory)).unwrap())
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// 3. Render
// ═══════════════════════════════════════════════════════════════════════════

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let smart = decode(&SMART_CLOUD_ATTRIBUTES, &make_smart()).unwrap().page;
    let latency = decode(&LATENCY_MONITOR, &make_latency()).unwrap().page;

    group.bench_function("text/smart", |b| b.iter(|| TextRenderer.render(black_box(&smart)).unwrap()));
    group.bench_function("json/smart", |b| b.iter(|| JsonRenderer.render(black_box(&smart)).unwrap()));
    group.bench_function("text/latency", |b| {
        b.iter(|| TextRenderer.render(black_box(&latency)).unwrap())
    });
    group.bench_function("json/latency", |b| {
        b.iter(|| JsonRenderer.render(black_box(&latency)).unwrap())
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// 4. End to end
// ═══════════════════════════════════════════════════════════════════════════

fn bench_decode_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_and_render");

    let latency = make_latency();
    group.bench_function("latency-monitor-log/json", |b| {
        b.iter(|| decode_and_render(LID_LATENCY_MONITOR, black_box(&latency), "json"))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_field_reads,
    bench_decode,
    bench_render,
    bench_decode_and_render
);
criterion_main!(benches);
