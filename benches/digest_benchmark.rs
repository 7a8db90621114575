//! Performance benchmarks for the verification hot path
//!
//! This benchmark suite measures:
//! - Verification digest computation
//! - Payload construction + canonical serialization
//! - Monetary formatting
//!
//! Run with: cargo bench
//! View results: open target/criterion/report/index.html

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use factura_kit::digest::verification_digest;
use factura_kit::format::format_amount;
use factura_kit::{BillingConfig, Customer, Invoice, LineItem, VerificationPayload};
use std::hint::black_box;

fn bench_invoice(items: usize) -> Invoice {
    let line_items = (0..items)
        .map(|i| LineItem::new(format!("Producto {}", i), 2.0, 50.0 + i as f64))
        .collect();
    Invoice::new(
        Customer::new("Empresa Contasimple S.L.", "Calle Contasimple 123", "B87654321"),
        line_items,
    )
}

fn bench_digest(c: &mut Criterion) {
    c.bench_function("verification_digest", |b| {
        b.iter(|| {
            verification_digest(
                black_box("FAC-20240301-ABC123"),
                black_box("B87654321"),
                black_box("2024-03-01"),
            )
        })
    });
}

fn bench_payload(c: &mut Criterion) {
    let config = BillingConfig::default();
    let mut group = c.benchmark_group("payload_canonical_text");

    for items in [1usize, 10, 50] {
        let invoice = bench_invoice(items);
        group.bench_with_input(BenchmarkId::from_parameter(items), &invoice, |b, invoice| {
            b.iter(|| {
                let payload = VerificationPayload::build(black_box(invoice), 1, &config);
                payload.canonical_text().expect("Failed to serialize")
            })
        });
    }

    group.finish();
}

fn bench_format(c: &mut Criterion) {
    c.bench_function("format_amount", |b| {
        b.iter(|| format_amount(black_box(Some(1_234_567.89)), black_box("EUR")))
    });
}

criterion_group!(benches, bench_digest, bench_payload, bench_format);
criterion_main!(benches);
