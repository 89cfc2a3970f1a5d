//! Header parsing benchmarks
//!
//! Measures header-block parsing throughput over in-memory input:
//! - Typical browser-sized header blocks
//! - Blocks dominated by folded continuation lines
//! - Full request parses including entity decoding
//!
//! Run with: cargo bench --bench parse_performance

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use h1parse::{
    parse_headers, BufferedInput, DefaultLineParser, MessageParser, ParseLimits, RequestHead,
};

fn typical_block() -> Vec<u8> {
    let mut wire = Vec::new();
    wire.extend_from_slice(b"Host: 127.0.0.1:8080\r\n");
    wire.extend_from_slice(b"Connection: keep-alive\r\n");
    wire.extend_from_slice(b"Cache-Control: max-age=0\r\n");
    wire.extend_from_slice(b"Upgrade-Insecure-Requests: 1\r\n");
    wire.extend_from_slice(
        b"User-Agent: Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36\r\n",
    );
    wire.extend_from_slice(
        b"Accept: text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8\r\n",
    );
    wire.extend_from_slice(b"Accept-Encoding: gzip, deflate, br\r\n");
    wire.extend_from_slice(b"Accept-Language: en-US,en;q=0.9\r\n");
    wire.extend_from_slice(b"\r\n");
    wire
}

fn folded_block() -> Vec<u8> {
    let mut wire = Vec::new();
    for i in 0..16 {
        wire.extend_from_slice(format!("X-Folded-{}: part0\r\n", i).as_bytes());
        for j in 1..4 {
            wire.extend_from_slice(format!("\t part{}\r\n", j).as_bytes());
        }
    }
    wire.extend_from_slice(b"\r\n");
    wire
}

fn bench_header_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("header_block");

    let typical = typical_block();
    group.throughput(Throughput::Bytes(typical.len() as u64));
    group.bench_function("typical", |b| {
        b.iter(|| {
            let mut input = BufferedInput::new(black_box(&typical[..]));
            let mut lines = Vec::new();
            let headers = parse_headers(
                &mut input,
                &ParseLimits::default(),
                &DefaultLineParser,
                &mut lines,
            )
            .unwrap();
            black_box(headers);
        });
    });

    let folded = folded_block();
    group.throughput(Throughput::Bytes(folded.len() as u64));
    group.bench_function("folded", |b| {
        b.iter(|| {
            let mut input = BufferedInput::new(black_box(&folded[..]));
            let mut lines = Vec::new();
            let headers = parse_headers(
                &mut input,
                &ParseLimits::default(),
                &DefaultLineParser,
                &mut lines,
            )
            .unwrap();
            black_box(headers);
        });
    });

    group.finish();
}

fn bench_full_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_request");

    let block = typical_block();
    let mut wire = Vec::new();
    wire.extend_from_slice(b"POST /upload HTTP/1.1\r\n");
    wire.extend_from_slice(&block[..block.len() - 2]);
    wire.extend_from_slice(b"Content-Length: 1024\r\n\r\n");
    wire.extend_from_slice(&vec![b'x'; 1024]);

    group.throughput(Throughput::Bytes(wire.len() as u64));
    group.bench_function("with_body", |b| {
        b.iter(|| {
            let mut parser =
                MessageParser::new(BufferedInput::new(black_box(&wire[..])), RequestHead);
            let request = parser.parse().unwrap();
            black_box(request);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_header_block, bench_full_request);
criterion_main!(benches);
