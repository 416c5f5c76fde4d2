#![cfg(unstable)]
#![feature(test)]
extern crate test;

use squirrel_encode::{escape::Backend, format_double, format_double_with, FloatFormat, Search};

const MESSAGE: &str = "HTTP GET /api/events?filter=@Level%20=%20'Error' responded 200 in 12.3456 ms";

const STACKTRACE: &str = "System.InvalidOperationException: \"Operation is not valid\"\r\n\
   at Seq.Server.Web.Api.EventsController.Get(String id) in C:\\src\\Seq\\EventsController.cs:line 42\r\n\
   at lambda_method(Closure , Object , Object[] )\r\n\
   \tat Microsoft.AspNetCore.Mvc.Internal.ActionMethodExecutor.Execute()\r\n";

fn no_escape_10kb() -> String {
    MESSAGE.repeat(10 * 1024 / MESSAGE.len())
}

fn stacktrace_10kb() -> String {
    STACKTRACE.repeat(10 * 1024 / STACKTRACE.len())
}

fn count_escapes(input: &[u8], backend: Backend) -> usize {
    let mut search = Search::with_backend(input, Vec::with_capacity(input.len() * 2), backend);

    let mut count = 0;
    while search.next_escape().unwrap() {
        let curr = search.current();
        search.escape_current(&[b'\\', curr]).unwrap();

        count += 1;
    }

    count
}

#[bench]
fn search_10kb_stacktrace_simd(b: &mut test::Bencher) {
    let input = stacktrace_10kb();

    b.bytes = input.len() as u64;
    b.iter(|| count_escapes(input.as_bytes(), Backend::detect()))
}

#[bench]
fn search_10kb_stacktrace_fallback(b: &mut test::Bencher) {
    let input = stacktrace_10kb();

    b.bytes = input.len() as u64;
    b.iter(|| count_escapes(input.as_bytes(), Backend::Fallback))
}

#[bench]
fn search_10kb_no_escape_simd(b: &mut test::Bencher) {
    let input = no_escape_10kb();

    b.bytes = input.len() as u64;
    b.iter(|| count_escapes(input.as_bytes(), Backend::detect()))
}

#[bench]
fn search_10kb_no_escape_fallback(b: &mut test::Bencher) {
    let input = no_escape_10kb();

    b.bytes = input.len() as u64;
    b.iter(|| count_escapes(input.as_bytes(), Backend::Fallback))
}

#[bench]
fn search_short_message_simd(b: &mut test::Bencher) {
    b.bytes = MESSAGE.len() as u64;
    b.iter(|| count_escapes(MESSAGE.as_bytes(), Backend::detect()))
}

#[bench]
fn search_short_message_fallback(b: &mut test::Bencher) {
    b.bytes = MESSAGE.len() as u64;
    b.iter(|| count_escapes(MESSAGE.as_bytes(), Backend::Fallback))
}

#[bench]
fn escape_json_10kb_stacktrace(b: &mut test::Bencher) {
    let input = stacktrace_10kb();

    b.bytes = input.len() as u64;
    b.iter(|| squirrel_encode::escape_json(&input))
}

#[bench]
fn escape_json_10kb_stacktrace_serde_json(b: &mut test::Bencher) {
    let input = stacktrace_10kb();

    b.bytes = input.len() as u64;
    b.iter(|| serde_json::to_string(&input).unwrap())
}

#[bench]
fn escape_json_10kb_stacktrace_to_vec(b: &mut test::Bencher) {
    let input = stacktrace_10kb();

    b.bytes = input.len() as u64;
    b.iter(|| input.as_bytes().to_vec())
}

const DOUBLES: &[f64] = &[
    0.1,
    100.0,
    12.3456,
    -0.000123,
    1e300,
    5e-324,
    123456789012345.0,
    std::f64::consts::PI,
];

#[bench]
fn format_double_mixed(b: &mut test::Bencher) {
    b.iter(|| {
        for v in DOUBLES {
            test::black_box(format_double(*v));
        }
    })
}

#[bench]
fn format_double_mixed_compact(b: &mut test::Bencher) {
    b.iter(|| {
        for v in DOUBLES {
            test::black_box(format_double_with(*v, &FloatFormat::COMPACT));
        }
    })
}

#[bench]
fn format_double_mixed_serde_json(b: &mut test::Bencher) {
    b.iter(|| {
        for v in DOUBLES {
            test::black_box(serde_json::to_string(v).unwrap());
        }
    })
}

#[bench]
fn format_double_mixed_std(b: &mut test::Bencher) {
    b.iter(|| {
        for v in DOUBLES {
            test::black_box(v.to_string());
        }
    })
}
