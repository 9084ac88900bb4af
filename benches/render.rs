//! Rendering throughput benchmarks
//!
//! Measures full calls through the C entry point for three argument mixes.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vararg_native::ffi::vararg_native_render;
use vararg_native::{to_wide, Ref, VarArg};

fn call(buffer: &mut [u16], args: &[VarArg]) -> u32 {
    unsafe {
        vararg_native_render(
            buffer.as_mut_ptr(),
            buffer.len() as u32,
            args.len() as i64,
            args.as_ptr(),
        )
    }
}

fn bench_entry_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let two = to_wide("2");
    let bytes = [1u8, 2, 3, 4, 5];
    let mut buffer = vec![0u16; 512];

    let value_types = [
        VarArg::long(1),
        VarArg::double(3.125),
        VarArg::ulong(4),
        VarArg::reference(Ref::new(777, 999)),
    ];
    group.bench_function("only_value_types", |b| {
        b.iter(|| call(&mut buffer, black_box(&value_types)))
    });

    let with_string = [
        VarArg::long(1),
        VarArg::string(&two).expect("terminated"),
        VarArg::double(3.125),
        VarArg::ulong(4),
        VarArg::reference(Ref::new(777, 999)),
    ];
    group.bench_function("value_types_and_string", |b| {
        b.iter(|| call(&mut buffer, black_box(&with_string)))
    });

    let all_types = [
        VarArg::long(1),
        VarArg::string(&two).expect("terminated"),
        VarArg::double(3.125),
        VarArg::ulong(4),
        VarArg::binary(&bytes),
        VarArg::reference(Ref::new(777, 999)),
    ];
    group.bench_function("all_types", |b| {
        b.iter(|| call(&mut buffer, black_box(&all_types)))
    });

    // Sizing call with a one-element buffer
    let mut sizing = [0u16; 1];
    group.bench_function("sizing_all_types", |b| {
        b.iter(|| call(&mut sizing, black_box(&all_types)))
    });

    group.finish();
}

criterion_group!(benches, bench_entry_point);
criterion_main!(benches);
