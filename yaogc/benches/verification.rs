use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use yaogc::{Circuit, GarbledCircuit, GarblingConfig, Gate, SchemeKind, TableLayout};

/// An `n`-bit ripple carry adder, party 1 providing `a` and party 2 providing `b`.
fn adder(n: u32) -> Circuit {
    let a: Vec<u32> = (0..n).collect();
    let b: Vec<u32> = (n..2 * n).collect();
    let mut next = 2 * n;
    let mut wire = || {
        next += 1;
        next - 1
    };

    let mut gates = vec![];
    let mut outputs = vec![];
    let mut carry = None;
    for i in 0..n as usize {
        let (x, y) = (a[i], b[i]);
        let and = wire();
        match carry {
            None => {
                let sum = wire();
                gates.push(Gate::xor(x, y, sum));
                gates.push(Gate::and(x, y, and));
                outputs.push(sum);
                carry = Some(and);
            }
            Some(c) => {
                let xy = wire();
                let sum = wire();
                let carry_and = wire();
                let new_carry = wire();
                gates.push(Gate::xor(x, y, xy));
                gates.push(Gate::xor(xy, c, sum));
                gates.push(Gate::and(x, y, and));
                gates.push(Gate::and(xy, c, carry_and));
                gates.push(Gate::or(and, carry_and, new_carry));
                outputs.push(sum);
                carry = Some(new_carry);
            }
        }
    }
    outputs.extend(carry);
    Circuit::new(gates, vec![a, b], outputs)
}

fn verification_benchmarks(c: &mut Criterion) {
    for scheme in [SchemeKind::HalfGates, SchemeKind::RowReduction] {
        let config = GarblingConfig::new(scheme, TableLayout::Contiguous);
        let mut group = c.benchmark_group(format!("verify adder {scheme:?}"));
        for bits in [8, 64, 512].iter() {
            let mut gc = GarbledCircuit::new(adder(*bits), &config).unwrap();
            let values = gc.garble().unwrap();
            group.bench_with_input(BenchmarkId::from_parameter(bits), bits, |b, _| {
                b.iter(|| assert!(gc.verify(values.input_keys()).unwrap()));
            });
        }
        group.finish();
    }
}

criterion_group! {
  name = benches;
  config = Criterion::default();
  targets = verification_benchmarks
}
criterion_main!(benches);
