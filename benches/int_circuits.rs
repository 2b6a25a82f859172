use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kodkod_arith::bool::{BooleanFactory, CircuitArena, Options, VariableAllocator};
use kodkod_arith::solver::Solver;

/// Allocates two free integers `x` and `y` of the given width
fn operands(bitwidth: usize) -> (VariableAllocator, std::ops::Range<u32>, std::ops::Range<u32>) {
    let mut vars = VariableAllocator::new();
    let x = vars.allocate_int("x", bitwidth);
    let y = vars.allocate_int("y", bitwidth);
    (vars, x, y)
}

fn circuit_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for bitwidth in [8, 16, 32] {
        group.bench_with_input(BenchmarkId::new("multiply", bitwidth), &bitwidth, |b, &bw| {
            b.iter(|| {
                let (vars, xs, ys) = operands(bw);
                let arena = CircuitArena::new();
                let options = Options::default().with_bitwidth(bw);
                let factory = BooleanFactory::new(&arena, vars.num_variables(), options).unwrap();
                let x = factory.int_variable(xs).unwrap();
                let y = factory.int_variable(ys).unwrap();
                black_box(x.multiply(&y).width());
                factory.num_gates()
            });
        });

        group.bench_with_input(BenchmarkId::new("divide", bitwidth), &bitwidth, |b, &bw| {
            b.iter(|| {
                let (vars, xs, ys) = operands(bw);
                let arena = CircuitArena::new();
                let options = Options::default().with_bitwidth(bw);
                let factory = BooleanFactory::new(&arena, vars.num_variables(), options).unwrap();
                let x = factory.int_variable(xs).unwrap();
                let y = factory.int_variable(ys).unwrap();
                black_box(x.divide(&y).width());
                factory.num_gates()
            });
        });

        group.bench_with_input(BenchmarkId::new("shl", bitwidth), &bitwidth, |b, &bw| {
            b.iter(|| {
                let (vars, xs, ys) = operands(bw);
                let arena = CircuitArena::new();
                let options = Options::default().with_bitwidth(bw);
                let factory = BooleanFactory::new(&arena, vars.num_variables(), options).unwrap();
                let x = factory.int_variable(xs).unwrap();
                let y = factory.int_variable(ys).unwrap();
                black_box(x.shl(&y).width());
                factory.num_gates()
            });
        });
    }

    group.finish();
}

fn solving(c: &mut Criterion) {
    let mut group = c.benchmark_group("solving");
    group.sample_size(20);

    // factor a constant: x * y == n with 1 < x, y
    for bitwidth in [8, 12] {
        group.bench_with_input(BenchmarkId::new("factor", bitwidth), &bitwidth, |b, &bw| {
            b.iter(|| {
                let (vars, xs, ys) = operands(bw);
                let arena = CircuitArena::new();
                let options = Options::default().with_bitwidth(bw);
                let factory = BooleanFactory::new(&arena, vars.num_variables(), options).unwrap();
                let x = factory.int_variable(xs).unwrap();
                let y = factory.int_variable(ys).unwrap();
                let one = factory.integer(1);
                let formula = factory.and_multi(vec![
                    x.multiply(&y).eq(&factory.integer(77)),
                    one.lt(&x),
                    one.lt(&y),
                ]);
                let solution = Solver::new().solve(&factory, &formula).unwrap();
                black_box(solution.is_sat())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, circuit_construction, solving);
criterion_main!(benches);
