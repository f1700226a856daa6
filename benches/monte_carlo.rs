use std::hint::black_box;
use std::time::Duration;

use criterion::criterion_group;
use criterion::criterion_main;
use criterion::BenchmarkId;
use criterion::Criterion;
use quantfolio::simulation::MonteCarloEngine;
use quantfolio::simulation::SimulationMethod;
use quantfolio::DEFAULT_DT;

fn bench_gbm_simulation(c: &mut Criterion) {
  let mut group = c.benchmark_group("MonteCarlo");
  group.measurement_time(Duration::from_secs(3));
  group.warm_up_time(Duration::from_millis(500));

  for &num_simulations in &[100usize, 1_000usize, 10_000usize] {
    let engine = MonteCarloEngine::new(DEFAULT_DT, Some(42), SimulationMethod::Gbm);

    group.bench_with_input(
      BenchmarkId::new("gbm/252d", num_simulations),
      &num_simulations,
      |b, &m| {
        b.iter(|| {
          let result = engine.simulate(100.0, 0.0005, 0.012, 252, m).unwrap();
          black_box(result.expected_final_price())
        });
      },
    );
  }

  let additive = MonteCarloEngine::new(DEFAULT_DT, Some(42), SimulationMethod::Additive);
  group.bench_function("additive/252d/1000", |b| {
    b.iter(|| {
      let result = additive.simulate(100.0, 0.0005, 0.012, 252, 1_000).unwrap();
      black_box(result.expected_final_price())
    });
  });

  group.finish();
}

criterion_group!(benches, bench_gbm_simulation);
criterion_main!(benches);
