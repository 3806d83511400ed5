#[macro_use]
extern crate criterion;

extern crate rand;
extern crate rulerec;

use criterion::Criterion;

use rand::distributions::{Distribution, Uniform};
use rand::{SeedableRng, XorShiftRng};

use rulerec::data::Transactions;
use rulerec::mining::{apriori, fpgrowth};

fn synthetic_baskets(num_baskets: usize, num_items: usize, basket_size: usize) -> Transactions {
    let mut rng = XorShiftRng::from_seed([42; 16]);
    let items = Uniform::new(0, num_items);

    let baskets: Vec<Vec<String>> = (0..num_baskets)
        .map(|_| {
            (0..basket_size)
                .map(|_| format!("item-{}", items.sample(&mut rng)))
                .collect()
        })
        .collect();

    Transactions::from_baskets(&baskets)
}

fn bench_fpgrowth(c: &mut Criterion) {
    c.bench_function("fpgrowth", |b| {
        let matrix = synthetic_baskets(1000, 50, 8).to_matrix();

        b.iter(|| {
            fpgrowth::frequent_itemsets(&matrix, 0.05).unwrap();
        })
    });
}

fn bench_apriori(c: &mut Criterion) {
    c.bench_function("apriori", |b| {
        let matrix = synthetic_baskets(1000, 50, 8).to_matrix();

        b.iter(|| {
            apriori::frequent_itemsets(&matrix, 0.05).unwrap();
        })
    });
}

criterion_group!{
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_fpgrowth, bench_apriori
}
criterion_main!(benches);
