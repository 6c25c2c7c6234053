//! Benchmarks for the reveal/settle cycle.
//!
//! Run with: cargo bench -p parley-dialog --bench dialog_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use parley_dialog::ConfirmDialog;
use parley_reactive::Observable;
use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

fn bench_cycle_plain_flag(c: &mut Criterion) {
    let mut group = c.benchmark_group("dialog/cycle");

    let dialog: ConfirmDialog<_, (), u32> = ConfirmDialog::new(Cell::new(false));
    group.bench_function("reveal_confirm_cell", |b| {
        b.iter(|| {
            let mut answer = dialog.reveal();
            dialog.confirm_with(black_box(7));
            black_box(answer.try_settlement())
        })
    });

    group.finish();
}

fn bench_cycle_with_hooks(c: &mut Criterion) {
    let mut group = c.benchmark_group("dialog/hooks");

    for hooks in [1usize, 4, 16] {
        let show = Observable::new(false);
        let renders = Rc::new(Cell::new(0u64));
        let r = Rc::clone(&renders);
        let _sub = show.subscribe(move |_| r.set(r.get() + 1));

        let dialog: ConfirmDialog<_, u32, u32> = ConfirmDialog::new(show.clone());
        for _ in 0..hooks {
            dialog.on_reveal(|payload| {
                black_box(payload);
            });
            dialog.on_cancel(|payload| {
                black_box(payload);
            });
        }

        group.bench_with_input(BenchmarkId::new("reveal_cancel", hooks), &(), |b, _| {
            b.iter(|| {
                let mut answer = dialog.reveal_with(black_box(1));
                dialog.cancel_with(black_box(2));
                black_box(answer.try_settlement())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cycle_plain_flag, bench_cycle_with_hooks);
criterion_main!(benches);
