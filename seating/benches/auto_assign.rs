//! Auto-assignment and store benchmarks
//!
//! Measures the bulk placement pass over realistic reception sizes and the
//! cost of a seat command through the store.
//!
//! Run with: `cargo bench -p seating`

#![allow(missing_docs)] // Benchmarks don't need extensive docs

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use seating::{
    AutoAssignOptions, ConflictPolicy, ConflictSet, Guest, GuestGroup, Position, RsvpStatus,
    SeatingAction, SeatingEnvironment, SeatingReducer, SeatingState, SeatingStore, Side, Table,
    TableRegistry, TableShape, engine::plan_auto_assign,
};
use seating_core::environment::UuidGenerator;
use std::sync::Arc;

const GROUPS: [GuestGroup; 4] = [
    GuestGroup::Family,
    GuestGroup::Friends,
    GuestGroup::Colleagues,
    GuestGroup::Other,
];

fn roster(size: usize) -> Vec<Guest> {
    (0..size)
        .map(|i| {
            Guest::new(
                format!("g{i}"),
                format!("Guest {i}"),
                if i % 2 == 0 { Side::Bride } else { Side::Groom },
                GROUPS[i % GROUPS.len()],
                if i % 7 == 0 { RsvpStatus::Pending } else { RsvpStatus::Attending },
            )
        })
        .collect()
}

fn hall(seats: usize) -> Vec<Table> {
    (0..seats.div_ceil(8))
        .map(|i| {
            Table::new(
                format!("t{i}"),
                format!("Table {}", i + 1),
                TableShape::Round,
                8,
                Position::new(100.0, 100.0),
            )
        })
        .collect()
}

fn conflicts(size: usize) -> ConflictSet {
    (0..size / 10)
        .map(|i| seating::Conflict::new(format!("c{i}"), format!("g{i}"), format!("g{}", i * 3 + 1), "bench"))
        .collect()
}

fn benchmark_auto_assign(c: &mut Criterion) {
    let mut group = c.benchmark_group("auto_assign");

    for size in [50_usize, 200, 800] {
        let guests = roster(size);
        let tables = hall(size);
        let conflicts = conflicts(size);
        group.throughput(Throughput::Elements(size as u64));

        for policy in [ConflictPolicy::Ignore, ConflictPolicy::Avoid] {
            let options = AutoAssignOptions {
                conflict_policy: policy,
            };
            group.bench_with_input(
                BenchmarkId::new(format!("{policy:?}").to_lowercase(), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        plan_auto_assign(
                            black_box(&guests),
                            black_box(&tables),
                            &conflicts,
                            &options,
                        )
                    });
                },
            );
        }
    }

    group.finish();
}

fn benchmark_store_assign(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");
    group.throughput(Throughput::Elements(1));

    group.bench_function("assign_and_unassign", |b| {
        let state = SeatingState::new(
            TableRegistry::from_tables(hall(200)),
            roster(200),
            ConflictSet::empty(),
        );
        let env = SeatingEnvironment::new(Arc::new(UuidGenerator));
        let mut store = SeatingStore::new(state, SeatingReducer::new(), env);

        b.iter(|| {
            store.send(black_box(SeatingAction::AssignGuest {
                guest_id: "g1".into(),
                table_id: "t3".into(),
                allow_over_capacity: true,
            }));
            store.send(black_box(SeatingAction::UnassignGuest {
                guest_id: "g1".into(),
            }));
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_auto_assign, benchmark_store_assign);
criterion_main!(benches);
