use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mindmap_history::history::{HistoryManager, OverflowPolicy, DEFAULT_HISTORY_LIMIT};
use mindmap_history::model::{Document, Edit, Node};
use std::hint::black_box;

/// Generate a map with `breadth` children per node, `depth` levels deep
fn generate_map(breadth: usize, depth: usize) -> Document {
    fn branch(prefix: &str, breadth: usize, depth: usize) -> Vec<Node> {
        if depth == 0 {
            return Vec::new();
        }
        (0..breadth)
            .map(|i| {
                let id = format!("{}-{}", prefix, i);
                let children = branch(&id, breadth, depth - 1);
                Node::new(id.clone(), format!("Topic {}", id)).with_children(children)
            })
            .collect()
    }

    let root = Node::new("root", "Root").with_children(branch("n", breadth, depth));
    Document::new("bench", "Benchmark Map", root)
}

fn bench_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit");

    for (breadth, depth) in [(3, 3), (5, 4), (8, 4)] {
        let doc = generate_map(breadth, depth);
        group.throughput(Throughput::Elements(doc.node_count() as u64));
        group.bench_with_input(
            BenchmarkId::new("set_topic", doc.node_count()),
            &doc,
            |b, doc| {
                let mut history = HistoryManager::new();
                history.set_document(doc.clone());
                let mut n = 0u64;
                b.iter(|| {
                    n += 1;
                    let edit = Edit::SetTopic {
                        id: "n-0".to_string(),
                        topic: format!("rename {}", n),
                    };
                    black_box(history.try_update_document(|d| edit.apply(d)).unwrap())
                })
            },
        );
    }

    group.finish();
}

fn bench_overflow_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("overflow");
    let doc = generate_map(4, 3);

    for policy in [OverflowPolicy::EvictOldest, OverflowPolicy::FreezeWindow] {
        group.bench_function(format!("{:?}", policy), |b| {
            b.iter(|| {
                let mut history = HistoryManager::with_limit(DEFAULT_HISTORY_LIMIT, policy);
                history.set_document(doc.clone());
                for i in 0..(DEFAULT_HISTORY_LIMIT * 2) {
                    history.update_document(|d| {
                        let mut next = d.clone();
                        next.root.topic = format!("step {}", i);
                        next
                    });
                }
                black_box(history.len())
            })
        });
    }

    group.finish();
}

fn bench_undo_redo(c: &mut Criterion) {
    let doc = generate_map(5, 4);
    let mut history = HistoryManager::new();
    history.set_document(doc);
    for i in 0..DEFAULT_HISTORY_LIMIT {
        history.update_document(|d| {
            let mut next = d.clone();
            next.root.topic = format!("step {}", i);
            next
        });
    }

    c.bench_function("undo_redo_full_walk", |b| {
        b.iter(|| {
            while history.undo() {}
            while history.redo() {}
            black_box(history.cursor())
        })
    });
}

criterion_group!(
    history_benches,
    bench_commit,
    bench_overflow_policies,
    bench_undo_redo
);

criterion_main!(history_benches);
