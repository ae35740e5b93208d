//! Benchmarks for prompt construction and mock reply generation.
//!
//! Both run on every chat turn, so they should stay well below the latency of
//! a single remote call.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use helpdesk_chat::prompt::{build_context_prompt, build_simple_prompt, SYSTEM_PROMPT};
use helpdesk_chat::response::{mock_response, mock_simple_response};
use helpdesk_core::types::{Message, Role};

/// Alternating user/assistant history of realistic support messages.
fn generate_history(len: usize) -> Vec<Message> {
    (0..len)
        .map(|i| {
            let (role, content) = if i % 2 == 0 {
                (
                    Role::User,
                    format!(
                        "My order #{} has not arrived yet and the tracking page \
                         has not changed for three days. Can you check it?",
                        1000 + i
                    ),
                )
            } else {
                (
                    Role::Assistant,
                    format!(
                        "I'm sorry about the delay with order #{}. I've checked the \
                         carrier status and it is currently at the regional hub.",
                        1000 + i - 1
                    ),
                )
            };
            Message::new("bench-session", role, content)
        })
        .collect()
}

fn bench_prompt_construction(c: &mut Criterion) {
    let short = generate_history(2);
    let long = generate_history(200);

    let mut group = c.benchmark_group("prompt_construction");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("context_prompt_short_history", |b| {
        b.iter(|| build_context_prompt(SYSTEM_PROMPT, black_box(&short), "Any update?"))
    });

    // Only the last few turns are used, so this should match the short case.
    group.bench_function("context_prompt_long_history", |b| {
        b.iter(|| build_context_prompt(SYSTEM_PROMPT, black_box(&long), "Any update?"))
    });

    group.bench_function("simple_prompt", |b| {
        b.iter(|| build_simple_prompt(SYSTEM_PROMPT, black_box("Hello, I need help")))
    });

    group.finish();
}

fn bench_mock_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("mock_generation");

    group.bench_function("mock_response_cycle", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let reply = mock_response(black_box("Where is my refund?"), idx);
            idx += 1;
            reply
        });
    });

    group.bench_function("mock_simple_response", |b| {
        b.iter(|| mock_simple_response(black_box("Where is my refund?")))
    });

    group.finish();
}

criterion_group!(benches, bench_prompt_construction, bench_mock_generation);
criterion_main!(benches);
