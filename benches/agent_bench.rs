use criterion::{black_box, criterion_group, criterion_main, Criterion};

use slipstream::action::{build_decoder, DecoderVariant};
use slipstream::agent::{Agent, AgentConfig};
use slipstream::obs::{build_encoder, EncoderVariant, ObservationHistory};
use slipstream::policy::RandomPolicy;
use slipstream::state::{BallState, CarState, GameStateSnapshot, Vec3};

/// A populated 3v3 snapshot: ball in motion, six cars spread over the field.
fn busy_snapshot(tick: u64) -> GameStateSnapshot {
    let mut ball = BallState::default();
    ball.physics.position = Vec3::new(800.0, -1200.0, 93.0);
    ball.physics.velocity = Vec3::new(-400.0, 900.0, 120.0);

    let cars = (0..6)
        .map(|i| {
            let mut car = CarState::resting((i % 2) as u8);
            car.physics.position =
                Vec3::new(600.0 * i as f32 - 1500.0, 350.0 * i as f32 - 900.0, 17.0);
            car.physics.velocity = Vec3::new(300.0, -150.0, 0.0);
            car.boost = 12.0 * i as f32;
            car
        })
        .collect();

    GameStateSnapshot {
        tick,
        ball: Some(ball),
        cars,
        controlled_index: 0,
    }
}

fn bench_encode_default(c: &mut Criterion) {
    let encoder = build_encoder(EncoderVariant::Default, 5);
    let snapshot = busy_snapshot(0);
    c.bench_function("encode_default_3v3", |b| {
        b.iter(|| encoder.encode(black_box(&snapshot)).unwrap())
    });
}

fn bench_encode_advanced(c: &mut Criterion) {
    let encoder = build_encoder(EncoderVariant::Advanced, 5);
    let snapshot = busy_snapshot(0);
    c.bench_function("encode_advanced_3v3", |b| {
        b.iter(|| encoder.encode(black_box(&snapshot)).unwrap())
    });
}

fn bench_decode_continuous(c: &mut Criterion) {
    let decoder = build_decoder(DecoderVariant::Continuous);
    let raw = vec![0.7, -0.3, 1.4, 0.0, -2.0, 0.6, -0.1, 0.9];
    c.bench_function("decode_continuous", |b| {
        b.iter(|| decoder.decode(black_box(&raw)).unwrap())
    });
}

fn bench_decode_lookup(c: &mut Criterion) {
    let decoder = build_decoder(DecoderVariant::Lookup);
    let raw = vec![87.3];
    c.bench_function("decode_lookup", |b| {
        b.iter(|| decoder.decode(black_box(&raw)).unwrap())
    });
}

fn bench_history_stacking(c: &mut Criterion) {
    let encoder = build_encoder(EncoderVariant::Default, 5);
    let obs = encoder.encode(&busy_snapshot(0)).unwrap();
    let mut history = ObservationHistory::new(4, encoder.obs_dim());
    history.push(obs.clone());
    history.push(obs.clone());
    c.bench_function("history_stack_4_frames", |b| {
        b.iter(|| history.stacked_with(black_box(&obs)))
    });
}

fn bench_step_waiting(c: &mut Criterion) {
    let config = AgentConfig {
        tick_skip: u32::MAX,
        ..AgentConfig::default()
    };
    let input_dim = build_encoder(config.encoder, config.max_agent_slots).obs_dim();
    let mut agent =
        Agent::new(&config, Box::new(RandomPolicy::new(input_dim, 8, 42))).unwrap();
    agent.step(&busy_snapshot(0)).unwrap();

    // Every subsequent step replays the cache.
    let snapshot = busy_snapshot(1);
    c.bench_function("step_waiting_tick", |b| {
        b.iter(|| agent.step(black_box(&snapshot)).unwrap())
    });
}

fn bench_step_deciding(c: &mut Criterion) {
    let config = AgentConfig {
        tick_skip: 1,
        ..AgentConfig::default()
    };
    let input_dim = build_encoder(config.encoder, config.max_agent_slots).obs_dim();
    let mut agent =
        Agent::new(&config, Box::new(RandomPolicy::new(input_dim, 8, 42))).unwrap();

    // tick_skip 1 makes every step a full decision.
    let mut tick = 0u64;
    c.bench_function("step_decision_tick", |b| {
        b.iter(|| {
            tick += 1;
            agent.step(black_box(&busy_snapshot(tick))).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_encode_default,
    bench_encode_advanced,
    bench_decode_continuous,
    bench_decode_lookup,
    bench_history_stacking,
    bench_step_waiting,
    bench_step_deciding,
);
criterion_main!(benches);
