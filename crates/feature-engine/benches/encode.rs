use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_engine::{FeatureEncoder, FuelType, Transmission, VehicleClass, VehicleDescriptor};

fn bench_encode(c: &mut Criterion) {
    let encoder = FeatureEncoder::new();
    let descriptor = VehicleDescriptor {
        vehicle_class: VehicleClass::SuvStandard,
        engine_size: 3.5,
        cylinders: 6,
        transmission: Transmission::SelectShift,
        co2_rating: 4.0,
        fuel_type: FuelType::PremiumGasoline,
    };

    c.bench_function("encode_descriptor", |b| {
        b.iter(|| encoder.encode(black_box(&descriptor)))
    });
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
