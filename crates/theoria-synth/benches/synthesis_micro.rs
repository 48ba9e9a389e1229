use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use theoria_core::{Medium, SourceDescriptor};
use theoria_synth::Synthesizer;

const PARAGRAPH: &str = "Las redes neuronales adaptan sus conexiones cuando la energía de la \
    señal cambia. La difusión del calor y las oscilaciones del campo modulan el aprendizaje.";

fn bench_synthesis(c: &mut Criterion) {
    let synthesizer = Synthesizer::default();
    let mut group = c.benchmark_group("synthesis_by_input_size");
    for &repeats in &[1usize, 100, 1_000, 10_000] {
        let content = vec![PARAGRAPH; repeats].join(" ");
        let descriptor = SourceDescriptor::for_content(Medium::Text, &content);

        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::new("synthesize", repeats), &content, |b, content| {
            b.iter(|| black_box(synthesizer.synthesize(content, &descriptor)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_synthesis);
criterion_main!(benches);
