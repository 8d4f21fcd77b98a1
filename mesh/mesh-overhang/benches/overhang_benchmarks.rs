//! Benchmarks for overhang and dangling analysis.
//!
//! Run with: cargo bench -p mesh-overhang

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_index::MeshIndex;
use mesh_overhang::{DanglingParams, OverhangParams, analyze_dangling, analyze_overhangs, classify};
use mesh_types::{IndexedMesh, Point3, Vertex};
use std::f64::consts::{PI, TAU};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// A UV sphere of radius 10 floating above the build plate.
fn create_sphere(rings: u32, segments: u32) -> IndexedMesh {
    let mut mesh = IndexedMesh::new();
    let center = Point3::new(0.0, 20.0, 0.0);

    mesh.vertices.push(Vertex::new(center + nalgebra::Vector3::new(0.0, 10.0, 0.0)));
    for r in 1..rings {
        let theta = PI * f64::from(r) / f64::from(rings);
        for s in 0..segments {
            let phi = TAU * f64::from(s) / f64::from(segments);
            let dir = nalgebra::Vector3::new(
                theta.sin() * phi.cos(),
                theta.cos(),
                theta.sin() * phi.sin(),
            );
            mesh.vertices.push(Vertex::new(center + dir * 10.0));
        }
    }
    mesh.vertices.push(Vertex::new(center - nalgebra::Vector3::new(0.0, 10.0, 0.0)));

    let ring = |r: u32, s: u32| 1 + (r - 1) * segments + (s % segments);
    let bottom = 1 + (rings - 1) * segments;

    for s in 0..segments {
        mesh.faces.push([0, ring(1, s + 1), ring(1, s)]);
    }
    for r in 1..rings - 1 {
        for s in 0..segments {
            let (a, b) = (ring(r, s), ring(r, s + 1));
            let (c, d) = (ring(r + 1, s + 1), ring(r + 1, s));
            mesh.faces.push([a, b, c]);
            mesh.faces.push([a, c, d]);
        }
    }
    for s in 0..segments {
        mesh.faces.push([bottom, ring(rings - 1, s), ring(rings - 1, s + 1)]);
    }

    mesh
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for &res in &[16u32, 64, 128] {
        let index = MeshIndex::new(create_sphere(res, res * 2)).unwrap_or_else(|e| panic!("{e}"));
        let normals = index.face_normals();
        group.throughput(Throughput::Elements(normals.len() as u64));
        group.bench_with_input(BenchmarkId::new("sphere", res), &res, |b, _| {
            b.iter(|| classify(black_box(normals), &nalgebra::Vector3::y(), 45.0));
        });
    }

    group.finish();
}

fn bench_overhangs(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_overhangs");
    let params = OverhangParams::default();

    for &res in &[16u32, 64, 128] {
        let index = MeshIndex::new(create_sphere(res, res * 2)).unwrap_or_else(|e| panic!("{e}"));
        group.throughput(Throughput::Elements(index.face_count() as u64));
        group.bench_with_input(BenchmarkId::new("sphere", res), &index, |b, index| {
            b.iter(|| analyze_overhangs(black_box(index), &params));
        });
    }

    group.finish();
}

fn bench_dangling(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_dangling");
    let params = DanglingParams::default();

    for &res in &[16u32, 64, 128] {
        let index = MeshIndex::new(create_sphere(res, res * 2)).unwrap_or_else(|e| panic!("{e}"));
        group.throughput(Throughput::Elements(index.vertex_count() as u64));
        group.bench_with_input(BenchmarkId::new("sphere", res), &index, |b, index| {
            b.iter(|| analyze_dangling(black_box(index), &params));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_overhangs, bench_dangling);
criterion_main!(benches);
