//! End-to-end hull scenarios with invariant checks after every step.

use approx::assert_relative_eq;
use incremental_hull::io::parse_points;
use incremental_hull::{
    convex_hull, BuildState, ConvexHull, HullBuilder, HullError, HullSettings, PointId, Vec3,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;

// =============================================================================
// Helpers
// =============================================================================

fn cube_corners() -> Vec<Vec3> {
    let mut points = Vec::new();
    for x in [0.0, 1.0] {
        for y in [0.0, 1.0] {
            for z in [0.0, 1.0] {
                points.push(Vec3::new(x, y, z));
            }
        }
    }
    points
}

fn random_cloud(seed: u64, count: usize) -> Vec<Vec3> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
                rng.gen_range(-10.0..10.0),
            )
        })
        .collect()
}

/// Points of an `(n + 1)³` lattice lying on the boundary of the unit cube.
fn cube_shell(n: u32) -> Vec<Vec3> {
    let mut points = Vec::new();
    for i in 0..=n {
        for j in 0..=n {
            for k in 0..=n {
                if [i, j, k].iter().any(|&c| c == 0 || c == n) {
                    points.push(Vec3::new(i as f64, j as f64, k as f64) / n as f64);
                }
            }
        }
    }
    points
}

/// Unit square at `z = 0` sampled every quarter, plus an apex above its center.
fn gridded_pyramid() -> Vec<Vec3> {
    let mut points: Vec<Vec3> = (0..=4)
        .flat_map(|i| (0..=4).map(move |j| Vec3::new(i as f64 / 4.0, j as f64 / 4.0, 0.0)))
        .collect();
    points.push(Vec3::new(0.5, 0.5, 1.0));
    points
}

/// Six quads whose corners are all corners of the unit cube.
fn assert_unit_cube(hull: &ConvexHull, seed: u64) {
    assert_eq!(hull.facet_count(), 6, "seed {seed}");
    assert_eq!(hull.vertex_ids().len(), 8, "seed {seed}");
    for facet in hull.facets() {
        assert_eq!(facet.vertices.len(), 4, "seed {seed}");
        for corner in &facet.positions {
            let on_corner = corner.to_array().iter().all(|&c| c == 0.0 || c == 1.0);
            assert!(on_corner, "seed {seed}: {corner} is not a cube corner");
        }
    }
    assert_relative_eq!(hull.volume(), 1.0, epsilon = 1.0e-9);
}

/// Steps to completion, validating mesh and conflicts after each state.
fn build_checked(points: Vec<Vec3>, rng_seed: u64) -> ConvexHull {
    build_checked_with(points, HullSettings::default().with_rng_seed(rng_seed))
}

fn build_checked_with(points: Vec<Vec3>, settings: HullSettings) -> ConvexHull {
    let mut builder = HullBuilder::with_settings(points.clone(), settings).unwrap();

    loop {
        let state = builder.step().unwrap();
        if !matches!(state, BuildState::SeededMeshBuilt) {
            builder.validate().unwrap();
        }
        if state == BuildState::Done {
            break;
        }
    }

    // Convexity: no pending conflicts and no point outside a live facet.
    let mesh = builder.mesh();
    for facet in mesh.live_facets() {
        assert_eq!(builder.conflicts().points_of(facet).count(), 0);
        let corners = mesh.facet_vertices(facet).unwrap();
        for id in (0..points.len() as u32).map(PointId) {
            if !corners.contains(&id) {
                assert!(!mesh.is_visible(facet, id).unwrap());
            }
        }
    }
    assert!(builder.conflicts().is_empty());

    builder.build().unwrap()
}

/// Facet boundaries rotated to start at their smallest point id.
fn canonical_facets(hull: &ConvexHull) -> Vec<Vec<PointId>> {
    let mut facets: Vec<Vec<PointId>> = hull
        .facets()
        .iter()
        .map(|facet| {
            let mut ids = facet.vertices.clone();
            let start = (0..ids.len()).min_by_key(|&i| ids[i]).unwrap_or(0);
            ids.rotate_left(start);
            ids
        })
        .collect();
    facets.sort();
    facets
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn regular_tetrahedron() {
    let points = vec![
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(-1.0, -1.0, 1.0),
    ];
    let mut builder = HullBuilder::new(points.clone()).unwrap();
    while builder.step().unwrap() != BuildState::Done {}
    builder.validate().unwrap();

    let mesh = builder.mesh();
    assert_eq!(mesh.live_facet_count(), 4);
    let mut pairs = BTreeSet::new();
    for facet in mesh.live_facets() {
        let edges = mesh.facet_edges(facet).unwrap();
        assert_eq!(edges.len(), 3);
        for edge in edges {
            let twin = mesh.twin_of(edge).unwrap();
            pairs.insert((edge.min(twin), edge.max(twin)));
        }
    }
    assert_eq!(pairs.len(), 6);

    let hull = builder.build().unwrap();
    assert_relative_eq!(hull.volume(), 8.0 / 3.0, epsilon = 1.0e-12);
    for facet in hull.facets() {
        assert_relative_eq!(facet.normal.length(), 1.0, epsilon = 1.0e-12);
        assert!(facet.normal.dot(facet.positions[0]) > 0.0);
    }
}

#[test]
fn cube_with_centroid_has_six_quads() {
    let mut points = cube_corners();
    points.push(Vec3::splat(0.5));
    let centroid = PointId(8);

    for seed in 0..16 {
        let hull = build_checked(points.clone(), seed);

        assert_eq!(hull.facet_count(), 6, "seed {seed}");
        assert!(hull.facets().iter().all(|f| f.vertices.len() == 4));
        assert!(!hull.vertex_ids().contains(&centroid));
        assert_eq!(hull.vertex_ids().len(), 8);
        assert_relative_eq!(hull.volume(), 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(hull.surface_area(), 6.0, epsilon = 1.0e-12);
    }
}

#[test]
fn point_on_cube_face_adds_no_facet() {
    let mut points = cube_corners();
    points.push(Vec3::new(0.3, 0.6, 1.0));
    let face_point = PointId(8);

    for seed in 0..16 {
        let hull = build_checked(points.clone(), seed);

        assert_eq!(hull.facet_count(), 6, "seed {seed}");
        assert!(!hull.vertex_ids().contains(&face_point), "seed {seed}");
        assert!(hull.contains(Vec3::new(0.3, 0.6, 1.0)));
    }
}

#[test]
fn two_points_on_one_face_leave_six_quads() {
    let mut points = cube_corners();
    points.push(Vec3::new(0.5, 0.5, 1.0));
    points.push(Vec3::new(0.25, 0.25, 1.0));

    for seed in 0..200 {
        let hull = build_checked(points.clone(), seed);
        assert_unit_cube(&hull, seed);
        assert!(hull.vertex_ids().iter().all(|id| id.0 < 8), "seed {seed}");
    }
}

#[test]
fn face_points_never_become_vertices() {
    let mut points = cube_corners();
    points.extend([
        Vec3::new(0.5, 0.5, 1.0),
        Vec3::new(0.25, 0.25, 1.0),
        Vec3::new(0.75, 0.25, 1.0),
        Vec3::new(0.5, 0.75, 1.0),
        Vec3::new(0.0, 0.5, 0.5),
        Vec3::new(0.0, 0.25, 0.75),
        Vec3::new(0.75, 0.5, 0.0),
    ]);

    for seed in 0..100 {
        let hull = build_checked(points.clone(), seed);
        assert_unit_cube(&hull, seed);
        assert!(hull.vertex_ids().iter().all(|id| id.0 < 8), "seed {seed}");
    }
}

#[test]
fn points_on_cube_edges_are_dropped() {
    let mut points = cube_corners();
    points.extend([
        Vec3::new(0.5, 0.0, 0.0),
        Vec3::new(1.0, 0.5, 1.0),
        Vec3::new(0.0, 0.25, 1.0),
        Vec3::new(0.0, 0.75, 1.0),
        Vec3::new(1.0, 1.0, 0.75),
    ]);

    for seed in 0..100 {
        let hull = build_checked(points.clone(), seed);
        assert_unit_cube(&hull, seed);
        assert!(hull.vertex_ids().iter().all(|id| id.0 < 8), "seed {seed}");
    }
}

#[test]
fn cube_shell_lattice_collapses_to_six_quads() {
    let quarters = cube_shell(4);
    assert_eq!(quarters.len(), 98);
    for seed in 0..100 {
        assert_unit_cube(&build_checked(quarters.clone(), seed), seed);
    }

    let sixths = cube_shell(6);
    for seed in 0..40 {
        assert_unit_cube(&build_checked(sixths.clone(), seed), seed);
    }
}

#[test]
fn pyramid_over_base_grid_has_five_facets() {
    let points = gridded_pyramid();
    let apex = PointId(points.len() as u32 - 1);

    for seed in 0..100 {
        let settings = HullSettings::new(1.0e-8, 4).unwrap().with_rng_seed(seed);
        let hull = build_checked_with(points.clone(), settings);

        assert_eq!(hull.facet_count(), 5, "seed {seed}");
        assert_eq!(hull.vertex_ids().len(), 5, "seed {seed}");
        assert!(hull.vertex_ids().contains(&apex));
        let base: Vec<_> = hull.facets().iter().filter(|f| f.normal.z < -0.5).collect();
        assert_eq!(base.len(), 1, "seed {seed}");
        assert_eq!(base[0].vertices.len(), 4, "seed {seed}");
        assert_relative_eq!(hull.volume(), 1.0 / 3.0, epsilon = 1.0e-9);
    }
}

#[test]
fn apex_over_dense_plane_is_found() {
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let mut points: Vec<Vec3> = (0..5000)
        .map(|_| Vec3::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0), 0.0))
        .collect();
    let apex = PointId(points.len() as u32);
    points.push(Vec3::new(0.5, 0.5, 1.0));

    for seed in 0..10 {
        let settings = HullSettings::default().with_rng_seed(seed);
        let hull = HullBuilder::with_settings(points.clone(), settings)
            .unwrap()
            .build()
            .unwrap();

        assert!(hull.vertex_ids().contains(&apex), "seed {seed}");
        let bases = hull.facets().iter().filter(|f| f.normal.z < -0.5).count();
        assert_eq!(bases, 1, "seed {seed}");
        for &p in &points {
            assert!(hull.contains(p));
        }
    }
}

#[test]
fn collinear_input_is_degenerate() {
    let points: Vec<Vec3> = (0..10).map(|i| Vec3::new(i as f64, 2.0 * i as f64, -1.0)).collect();
    let err = convex_hull(points).unwrap_err();
    assert!(matches!(err, HullError::DegenerateInput { .. }));
}

#[test]
fn random_cloud_stays_valid_every_step() {
    let points = random_cloud(7, 300);
    let hull = build_checked(points.clone(), 1);

    for &p in &points {
        assert!(hull.contains(p));
    }
    let stats = hull.stats();
    assert_eq!(stats.inserted + stats.skipped, points.len() - 4);
    // Euler: a triangulated sphere has 2V - 4 faces.
    assert_eq!(hull.facet_count(), 2 * hull.vertex_ids().len() - 4);
}

#[test]
fn insertion_order_does_not_change_the_hull() {
    let points = random_cloud(21, 200);
    let first = build_checked(points.clone(), 3);
    let second = build_checked(points, 4_000_000_007);

    assert_eq!(first.vertex_ids(), second.vertex_ids());
    assert_eq!(canonical_facets(&first), canonical_facets(&second));
    assert_relative_eq!(first.volume(), second.volume(), epsilon = 1.0e-9);
}

#[test]
fn cube_planes_match_across_seeds() {
    let mut points = cube_corners();
    points.push(Vec3::splat(0.5));
    let planes = |seed: u64| {
        let hull = build_checked(points.clone(), seed);
        let mut normals: Vec<[i64; 3]> = hull
            .facets()
            .iter()
            .map(|f| f.normal.to_array().map(|c| c.round() as i64))
            .collect();
        normals.sort();
        normals
    };
    assert_eq!(planes(5), planes(6));
    assert_eq!(planes(5).len(), 6);
}

#[test]
fn cube_exports_twelve_triangles() {
    let hull = convex_hull(cube_corners()).unwrap();
    let mesh = hull.to_triangle_mesh();

    assert_eq!(mesh.vertices.len(), 8);
    assert_eq!(mesh.triangle_count(), 12);
    assert_eq!(mesh.bounding_box(), (Vec3::ZERO, Vec3::ONE));
}

#[test]
fn parsed_points_build_a_hull() {
    let text = "\
# square pyramid with an interior point
0 0 0
2,0,0
2 2 0
0, 2, 0
1 1 2
1 1 0.5
";
    let hull = convex_hull(parse_points(text).unwrap()).unwrap();
    assert_eq!(hull.facet_count(), 5);
    assert_eq!(hull.vertex_ids().len(), 5);
    assert_relative_eq!(hull.volume(), 8.0 / 3.0, epsilon = 1.0e-12);
}
