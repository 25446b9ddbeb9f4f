//! Principal-axis pose normalization.

use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};

use super::TriangleMesh;

/// Rotate a mesh into its principal-axis frame.
///
/// Vertices are centred on their mean and projected onto the eigenvectors of
/// the vertex covariance, ordered by decreasing variance, so the new x axis is
/// the direction of greatest spread. The sign of each axis is chosen so that
/// the vertex with the largest projection magnitude lies on the positive side.
pub fn align_principal_axes(mesh: &TriangleMesh) -> TriangleMesh {
    let n = mesh.num_vertices();
    if n == 0 {
        return mesh.clone();
    }

    let center = mesh.centroid();
    let centered: Vec<Vector3<f64>> = mesh.vertices().iter().map(|v| v - center).collect();

    let covariance = centered
        .iter()
        .fold(Matrix3::zeros(), |acc, d| acc + d * d.transpose())
        / n as f64;

    let eigen = SymmetricEigen::new(covariance);
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    let axes: Vec<Vector3<f64>> = order
        .iter()
        .map(|&k| {
            let axis = eigen.eigenvectors.column(k).into_owned();
            let extreme = centered
                .iter()
                .map(|d| d.dot(&axis))
                .fold(0.0_f64, |best, p| if p.abs() > best.abs() { p } else { best });
            if extreme < 0.0 {
                -axis
            } else {
                axis
            }
        })
        .collect();

    let projected = centered
        .iter()
        .map(|d| Point3::new(d.dot(&axes[0]), d.dot(&axes[1]), d.dot(&axes[2])))
        .collect();

    mesh.with_vertices(projected)
}
