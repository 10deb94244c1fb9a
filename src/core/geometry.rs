//! Almost all nontrivial graphics programs are built on a foundation
//! of geometric classes. Only the small subset the light transport
//! code needs lives here: points, vectors, bounds, rays and an
//! orthonormal basis for local shading frames.

// std
use std::ops;
// lumen
use crate::core::lumen::{Float, RAY_EPSILON};

// Point2

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point2f {
    pub x: Float,
    pub y: Float,
}

impl Point2f {
    pub fn new(x: Float, y: Float) -> Self {
        Point2f { x, y }
    }
}

// Vector3

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Vector3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Vector3f { x, y, z }
    }
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl From<Point3f> for Vector3f {
    fn from(p: Point3f) -> Self {
        Vector3f {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl_op!(-|a: Vector3f| -> Vector3f {
    Vector3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});

impl_op_ex!(+|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(*|a: &Vector3f, b: Float| -> Vector3f {
    Vector3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(/|a: &Vector3f, b: Float| -> Vector3f {
    assert_ne!(b, 0.0 as Float);
    let inv: Float = 1.0 as Float / b;
    Vector3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl_op!(+= |a: &mut Vector3f, b: Vector3f| {
    a.x += b.x;
    a.y += b.y;
    a.z += b.z;
});

/// Product of the Euclidean magnitudes of the two vectors and the
/// cosine of the angle between them.
pub fn vec3_dot(v1: &Vector3f, v2: &Vector3f) -> Float {
    v1.x * v2.x + v1.y * v2.y + v1.z * v2.z
}

/// Given two vectors in 3D, the cross product is a vector that is
/// perpendicular to both of them.
pub fn vec3_cross(v1: &Vector3f, v2: &Vector3f) -> Vector3f {
    let v1x: f64 = v1.x as f64;
    let v1y: f64 = v1.y as f64;
    let v1z: f64 = v1.z as f64;
    let v2x: f64 = v2.x as f64;
    let v2y: f64 = v2.y as f64;
    let v2z: f64 = v2.z as f64;
    Vector3f {
        x: ((v1y * v2z) - (v1z * v2y)) as Float,
        y: ((v1z * v2x) - (v1x * v2z)) as Float,
        z: ((v1x * v2y) - (v1y * v2x)) as Float,
    }
}

/// Compute a new vector pointing in the same direction but with unit
/// length. A zero vector is returned unchanged.
pub fn vec3_normalize(v: &Vector3f) -> Vector3f {
    let len: Float = v.length();
    if len == 0.0 as Float {
        *v
    } else {
        *v / len
    }
}

/// Mirror direction *d* around the normal *n*, where *cos_nd* is the
/// cosine between *n* and *-d*.
pub fn vec3_reflect(d: &Vector3f, n: &Vector3f, cos_nd: Float) -> Vector3f {
    *d + *n * (2.0 as Float * cos_nd)
}

// Point3

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Point3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Point3f { x, y, z }
    }
}

impl_op_ex!(+|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Point3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

pub fn pnt3_distance_squared(p1: &Point3f, p2: &Point3f) -> Float {
    (*p1 - *p2).length_squared()
}

// Bounds3

#[derive(Debug, Copy, Clone)]
pub struct Bounds3f {
    pub p_min: Point3f,
    pub p_max: Point3f,
}

impl Default for Bounds3f {
    fn default() -> Bounds3f {
        // an empty box: any union replaces both corners
        let max: Float = std::f32::MAX;
        Bounds3f {
            p_min: Point3f::new(max, max, max),
            p_max: Point3f::new(-max, -max, -max),
        }
    }
}

impl Bounds3f {
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Bounds3f {
            p_min: Point3f::new(p1.x.min(p2.x), p1.y.min(p2.y), p1.z.min(p2.z)),
            p_max: Point3f::new(p1.x.max(p2.x), p1.y.max(p2.y), p1.z.max(p2.z)),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }
    pub fn union_pnt(&self, p: &Point3f) -> Bounds3f {
        Bounds3f {
            p_min: Point3f::new(
                self.p_min.x.min(p.x),
                self.p_min.y.min(p.y),
                self.p_min.z.min(p.z),
            ),
            p_max: Point3f::new(
                self.p_max.x.max(p.x),
                self.p_max.y.max(p.y),
                self.p_max.z.max(p.z),
            ),
        }
    }
    /// Empty boxes leave the union unchanged.
    pub fn union(&self, b: &Bounds3f) -> Bounds3f {
        if b.is_empty() {
            return *self;
        }
        self.union_pnt(&b.p_min).union_pnt(&b.p_max)
    }
    pub fn extent(&self) -> Vector3f {
        self.p_max - self.p_min
    }
}

// Ray

/// A semi-infinite line specified by its origin and a normalized
/// direction; only hits with *t_min < t < t_max* count.
#[derive(Debug, Copy, Clone)]
pub struct Ray {
    pub o: Point3f,
    pub d: Vector3f,
    pub t_min: Float,
    pub t_max: Float,
}

impl Ray {
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Ray {
            o,
            d: vec3_normalize(&d),
            t_min: RAY_EPSILON,
            t_max: std::f32::INFINITY,
        }
    }
    /// Segment from *a* towards *b* stopping just short of *b* (shadow
    /// rays).
    pub fn between(a: Point3f, b: Point3f) -> Self {
        let d: Vector3f = b - a;
        let len: Float = d.length();
        Ray {
            o: a,
            d: vec3_normalize(&d),
            t_min: RAY_EPSILON,
            t_max: len * (1.0 as Float - RAY_EPSILON),
        }
    }
    pub fn position(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
    pub fn is_inside(&self, t: Float) -> bool {
        self.t_min < t && t < self.t_max
    }
}

// OrthoNormalBasis

/// Local shading frame with *w* aligned to the surface normal.
#[derive(Debug, Default, Copy, Clone)]
pub struct OrthoNormalBasis {
    pub u: Vector3f,
    pub v: Vector3f,
    pub w: Vector3f,
}

impl OrthoNormalBasis {
    pub fn make_from_w(w: &Vector3f) -> Self {
        let w: Vector3f = vec3_normalize(w);
        let helper: Vector3f = if w.x.abs() < w.y.abs() && w.x.abs() < w.z.abs() {
            Vector3f::new(0.0, w.z, -w.y)
        } else if w.y.abs() < w.z.abs() {
            Vector3f::new(w.z, 0.0, -w.x)
        } else {
            Vector3f::new(w.y, -w.x, 0.0)
        };
        let u: Vector3f = vec3_normalize(&helper);
        let v: Vector3f = vec3_cross(&w, &u);
        OrthoNormalBasis { u, v, w }
    }
    /// Transform a vector given in local coordinates to world space.
    pub fn transform(&self, a: &Vector3f) -> Vector3f {
        self.u * a.x + self.v * a.y + self.w * a.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_is_orthonormal() {
        let onb = OrthoNormalBasis::make_from_w(&Vector3f::new(0.3, -2.0, 0.5));
        assert!((onb.u.length() - 1.0).abs() < 1e-5);
        assert!((onb.v.length() - 1.0).abs() < 1e-5);
        assert!(vec3_dot(&onb.u, &onb.w).abs() < 1e-5);
        assert!(vec3_dot(&onb.v, &onb.w).abs() < 1e-5);
        let z = onb.transform(&Vector3f::new(0.0, 0.0, 1.0));
        assert!((vec3_dot(&z, &onb.w) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn shadow_segment_stops_before_target() {
        let r = Ray::between(Point3f::new(0.0, 0.0, 0.0), Point3f::new(0.0, 4.0, 0.0));
        assert!(r.is_inside(3.9));
        assert!(!r.is_inside(4.0));
        assert_eq!(r.d, Vector3f::new(0.0, 1.0, 0.0));
    }
}
