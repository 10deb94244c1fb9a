//! Bundle up render options and their values in a generic way.

// lumen
use crate::core::geometry::Vector3f;
use crate::core::lumen::{Float, Spectrum};

pub struct ParamSetItem<T> {
    pub name: String,
    pub values: Vec<T>,
    pub n_values: usize,
}

impl<T> ParamSetItem<T> {
    fn single(name: &str, value: T) -> Self {
        ParamSetItem {
            name: name.to_string(),
            values: vec![value],
            n_values: 1_usize,
        }
    }
}

/// Typed option bags. Adding a value under an existing name replaces
/// the previous one.
#[derive(Default)]
pub struct ParamSet {
    pub bools: Vec<ParamSetItem<bool>>,
    pub ints: Vec<ParamSetItem<i32>>,
    pub floats: Vec<ParamSetItem<Float>>,
    pub vector3fs: Vec<ParamSetItem<Vector3f>>,
    pub spectra: Vec<ParamSetItem<Spectrum>>,
    pub strings: Vec<ParamSetItem<String>>,
}

fn replace<T>(items: &mut Vec<ParamSetItem<T>>, name: &str, value: T) {
    items.retain(|item| item.name != name);
    items.push(ParamSetItem::single(name, value));
}

fn find_one<'a, T>(items: &'a [ParamSetItem<T>], name: &str) -> Option<&'a T> {
    items
        .iter()
        .find(|item| item.name == name && item.n_values == 1)
        .map(|item| &item.values[0])
}

impl ParamSet {
    pub fn add_bool(&mut self, name: &str, value: bool) {
        replace(&mut self.bools, name, value);
    }
    pub fn add_int(&mut self, name: &str, value: i32) {
        replace(&mut self.ints, name, value);
    }
    pub fn add_float(&mut self, name: &str, value: Float) {
        replace(&mut self.floats, name, value);
    }
    pub fn add_vector3f(&mut self, name: &str, value: Vector3f) {
        replace(&mut self.vector3fs, name, value);
    }
    pub fn add_rgb_spectrum(&mut self, name: &str, value: Spectrum) {
        replace(&mut self.spectra, name, value);
    }
    pub fn add_string(&mut self, name: &str, value: &str) {
        replace(&mut self.strings, name, value.to_string());
    }
    /// Set as a float or as an integer.
    pub fn has_float(&self, name: &str) -> bool {
        find_one(&self.floats, name).is_some() || find_one(&self.ints, name).is_some()
    }
    pub fn has_string(&self, name: &str) -> bool {
        find_one(&self.strings, name).is_some()
    }
    pub fn find_one_bool(&self, name: &str, d: bool) -> bool {
        find_one(&self.bools, name).copied().unwrap_or(d)
    }
    pub fn find_one_int(&self, name: &str, d: i32) -> i32 {
        find_one(&self.ints, name).copied().unwrap_or(d)
    }
    /// Integers are accepted where a float is asked for.
    pub fn find_one_float(&self, name: &str, d: Float) -> Float {
        match find_one(&self.floats, name) {
            Some(v) => *v,
            None => find_one(&self.ints, name).map_or(d, |i| *i as Float),
        }
    }
    pub fn find_one_vector3f(&self, name: &str, d: Vector3f) -> Vector3f {
        find_one(&self.vector3fs, name).copied().unwrap_or(d)
    }
    pub fn find_one_spectrum(&self, name: &str, d: Spectrum) -> Spectrum {
        find_one(&self.spectra, name).copied().unwrap_or(d)
    }
    pub fn find_one_string(&self, name: &str, d: &str) -> String {
        find_one(&self.strings, name).map_or_else(|| d.to_string(), |s| s.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_overrides() {
        let mut ps = ParamSet::default();
        assert_eq!(ps.find_one_int("bucket.size", 32), 32);
        ps.add_int("bucket.size", 64);
        ps.add_int("bucket.size", 48);
        assert_eq!(ps.find_one_int("bucket.size", 32), 48);
        assert_eq!(ps.ints.len(), 1);
        ps.add_string("filter", "gaussian");
        assert_eq!(ps.find_one_string("filter", "box"), "gaussian");
        assert_eq!(ps.find_one_string("bucket.order", "hilbert"), "hilbert");
    }

    #[test]
    fn ints_promote_to_floats() {
        let mut ps = ParamSet::default();
        ps.add_int("caustics.radius", 2);
        assert_eq!(ps.find_one_float("caustics.radius", 0.5), 2.0);
        ps.add_float("caustics.radius", 0.25);
        assert_eq!(ps.find_one_float("caustics.radius", 0.5), 0.25);
    }

    #[test]
    fn presence_checks() {
        let mut ps = ParamSet::default();
        assert!(!ps.has_float("shading.cache"));
        assert!(!ps.has_string("gi.engine"));
        ps.add_int("shading.cache", 1);
        assert!(ps.has_float("shading.cache"));
        ps.add_string("gi.engine", "none");
        assert!(ps.has_string("gi.engine"));
        assert!(!ps.has_float("gi.engine"));
    }
}
