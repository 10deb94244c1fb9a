//! Reconstruction filters weight subpixel samples when pixels are
//! assembled from a bucket's sample grid.

// std
use std::str::FromStr;
use std::sync::Arc;
// others
use strum_macros::{Display, EnumIter, EnumString};
// lumen
use crate::core::lumen::Float;
use crate::filters::blackmanharris::BlackmanHarrisFilter;
use crate::filters::boxfilter::BoxFilter;
use crate::filters::gaussian::GaussianFilter;
use crate::filters::mitchell::MitchellNetravali;
use crate::filters::sinc::{LanczosFilter, SincFilter};
use crate::filters::triangle::TriangleFilter;

pub trait Filter {
    /// Weight of a sample at offset *(x, y)* from the pixel center.
    fn get(&self, x: Float, y: Float) -> Float;
    /// Full width of the filter support in pixels.
    fn get_size(&self) -> Float;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum FilterType {
    Box,
    Triangle,
    Gaussian,
    Mitchell,
    CatmullRom,
    BlackmanHarris,
    Sinc,
    Lanczos,
}

impl FilterType {
    pub fn create(self) -> Arc<dyn Filter + Send + Sync> {
        match self {
            FilterType::Box => Arc::new(BoxFilter::new(1.0)),
            FilterType::Triangle => Arc::new(TriangleFilter::new(2.0)),
            FilterType::Gaussian => Arc::new(GaussianFilter::new(3.0)),
            FilterType::Mitchell => Arc::new(MitchellNetravali::mitchell()),
            FilterType::CatmullRom => Arc::new(MitchellNetravali::catmull_rom()),
            FilterType::BlackmanHarris => Arc::new(BlackmanHarrisFilter::new(4.0)),
            FilterType::Sinc => Arc::new(SincFilter::new(4.0)),
            FilterType::Lanczos => Arc::new(LanczosFilter::new()),
        }
    }
}

/// Look a filter up by name, unknown names fall back to a unit box.
pub fn make_filter(name: &str) -> Arc<dyn Filter + Send + Sync> {
    match FilterType::from_str(name) {
        Ok(filter_type) => filter_type.create(),
        Err(_) => {
            log::warn!("unrecognized filter type: \"{}\" - defaulting to box", name);
            FilterType::Box.create()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn names_resolve() {
        assert_eq!(FilterType::from_str("catmull-rom"), Ok(FilterType::CatmullRom));
        assert_eq!(
            FilterType::from_str("blackman-harris"),
            Ok(FilterType::BlackmanHarris)
        );
        assert!(FilterType::from_str("bspline").is_err());
        assert_eq!(make_filter("bspline").get_size(), 1.0);
    }

    #[test]
    fn every_filter_peaks_at_center() {
        for filter_type in FilterType::iter() {
            let filter = filter_type.create();
            let center = filter.get(0.0, 0.0);
            let half = filter.get_size() * 0.5;
            assert!(center > 0.0, "{} center weight {}", filter_type, center);
            assert!(
                filter.get(half * 0.9, 0.0) <= center,
                "{} is not peaked",
                filter_type
            );
        }
    }

    #[test]
    fn filter_sizes() {
        let sizes: Vec<Float> = FilterType::iter().map(|t| t.create().get_size()).collect();
        assert_eq!(sizes, vec![1.0, 2.0, 3.0, 4.0, 4.0, 4.0, 4.0, 4.0]);
    }
}
