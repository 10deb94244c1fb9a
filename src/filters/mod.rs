//! Pixel reconstruction filters, selected by name through
//! [make_filter](../core/filter/fn.make_filter.html).
//!
//! | name            | width |
//! |-----------------|-------|
//! | box             | 1     |
//! | triangle        | 2     |
//! | gaussian        | 3     |
//! | mitchell        | 4     |
//! | catmull-rom     | 4     |
//! | blackman-harris | 4     |
//! | sinc            | 4     |
//! | lanczos         | 4     |

pub mod blackmanharris;
pub mod boxfilter;
pub mod gaussian;
pub mod mitchell;
pub mod sinc;
pub mod triangle;
