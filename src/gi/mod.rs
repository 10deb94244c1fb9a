//! **GI engines**
//!
//! | Name     | Engine                    |
//! | ---      | ---                       |
//! | `ambocc` | [ambient occlusion][ao]   |
//! | `fake`   | [sky/ground blend][fake]  |
//! | `path`   | [path tracing][path]      |
//!
//! [ao]: ambocc/struct.AmbientOcclusionGiEngine.html
//! [fake]: fake/struct.FakeGiEngine.html
//! [path]: path/struct.PathTracingGiEngine.html

pub mod ambocc;
pub mod fake;
pub mod path;
