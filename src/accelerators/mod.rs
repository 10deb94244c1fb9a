//! **Scene traversal**
//!
//! - [InstanceList](instancelist/struct.InstanceList.html)

pub mod instancelist;
