//! **Shaders**
//!
//! | Name     | Shader                                      |
//! | ---      | ---                                         |
//! | constant | [ConstantShader](constant/struct.ConstantShader.html) |
//! | diffuse  | [DiffuseShader](diffuse/struct.DiffuseShader.html)   |
//! | mirror   | [MirrorShader](mirror/struct.MirrorShader.html)      |
//! | prim_id  | [PrimIdShader](primid/struct.PrimIdShader.html)      |

pub mod constant;
pub mod diffuse;
pub mod mirror;
pub mod primid;
