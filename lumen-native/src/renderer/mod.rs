pub mod depth;
pub mod flat;
pub mod gpu;
pub mod gui;
pub mod lights;
pub mod lit;
pub mod mesh;
pub mod pipeline;
pub mod postprocess;
pub mod skybox;
pub mod target;
pub mod texture;

pub use depth::DepthStencil;
pub use gpu::Gpu;
pub use mesh::{InstanceBuffer, Mesh, MeshData, MeshVertex};
pub use texture::{CubeTexture, Texture};
