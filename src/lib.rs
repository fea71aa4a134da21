//! Finds `<Material>.props.txt` dumps under a root folder, pulls the texture
//! references out of them, locates the textures on disk and hands each
//! resolved material to a [`material::MaterialSink`].

pub mod config;
pub mod exclusions;
pub mod locate;
pub mod material;
pub mod pipeline;
pub mod props;

pub use locate::{find_props_files, locate, PropsFile};
pub use props::{extract, PropsRecord, TextureRole};
