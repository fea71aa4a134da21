// Props dump reading: role keys, extracted records, and the extractor itself

pub mod role;
pub mod record;
pub mod extractor;

pub use role::TextureRole;
pub use record::PropsRecord;
pub use extractor::{extract, read_props_file, KeyScan, PropsExtractor, PropsIssue};

/// Suffix identifying a props dump on disk (`<MaterialName>.props.txt`)
pub const PROPS_SUFFIX: &str = ".props.txt";

/// Props filename for a material
pub fn props_file_name(material: &str) -> String {
    format!("{}{}", material, PROPS_SUFFIX)
}
