use include_dir::{include_dir, Dir};

use crate::errors::{DataSetError, DataSetResult};

static RESOURCES: Dir = include_dir!("resources");

pub const SAMPLE_DATA: &str = "sample_data.yaml";
pub const LAYERS: &str = "layers.yaml";

/// Text of a file embedded from `resources/`.
pub fn resource_str(name: &str) -> DataSetResult<&'static str> {
    let file = RESOURCES
        .get_file(name)
        .ok_or_else(|| DataSetError::ResourceMissing(name.to_string()))?;
    std::str::from_utf8(file.contents())
        .map_err(|_| DataSetError::ResourceMissing(format!("{} is not valid UTF-8", name)))
}
