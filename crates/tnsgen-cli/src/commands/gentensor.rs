//! The `gentensor` command: parse specs, generate, pack, serialize
//!
//! One invocation produces one artifact. The pipeline is sequential by
//! construction; orchestration scripts launch independent processes for
//! independent tensors.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use tnsgen_core::io::save_packed_to_dir;
use tnsgen_core::{generate, parse_dims, parse_formats, GenConfig, TnsError};

pub fn run(
    name: &str,
    dims: &str,
    formats: &str,
    seed: u64,
    density: f64,
    out: &Path,
) -> Result<()> {
    let shape = parse_dims(dims).map_err(TnsError::from)?;
    let formats = parse_formats(formats).map_err(TnsError::from)?;

    let config = GenConfig {
        seed,
        density,
        ..GenConfig::default()
    };
    let tensor = generate(name, &shape, &formats, &config)?;
    let path = save_packed_to_dir(&tensor, out)?;

    info!(
        name,
        nnz = tensor.nnz(),
        density = tensor.density(),
        seed,
        "generated tensor artifact"
    );
    println!("wrote {} ({} nonzeros)", path.display(), tensor.nnz());
    Ok(())
}
