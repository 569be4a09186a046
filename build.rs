use std::{env, path::PathBuf};

use anyhow::Context;
use fs_extra::dir::{CopyOptions, copy};

// Demo textures are searched in `./assets`, then in this OUT_DIR copy (see
// `resources::asset_dirs`).
fn main() -> anyhow::Result<()> {
    println!("cargo:rerun-if-changed=assets");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets = manifest_dir.join("assets");
    if !assets.is_dir() {
        return Ok(());
    }

    let out_dir = env::var("OUT_DIR")?;
    let options = CopyOptions::new().overwrite(true);
    copy(&assets, &out_dir, &options)
        .with_context(|| format!("Could not copy {} to {out_dir}", assets.display()))?;
    Ok(())
}
