use std::{
    env,
    path::{Path, PathBuf},
};

/// Returns the workspace root this crate was built from.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`, so it points at the
/// source checkout rather than wherever the binary is installed.
pub fn workspace_dir() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

/// `NORTHWIND_CONFIG_DIR` if set, otherwise `<workspace>/configs`.
pub fn config_dir() -> PathBuf {
    env::var_os("NORTHWIND_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| workspace_dir().join("configs"))
}
