// Build script for SaveStorageSettings
// Ships the default config file beside the built library

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "save_storage_settings.toml";

/// target/<profile>, three levels above OUT_DIR (build/<crate>-<hash>/out)
fn profile_dir() -> Option<PathBuf> {
    let out_dir = env::var_os("OUT_DIR")?;
    Path::new(&out_dir).ancestors().nth(3).map(Path::to_path_buf)
}

fn main() {
    println!("cargo:rerun-if-changed={}", CONFIG_FILE);

    let src = Path::new(CONFIG_FILE);
    if !src.exists() {
        return;
    }

    let Some(profile_dir) = profile_dir() else {
        println!("cargo:warning=Could not locate the target profile directory");
        return;
    };

    let dst = profile_dir.join(CONFIG_FILE);
    match fs::copy(src, &dst) {
        Ok(_) => println!("cargo:warning=Copied config file to {}", dst.display()),
        Err(e) => println!("cargo:warning=Failed to copy config file: {}", e),
    }
}
