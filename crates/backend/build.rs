use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Places config.toml and the sample data directory next to the built binary,
/// where `shared::config` looks for them first.
fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");
    println!("cargo:rerun-if-changed=../../data");

    let Some(profile_dir) = profile_dir() else {
        println!("cargo:warning=target profile directory not found, runtime files not copied");
        return;
    };
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");

    let config = root.join("config.toml");
    if config.is_file() {
        if let Err(e) = fs::copy(&config, profile_dir.join("config.toml")) {
            println!("cargo:warning=config.toml not copied: {}", e);
        }
    } else {
        println!("cargo:warning=no config.toml at {:?}, embedded default applies", config);
    }

    let data = root.join("data");
    let Ok(entries) = fs::read_dir(&data) else {
        return;
    };
    let target = profile_dir.join("data");
    if let Err(e) = fs::create_dir_all(&target) {
        println!("cargo:warning=cannot create {:?}: {}", target, e);
        return;
    }
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "csv") {
            if let Err(e) = fs::copy(&path, target.join(entry.file_name())) {
                println!("cargo:warning={:?} not copied: {}", path, e);
            }
        }
    }
}

/// target/<profile>, found by walking up from OUT_DIR
/// (target/<profile>/build/backend-xxx/out)
fn profile_dir() -> Option<PathBuf> {
    let out_dir = env::var("OUT_DIR").ok()?;
    let profile = env::var("PROFILE").ok()?;
    Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
}
