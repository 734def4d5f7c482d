// Bakes a default database directory into the binaries when CATDB_DIR_HINT
// names one at build time. Hints without a categories.json are dropped with a
// warning instead of producing binaries that point nowhere.
use std::env;
use std::path::Path;

const HINT_VAR: &str = "CATDB_DIR_HINT";

fn main() {
    println!("cargo:rerun-if-env-changed={HINT_VAR}");

    let Some(raw) = env::var_os(HINT_VAR).filter(|raw| !raw.is_empty()) else {
        return;
    };
    let dir = Path::new(&raw);
    if !dir.join("categories.json").is_file() {
        println!(
            "cargo:warning={HINT_VAR}={} has no categories.json; ignoring",
            dir.display()
        );
        return;
    }
    let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    println!("cargo:rustc-env={HINT_VAR}={}", dir.display());
}
