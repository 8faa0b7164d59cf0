use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string()));
    let out = crate_dir.join("include").join("posts_ffi.h");

    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    if let Some(dir) = out.parent() {
        if let Err(err) = std::fs::create_dir_all(dir) {
            println!("cargo:warning=cannot create {}: {err}", dir.display());
            return;
        }
    }

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("POSTS_FFI_H")
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(out);
        }
        Err(err) => println!("cargo:warning=header generation skipped: {err}"),
    }
}
