use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    // Written to OUT_DIR unless BERANI_HEADER_DIR asks for a fixed location.
    let dir = env::var("BERANI_HEADER_DIR").or_else(|_| env::var("OUT_DIR")).unwrap();
    let out = PathBuf::from(dir).join("berani.h");

    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("BERANI_FFI_H".to_string()),
        cpp_compat: true,
        enumeration: cbindgen::EnumConfig {
            prefix_with_name: true,
            ..Default::default()
        },
        ..Default::default()
    };

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(&out);
        }
        Err(e) => println!("cargo:warning=cbindgen failed, header not regenerated: {e}"),
    }

    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=BERANI_HEADER_DIR");
}
