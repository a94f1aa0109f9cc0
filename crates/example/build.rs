use obsidian_codegen::CodeGenerator;
use std::env;
use std::path::PathBuf;

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let mut codegen = CodeGenerator::new();

    codegen
        .set_header(
            "Reflection for the obsidian example game.\n\
             Matches the declarations in include/game.hpp",
        )
        .set_metadata_file("reflection.json");

    // Parser output for include/game.hpp
    codegen
        .add_ast_dir(manifest_dir.join("ast"))
        .expect("Failed to load AST documents");

    codegen
        .write_to_dir(&out_dir)
        .expect("Failed to write reflection headers");

    println!("cargo:rerun-if-changed=ast");
    println!("cargo:rerun-if-changed=build.rs");
}
