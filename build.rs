fn main() {
    // Bindings come from uniffi proc-macros in src/uniffi_bindings.rs, no UDL file.
    // The system prompt is embedded with include_str!, so track it too.
    println!("cargo:rerun-if-changed=src/uniffi_bindings.rs");
    println!("cargo:rerun-if-changed=src/providers/prompt.txt");
    println!("cargo:rerun-if-changed=build.rs");
}
