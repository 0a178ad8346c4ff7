// Build number shown in the header: `DEPLOYW_BUILD_NUMBER` from CI, else the
// BUILD_NUMBER file, else 0.
fn main() {
    let build_number = std::env::var("DEPLOYW_BUILD_NUMBER")
        .ok()
        .or_else(|| std::fs::read_to_string("BUILD_NUMBER").ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "0".to_string());

    println!("cargo:rustc-env=BUILD_NUMBER={build_number}");
    println!("cargo:rerun-if-changed=BUILD_NUMBER");
    println!("cargo:rerun-if-env-changed=DEPLOYW_BUILD_NUMBER");
}
