//! Stamps the crate with the time it was built.

const BUILD_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

fn main() {
    let stamp = chrono::Utc::now().format(BUILD_DATE_FORMAT);
    println!("cargo:rustc-env=BUILD_DATE={stamp}");
    println!("cargo:rerun-if-changed=build.rs");
}
