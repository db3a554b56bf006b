// Stamps STOREFRONT_VERSION for the crate; the patch segment can be
// replaced by the release pipeline through STOREFRONT_PATCH_VERSION.

use std::env;

fn main() {
    let version = env::var("CARGO_PKG_VERSION").expect("CARGO_PKG_VERSION not set");

    let [major, minor, patch] = version.split('.').collect::<Vec<_>>()[..] else {
        panic!("Cargo.toml version must be major.minor.patch, got {}", version);
    };

    let patch = env::var("STOREFRONT_PATCH_VERSION").unwrap_or_else(|_| patch.to_string());

    // Shown by --version and sent in the User-Agent header
    println!("cargo:rustc-env=STOREFRONT_VERSION={}.{}.{}", major, minor, patch);
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=STOREFRONT_PATCH_VERSION");
}
