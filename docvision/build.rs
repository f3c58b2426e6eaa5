fn main() {
    // PDFium is bound at runtime, not at build time. Lookup order:
    // 1. Current directory
    // 2. vendor/pdfium/lib/
    // 3. System library paths
    // Poppler is linked through pkg-config by poppler-rs.
    println!("cargo:rerun-if-changed=build.rs");
}
