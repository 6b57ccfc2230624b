fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")?;
    let proto_path = format!("{manifest_dir}/proto/thrippy/v1/thrippy.proto");
    let proto_dir = format!("{manifest_dir}/proto");

    tonic_build::configure()
        .build_client(true)
        .build_server(true)
        .compile_protos(&[proto_path.as_str()], &[proto_dir.as_str()])?;

    println!("cargo:rerun-if-changed={proto_path}");
    Ok(())
}
