fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Client stubs for callers; server stubs back the in-process fake used by tests.
    println!("cargo:rerun-if-changed=../../proto/message_api/v1/message_api.proto");

    tonic_build::configure()
        .build_client(true)
        .build_server(true)
        .compile_protos(
            &["../../proto/message_api/v1/message_api.proto"],
            &["../../proto"],
        )?;

    Ok(())
}
